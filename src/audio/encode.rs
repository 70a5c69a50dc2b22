use std::fs;
use std::path::Path;

use mp3lame_encoder::{Bitrate, Builder, FlushGap, MonoPcm, Quality};

use super::AudioClip;
use crate::errors::AudioError;

/// Encode a clip as constant bitrate mono MP3
pub fn encode_mp3(clip: &AudioClip, bitrate_kbps: u32) -> Result<Vec<u8>, AudioError> {
    let mut builder = Builder::new()
        .ok_or_else(|| AudioError::Encode("failed to allocate LAME encoder".to_string()))?;
    builder.set_num_channels(1).map_err(encode_error)?;
    builder.set_sample_rate(clip.sample_rate()).map_err(encode_error)?;
    builder.set_brate(bitrate(bitrate_kbps)?).map_err(encode_error)?;
    builder.set_quality(Quality::Good).map_err(encode_error)?;
    let mut encoder = builder.build().map_err(encode_error)?;

    let mut output = Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(clip.len()));
    encoder
        .encode_to_vec(MonoPcm(clip.samples()), &mut output)
        .map_err(encode_error)?;
    // Drains the encoder delay and the last partial frame
    encoder
        .flush_to_vec::<FlushGap>(&mut output)
        .map_err(encode_error)?;

    Ok(output)
}

/// Encode a clip and write it to `path`
pub fn export_mp3<P: AsRef<Path>>(clip: &AudioClip, path: P, bitrate_kbps: u32) -> Result<(), AudioError> {
    let bytes = encode_mp3(clip, bitrate_kbps)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn bitrate(kbps: u32) -> Result<Bitrate, AudioError> {
    match kbps {
        32 => Ok(Bitrate::Kbps32),
        48 => Ok(Bitrate::Kbps48),
        64 => Ok(Bitrate::Kbps64),
        96 => Ok(Bitrate::Kbps96),
        128 => Ok(Bitrate::Kbps128),
        160 => Ok(Bitrate::Kbps160),
        other => Err(AudioError::Encode(format!("unsupported bitrate: {} kbps", other))),
    }
}

fn encode_error<E: std::fmt::Debug>(error: E) -> AudioError {
    AudioError::Encode(format!("{:?}", error))
}
