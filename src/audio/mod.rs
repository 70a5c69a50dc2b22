/*!
 * Audio clips and their assembly.
 *
 * - `decode`: MP3 to mono PCM, via symphonia
 * - `encode`: mono PCM to MP3, via LAME
 * - `timeline`: the speech/silence layout of one drill file
 */

use std::time::Duration;

use crate::errors::AudioError;

pub mod decode;
pub mod encode;
pub mod timeline;

pub use decode::{decode_bytes, decode_file};
pub use encode::{encode_mp3, export_mp3};
pub use timeline::{AudioTimelineBuilder, Language, Segment, TimelinePlan, MAX_LOOP_COUNT, OPENING_MARGIN_MS};

/// Decoded mono 16-bit PCM audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// A clip of digital silence
    pub fn silent(duration_ms: u32, sample_rate: u32) -> Self {
        Self::new(vec![0; samples_for(duration_ms, sample_rate)], sample_rate)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Append another clip; both must share the same sample rate
    pub fn append(&mut self, other: &AudioClip) -> Result<(), AudioError> {
        if other.sample_rate != self.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                first: self.sample_rate,
                second: other.sample_rate,
            });
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }

    /// Append `duration_ms` of silence
    pub fn append_silence(&mut self, duration_ms: u32) {
        let count = samples_for(duration_ms, self.sample_rate);
        self.samples.resize(self.samples.len() + count, 0);
    }
}

/// Number of samples covering `duration_ms` at `sample_rate`
pub fn samples_for(duration_ms: u32, sample_rate: u32) -> usize {
    (sample_rate as u64 * duration_ms as u64 / 1000) as usize
}
