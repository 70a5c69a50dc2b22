use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{OutputConfig, TimelineOptions, VoicePair};
use crate::audio::{decode_file, export_mp3, AudioTimelineBuilder};
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::script::VocabularyRow;
use crate::synthesis::SpeechSynthesizer;
use crate::tagging::{TagWriter, TrackTags};

// @module: Rendering of a single script row

/// Result of processing one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// The row is disabled, nothing was done
    Skipped,
    /// The finished, tagged file
    Written(PathBuf),
}

/// Renders one row end to end: synthesize, assemble, export, tag
#[derive(Debug, Clone)]
pub struct RowPipeline {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    tag_writer: Arc<dyn TagWriter>,
    voices: VoicePair,
    timeline: AudioTimelineBuilder,
    output: OutputConfig,
}

impl RowPipeline {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        tag_writer: Arc<dyn TagWriter>,
        voices: VoicePair,
        timeline: TimelineOptions,
        output: OutputConfig,
    ) -> Self {
        Self {
            synthesizer,
            tag_writer,
            voices,
            timeline: AudioTimelineBuilder::new(timeline),
            output,
        }
    }

    /// Process a row.
    ///
    /// The two synthesized clips are staged as temporary files next to the
    /// output. They are removed once the export is done, whether it succeeded
    /// or not, and on every earlier failure.
    pub async fn process(&self, row: &VocabularyRow) -> Result<RowOutcome, PipelineError> {
        if !row.enabled {
            return Ok(RowOutcome::Skipped);
        }

        FileManager::ensure_parent_dir(&row.output_path)?;
        let work_dir = work_dir(&row.output_path);
        let prefix = format!(".vocaboost-{}-", row.line);

        let english = self.synthesizer
            .synthesize(&row.english_text, &self.voices.english)
            .await?;
        let english_file = FileManager::write_temp_file(&work_dir, &prefix, ".en.mp3", &english)?;

        let japanese = self.synthesizer
            .synthesize(&row.japanese_text, &self.voices.japanese)
            .await?;
        let japanese_file = FileManager::write_temp_file(&work_dir, &prefix, ".ja.mp3", &japanese)?;

        debug!("Assembling {} loop(s) for {}", row.loop_count, row.label());
        let timeline = self.timeline;
        let output_path = row.output_path.clone();
        let loop_count = row.loop_count;
        let bitrate_kbps = self.output.bitrate_kbps;

        tokio::task::spawn_blocking(move || -> Result<(), PipelineError> {
            let rendered = render(
                &timeline,
                english_file.path(),
                japanese_file.path(),
                loop_count,
                &output_path,
                bitrate_kbps,
            );
            let cleanup = english_file.close().and(japanese_file.close());
            rendered?;
            cleanup?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;

        let tags = TrackTags {
            title: row.title.clone(),
            artist: row.artist.clone(),
            album: row.album.clone(),
        };
        self.tag_writer.write_tags(&row.output_path, &tags)?;

        Ok(RowOutcome::Written(row.output_path.clone()))
    }
}

fn render(
    timeline: &AudioTimelineBuilder,
    english_path: &Path,
    japanese_path: &Path,
    loop_count: u32,
    output_path: &Path,
    bitrate_kbps: u32,
) -> Result<(), PipelineError> {
    let english = decode_file(english_path)?;
    let japanese = decode_file(japanese_path)?;
    let combined = timeline.build(english, japanese, loop_count)?;
    export_mp3(&combined, output_path, bitrate_kbps)?;
    Ok(())
}

fn work_dir(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
