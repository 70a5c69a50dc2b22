use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::{ConfigError, PipelineError};
use crate::file_utils::FileManager;
use crate::pipeline::{RowOutcome, RowPipeline};
use crate::script::{RowFlag, ScriptReader, ScriptRecord};
use crate::synthesis::SpeechSynthesizer;
use crate::tagging::Id3TagWriter;

// @module: Batch processing of a vocabulary script

/// Name of the file listing failed rows, written next to the script
pub const ISSUES_LOG_FILE: &str = "vocaboost.issues.log";

/// Counts of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Per-row renderer
    pipeline: RowPipeline,
}

impl Controller {
    // @method: Create a controller rendering with the given synthesizer and ID3 tags
    pub fn new(config: Config, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        let pipeline = RowPipeline::new(
            synthesizer,
            Arc::new(Id3TagWriter),
            config.voices(),
            config.timeline,
            config.output,
        );
        Self::with_pipeline(config, pipeline)
    }

    // @method: Create a controller around an existing pipeline
    pub fn with_pipeline(config: Config, pipeline: RowPipeline) -> Self {
        Self { config, pipeline }
    }

    /// Render every enabled row of the script at `csv_path`.
    ///
    /// Writes each written path to `progress`, one per line in file order,
    /// then `finished`. A failed row is logged and counted, and the batch
    /// goes on unless `fail_fast` is set.
    pub async fn run<W: Write>(&self, csv_path: &Path, progress: &mut W) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        let delimiter = self.config.delimiter_byte()?;
        let records: Vec<Result<ScriptRecord, ConfigError>> =
            ScriptReader::open(csv_path, delimiter)?.records().collect();

        info!("Processing {} row(s) from {}", records.len(), csv_path.display());

        let progress_bar = ProgressBar::new(records.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let pipeline = &self.pipeline;
        // Rows may overlap when jobs > 1, results still come back in file order
        let mut results = std::pin::pin!(
            stream::iter(records)
                .map(|entry| process_record(pipeline, entry))
                .buffered(self.config.jobs.max(1))
        );

        let mut summary = BatchSummary::default();
        let mut failures = Vec::new();

        while let Some((label, result)) = results.next().await {
            progress_bar.inc(1);
            match result {
                Ok(RowOutcome::Written(path)) => {
                    progress_bar.suspend(|| writeln!(progress, "{}", path.display()))?;
                    summary.written += 1;
                }
                Ok(RowOutcome::Skipped) => {
                    summary.skipped += 1;
                }
                Err(e) => {
                    progress_bar.suspend(|| error!("{}: {} error: {}", label, e.kind(), e));
                    summary.failed += 1;
                    failures.push(format!("[{}] {}: {}", e.kind(), label, e));

                    if self.config.fail_fast {
                        progress_bar.abandon();
                        Self::report_issues(&failures, csv_path);
                        return Err(anyhow!("Aborted at {}: {}", label, e));
                    }
                }
            }
        }

        progress_bar.finish_and_clear();

        info!(
            "Batch completed in {}: {} written, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            summary.written,
            summary.skipped,
            summary.failed
        );

        Self::report_issues(&failures, csv_path);

        writeln!(progress, "finished")?;
        progress.flush()?;

        Ok(summary)
    }

    /// Write the issues log when any row failed; a write failure is only a warning
    fn report_issues(failures: &[String], csv_path: &Path) {
        if failures.is_empty() {
            return;
        }

        let log_path = issues_log_path(csv_path);
        if let Err(e) = Self::write_issues(failures, &log_path, csv_path) {
            warn!("Failed to write issues log: {}", e);
        } else {
            info!("Failed rows written to {}", log_path.display());
        }
    }

    /// Write failed rows to a log file
    fn write_issues(failures: &[String], log_path: &Path, csv_path: &Path) -> Result<()> {
        let mut content = String::new();
        content.push_str(&format!("Vocaboost Issues - {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));
        content.push_str(&format!("Script: {}\n\n", csv_path.display()));
        for failure in failures {
            content.push_str(failure);
            content.push('\n');
        }
        FileManager::write_to_file(log_path, &content)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Path of the issues log for a script
pub fn issues_log_path(csv_path: &Path) -> PathBuf {
    match csv_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(ISSUES_LOG_FILE),
        _ => PathBuf::from(ISSUES_LOG_FILE),
    }
}

/// Label of a record the reader could not decode
fn unreadable_label(error: &ConfigError) -> String {
    match error {
        ConfigError::UnreadableRecord { line: Some(line), .. } => format!("line {}", line),
        _ => "unreadable row".to_string(),
    }
}

async fn process_record(
    pipeline: &RowPipeline,
    entry: Result<ScriptRecord, ConfigError>,
) -> (String, Result<RowOutcome, PipelineError>) {
    let record = match entry {
        Ok(record) => record,
        Err(e) => return (unreadable_label(&e), Err(e.into())),
    };

    match record.flag() {
        RowFlag::Enabled => {}
        RowFlag::Disabled => return (format!("line {}", record.line), Ok(RowOutcome::Skipped)),
        RowFlag::Unrecognized(value) => {
            warn!("Line {}: unrecognized flag {:?}, row skipped", record.line, value);
            return (format!("line {}", record.line), Ok(RowOutcome::Skipped));
        }
    }

    let row = match record.to_row() {
        Ok(row) => row,
        Err(e) => return (format!("line {}", record.line), Err(e.into())),
    };

    let label = row.label();
    (label, pipeline.process(&row).await)
}
