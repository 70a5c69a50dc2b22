// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use vocaboost::app_config::{self, Config};
use vocaboost::{Controller, GoogleTts};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for vocaboost
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// vocaboost - bilingual vocabulary drill generator
///
/// Reads a CSV script and renders one English/Japanese MP3 drill per enabled row
/// using Google Cloud Text-to-Speech.
#[derive(Parser, Debug)]
#[command(name = "vocaboost")]
#[command(version)]
#[command(about = "Generate English/Japanese vocabulary drill MP3 files from a CSV script")]
#[command(subcommand_negates_reqs = true)]
#[command(long_about = "vocaboost synthesizes an English and a Japanese sentence for every enabled row of a
CSV script, joins them with silence, repeats them and saves a tagged MP3 file.
English is spoken first unless --japanese_top is given.

SCRIPT FORMAT:
    The first line is a header and is skipped. Every other line has 8 fields:
    flag(y|n), artist, album, title, english, japanese, output_path, loop_count

EXAMPLES:
    vocaboost -f words.csv -k key.json                # Render all rows marked 'y'
    vocaboost -f words.csv -k key.json -t             # Japanese first
    vocaboost -f words.csv -k key.json -s 800 -l 2000 # Longer gaps
    vocaboost -f words.tsv -k key.json -r '\\t'        # Tab separated script
    vocaboost completions bash > vocaboost.bash       # Generate bash completions")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path of the CSV script
    #[arg(short = 'f', long = "file_of_path", required = true)]
    file_of_path: Option<PathBuf>,

    /// Path of the service account key file (.json)
    #[arg(short = 'k', long = "servicekey_of_file", required = true)]
    servicekey_of_file: Option<PathBuf>,

    /// Speak Japanese before English
    #[arg(short = 't', long = "japanese_top")]
    japanese_top: bool,

    /// English speaking rate [default: 1.0]
    #[arg(short = 'e', long = "english_speaking_rate")]
    english_speaking_rate: Option<f32>,

    /// Japanese speaking rate [default: 1.5]
    #[arg(short = 'j', long = "japanese_speaking_rate")]
    japanese_speaking_rate: Option<f32>,

    /// Silence between the English and Japanese sentences in msec [default: 500]
    #[arg(short = 's', long = "between_sentences")]
    between_sentences: Option<u32>,

    /// Silence between two loops in msec [default: 1000]
    #[arg(short = 'l', long = "between_the_loop")]
    between_the_loop: Option<u32>,

    /// Field delimiter of the CSV script [default: ,]
    #[arg(short = 'r', long = "delimiter", value_parser = parse_delimiter)]
    delimiter: Option<char>,

    /// Configuration file path
    #[arg(short = 'c', long = "config_path")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(long = "log_level", value_enum)]
    log_level: Option<CliLogLevel>,

    /// Number of rows rendered at the same time [default: 1]
    #[arg(long = "jobs")]
    jobs: Option<usize>,

    /// Stop at the first row that fails
    #[arg(long = "fail_fast")]
    fail_fast: bool,
}

/// Accept a single character, or `\t` for tab
fn parse_delimiter(value: &str) -> Result<char, String> {
    if value == "\\t" {
        return Ok('\t');
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("delimiter must be a single character, got {:?}", value)),
    }
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger with the most verbose level; the effective level
    // is applied through log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "vocaboost", &mut std::io::stdout());
        return Ok(());
    }

    run(cli).await
}

async fn run(options: CommandLineOptions) -> Result<()> {
    let script_path = options.file_of_path.clone()
        .ok_or_else(|| anyhow!("--file_of_path is required"))?;
    let key_path = options.servicekey_of_file.clone()
        .ok_or_else(|| anyhow!("--servicekey_of_file is required"))?;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_config(&options)?;

    // Validate the configuration after loading and overriding
    config.validate()?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let synthesizer = GoogleTts::from_key_file(&config.synthesis, &key_path)?;
    info!(
        "Voices: {} ({}x) / {} ({}x)",
        config.english_voice.voice_name,
        config.english_voice.speaking_rate,
        config.japanese_voice.voice_name,
        config.japanese_voice.speaking_rate
    );

    let controller = Controller::new(config, Arc::new(synthesizer));
    let summary = controller.run(&script_path, &mut std::io::stdout()).await?;

    if !summary.is_success() {
        return Err(anyhow!(
            "{} of {} row(s) failed",
            summary.failed,
            summary.total()
        ));
    }

    Ok(())
}

/// Load or create the configuration, then apply command line overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let mut config = match &options.config_path {
        Some(path) if Path::new(path).exists() => Config::from_file(path)?,
        Some(path) => {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            config.save(path)?;
            config
        }
        None => Config::default(),
    };

    if options.japanese_top {
        config.timeline.japanese_first = true;
    }
    if let Some(rate) = options.english_speaking_rate {
        config.english_voice.speaking_rate = rate;
    }
    if let Some(rate) = options.japanese_speaking_rate {
        config.japanese_voice.speaking_rate = rate;
    }
    if let Some(ms) = options.between_sentences {
        config.timeline.gap_between_sentences_ms = ms;
    }
    if let Some(ms) = options.between_the_loop {
        config.timeline.gap_between_loops_ms = ms;
    }
    if let Some(delimiter) = options.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(jobs) = options.jobs {
        config.jobs = jobs;
    }
    if options.fail_fast {
        config.fail_fast = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
