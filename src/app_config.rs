use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles loading, validating and saving the run configuration.
/// Everything a component needs is handed to it from here; nothing reads
/// global state.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Voice used for the English sentence
    #[serde(default = "VoiceProfile::english")]
    pub english_voice: VoiceProfile,

    /// Voice used for the Japanese sentence
    #[serde(default = "VoiceProfile::japanese")]
    pub japanese_voice: VoiceProfile,

    /// Ordering and silence gaps of the rendered timeline
    #[serde(default)]
    pub timeline: TimelineOptions,

    /// Speech synthesis backend settings
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Output encoding settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Field delimiter of the CSV script
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Number of rows rendered at the same time
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Abort the batch on the first failed row
    #[serde(default)]
    pub fail_fast: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Language, voice and rate sent to the synthesis backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoiceProfile {
    /// BCP-47 language code, e.g. "en-US"
    pub language_code: String,

    /// Backend voice identifier, e.g. "en-US-Wavenet-D"
    pub voice_name: String,

    /// Speaking rate, 1.0 is the voice's natural speed
    pub speaking_rate: f32,
}

impl VoiceProfile {
    // @returns: Default English voice
    pub fn english() -> Self {
        Self {
            language_code: "en-US".to_string(),
            voice_name: "en-US-Wavenet-D".to_string(),
            speaking_rate: 1.0,
        }
    }

    // @returns: Default Japanese voice
    pub fn japanese() -> Self {
        Self {
            language_code: "ja-JP".to_string(),
            voice_name: "ja-JP-Wavenet-D".to_string(),
            speaking_rate: 1.5,
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.language_code.trim().is_empty() || self.voice_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: "language code and voice name must not be empty".to_string(),
            });
        }
        if !(self.speaking_rate.is_finite() && self.speaking_rate > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.speaking_rate", field),
                message: format!("must be a positive number, got {}", self.speaking_rate),
            });
        }
        Ok(())
    }
}

/// The two voices of a run
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePair {
    pub english: VoiceProfile,
    pub japanese: VoiceProfile,
}

/// Layout of the rendered timeline
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Speak the Japanese sentence before the English one
    #[serde(default)]
    pub japanese_first: bool,

    /// Silence between the two sentences of a loop, in milliseconds
    #[serde(default = "default_gap_between_sentences_ms")]
    pub gap_between_sentences_ms: u32,

    /// Silence between two loops, in milliseconds
    #[serde(default = "default_gap_between_loops_ms")]
    pub gap_between_loops_ms: u32,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            japanese_first: false,
            gap_between_sentences_ms: default_gap_between_sentences_ms(),
            gap_between_loops_ms: default_gap_between_loops_ms(),
        }
    }
}

/// Speech synthesis service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Service endpoint URL
    #[serde(default = "default_synthesis_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sample rate requested for every clip
    #[serde(default = "default_sample_rate_hertz")]
    pub sample_rate_hertz: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_synthesis_endpoint(),
            timeout_secs: default_timeout_secs(),
            sample_rate_hertz: default_sample_rate_hertz(),
        }
    }
}

/// Output encoding configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Constant MP3 bitrate in kbps
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bitrate_kbps: default_bitrate_kbps(),
        }
    }
}

/// Bitrates accepted for the output encoder
pub const SUPPORTED_BITRATES_KBPS: [u32; 6] = [32, 48, 64, 96, 128, 160];

/// Longest silence allowed between sentences or loops, in milliseconds
pub const MAX_GAP_MS: u32 = 60_000;

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_delimiter() -> char {
    ','
}

fn default_jobs() -> usize {
    1
}

fn default_gap_between_sentences_ms() -> u32 {
    500
}

fn default_gap_between_loops_ms() -> u32 {
    1000
}

fn default_synthesis_endpoint() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_sample_rate_hertz() -> u32 {
    24_000
}

fn default_bitrate_kbps() -> u32 {
    128
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// The voices of this run
    pub fn voices(&self) -> VoicePair {
        VoicePair {
            english: self.english_voice.clone(),
            japanese: self.japanese_voice.clone(),
        }
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::InvalidValue {
                field: "delimiter".to_string(),
                message: format!("must be a single ASCII character, got {:?}", self.delimiter),
            })
        }
    }

    /// Validate the configuration after loading and CLI overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.english_voice.validate("english_voice")?;
        self.japanese_voice.validate("japanese_voice")?;
        self.delimiter_byte()?;

        for (field, gap) in [
            ("timeline.gap_between_sentences_ms", self.timeline.gap_between_sentences_ms),
            ("timeline.gap_between_loops_ms", self.timeline.gap_between_loops_ms),
        ] {
            if gap > MAX_GAP_MS {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("{} ms exceeds the {} ms limit", gap, MAX_GAP_MS),
                });
            }
        }

        if self.jobs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jobs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.synthesis.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "synthesis.endpoint".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.synthesis.sample_rate_hertz == 0 {
            return Err(ConfigError::InvalidValue {
                field: "synthesis.sample_rate_hertz".to_string(),
                message: "must be positive".to_string(),
            });
        }

        if !SUPPORTED_BITRATES_KBPS.contains(&self.output.bitrate_kbps) {
            return Err(ConfigError::InvalidValue {
                field: "output.bitrate_kbps".to_string(),
                message: format!(
                    "{} is not one of {:?}",
                    self.output.bitrate_kbps, SUPPORTED_BITRATES_KBPS
                ),
            });
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            english_voice: VoiceProfile::english(),
            japanese_voice: VoiceProfile::japanese(),
            timeline: TimelineOptions::default(),
            synthesis: SynthesisConfig::default(),
            output: OutputConfig::default(),
            delimiter: default_delimiter(),
            jobs: default_jobs(),
            fail_fast: false,
            log_level: LogLevel::default(),
        }
    }
}
