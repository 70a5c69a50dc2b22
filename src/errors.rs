/*!
 * Error types for the vocaboost application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors caused by malformed input: CLI values, config files, script rows or credentials
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is out of range or malformed
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending option
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// The loop count column is not an integer within the allowed range
    #[error(
        "Invalid loop count {:?} on line {}: expected an integer from 1 to {}",
        .value,
        .line,
        crate::audio::MAX_LOOP_COUNT
    )]
    InvalidLoopCount {
        /// Script line number
        line: u64,
        /// Raw value as found in the script
        value: String,
    },

    /// A script row does not have the expected number of fields
    #[error("Line {line} has {found} fields, expected {expected}")]
    FieldCount {
        /// Script line number
        line: u64,
        /// Number of fields found
        found: usize,
        /// Number of fields required
        expected: usize,
    },

    /// The script could not be read or parsed as CSV
    #[error("Failed to read script: {0}")]
    Script(String),

    /// A single record of the script could not be read
    #[error("Unreadable record: {message}")]
    UnreadableRecord {
        /// Script line number, when the reader knows it
        line: Option<u64>,
        /// Reader message
        message: String,
    },

    /// The service account key could not be loaded
    #[error("Invalid credentials: {0}")]
    Credentials(String),
}

/// Errors that can occur when talking to the speech synthesis backend
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The text to synthesize is empty
    #[error("Cannot synthesize empty text")]
    EmptyText,

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error related to quotas or rate limiting
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised while decoding, assembling or encoding audio
#[derive(Error, Debug)]
pub enum AudioError {
    /// The input could not be decoded
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// The output could not be encoded
    #[error("Failed to encode audio: {0}")]
    Encode(String),

    /// Two clips that must be concatenated have different sample rates
    #[error("Sample rate mismatch: {first} Hz vs {second} Hz")]
    SampleRateMismatch {
        /// Rate of the first clip
        first: u32,
        /// Rate of the second clip
        second: u32,
    },

    /// A timeline was requested with zero loops or too many
    #[error("Loop count must be from 1 to {}, got {}", crate::audio::MAX_LOOP_COUNT, .0)]
    InvalidLoopCount(u32),

    /// File system error while reading or writing audio
    #[error("Audio I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the tag writer
#[derive(Error, Debug)]
pub enum TagError {
    /// The tag could not be read from or written to the file
    #[error("Failed to write tags to {path}: {message}")]
    Write {
        /// File being tagged
        path: String,
        /// Underlying library message
        message: String,
    },
}

/// Errors that can stop a single row from being rendered
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed row or configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Speech synthesis failed
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Audio decoding, assembly or export failed
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Tagging the finished file failed
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// Directory creation, temp file handling or other file system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Short label for the error kind, used in per-row log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Synthesis(_) => "synthesis",
            Self::Audio(_) => "audio",
            Self::Tag(_) => "tag",
            Self::Io(_) => "io",
        }
    }
}
