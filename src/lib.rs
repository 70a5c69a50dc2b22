/*!
 * # vocaboost - bilingual vocabulary drill generator
 *
 * A Rust library for turning a CSV vocabulary script into English/Japanese
 * listening drills.
 *
 * ## Features
 *
 * - Speech synthesis through Google Cloud Text-to-Speech (service account auth)
 * - Configurable language order, sentence gap and loop gap
 * - Repeat loops per row
 * - MP3 export with ID3 title/artist/album tags
 * - Per-row error isolation with a final summary
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script`: CSV script reading
 * - `synthesis`: Speech synthesis backends:
 *   - `synthesis::google`: Google Cloud Text-to-Speech client
 *   - `synthesis::credentials`: Service account access tokens
 *   - `synthesis::mock`: Offline synthesizer for tests
 * - `audio`: Clip decoding, timeline assembly and MP3 export
 * - `tagging`: ID3 tag writing
 * - `pipeline`: Rendering of a single row
 * - `app_controller`: Batch processing of a whole script
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod errors;
pub mod file_utils;
pub mod pipeline;
pub mod script;
pub mod synthesis;
pub mod tagging;

// Re-export main types for easier usage
pub use app_config::{Config, TimelineOptions, VoicePair, VoiceProfile};
pub use app_controller::{BatchSummary, Controller};
pub use audio::{AudioClip, AudioTimelineBuilder};
pub use errors::{AudioError, ConfigError, PipelineError, SynthesisError, TagError};
pub use pipeline::{RowOutcome, RowPipeline};
pub use script::VocabularyRow;
pub use synthesis::{GoogleTts, SpeechSynthesizer};
pub use tagging::{Id3TagWriter, TagWriter, TrackTags};
