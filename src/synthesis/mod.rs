/*!
 * Speech synthesis backends.
 *
 * - `google`: Google Cloud Text-to-Speech REST client
 * - `credentials`: service account key loading and OAuth2 access tokens
 * - `mock`: offline synthesizer producing tones, for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::VoiceProfile;
use crate::errors::SynthesisError;

/// Common trait for all speech synthesis backends
///
/// Implementations own their credentials and may be shared across rows.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesize `text` with `voice`
    ///
    /// # Returns
    /// * `Result<Vec<u8>, SynthesisError>` - MP3 encoded speech or an error
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, SynthesisError>;
}

pub mod credentials;
pub mod google;
pub mod mock;

pub use google::GoogleTts;
pub use mock::MockSynthesizer;
