/*!
 * Mock synthesizer for testing.
 *
 * Produces real MP3 data (a sine tone whose length grows with the text) so
 * the whole decode/assemble/encode path can run offline:
 * - `MockSynthesizer::working()` - Always succeeds
 * - `MockSynthesizer::intermittent(n)` - Fails every n-th request
 * - `MockSynthesizer::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::f32::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::SpeechSynthesizer;
use crate::app_config::VoiceProfile;
use crate::audio::{encode_mp3, samples_for, AudioClip};
use crate::errors::SynthesisError;

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// Offline synthesizer used by tests
#[derive(Debug)]
pub struct MockSynthesizer {
    behavior: MockBehavior,
    sample_rate: u32,
    ms_per_char: u32,
    request_count: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockSynthesizer {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            sample_rate: 24_000,
            ms_per_char: 40,
            request_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of synthesize calls so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// `(language_code, text)` of every call, in order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Duration of the tone generated for `text`
    pub fn tone_ms(&self, text: &str) -> u32 {
        self.ms_per_char * text.chars().count() as u32
    }

    /// The PCM that `synthesize` encodes for `text`
    pub fn tone(&self, text: &str, voice: &VoiceProfile) -> AudioClip {
        let frequency = if voice.language_code.starts_with("ja") { 660.0 } else { 440.0 };
        let samples = (0..samples_for(self.tone_ms(text), self.sample_rate))
            .map(|i| {
                let t = i as f32 / self.sample_rate as f32;
                ((2.0 * PI * frequency * t).sin() * 0.3 * i16::MAX as f32) as i16
            })
            .collect();
        AudioClip::new(samples, self.sample_rate)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, SynthesisError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((voice.language_code.clone(), text.to_string()));
        }

        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        match self.behavior {
            MockBehavior::Failing => {
                return Err(SynthesisError::RequestFailed("Mock synthesizer failure".to_string()));
            }
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == 0 => {
                return Err(SynthesisError::ApiError {
                    status_code: 503,
                    message: format!("Mock intermittent failure on request {}", count),
                });
            }
            _ => {}
        }

        encode_mp3(&self.tone(text, voice), 64)
            .map_err(|e| SynthesisError::ParseError(e.to_string()))
    }
}
