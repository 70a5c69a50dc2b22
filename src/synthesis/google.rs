use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::credentials::{ServiceAccountKey, TokenProvider};
use super::SpeechSynthesizer;
use crate::app_config::{SynthesisConfig, VoiceProfile};
use crate::errors::{ConfigError, SynthesisError};

/// Google Cloud Text-to-Speech client
#[derive(Debug)]
pub struct GoogleTts {
    /// HTTP client for API requests
    client: Client,
    /// API base URL
    endpoint: String,
    /// Sample rate requested for every clip
    sample_rate_hertz: u32,
    /// Access token source
    auth: TokenProvider,
}

/// `text:synthesize` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelection,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
pub struct SynthesisInput {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub language_code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
    pub speaking_rate: f32,
    pub sample_rate_hertz: u32,
}

/// `text:synthesize` response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    /// Base64 encoded audio
    pub audio_content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl SynthesizeRequest {
    pub fn new(text: &str, voice: &VoiceProfile, sample_rate_hertz: u32) -> Self {
        Self {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceSelection {
                language_code: voice.language_code.clone(),
                name: voice.voice_name.clone(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
                speaking_rate: voice.speaking_rate,
                sample_rate_hertz,
            },
        }
    }
}

impl SynthesizeResponse {
    /// Decoded audio bytes
    pub fn into_audio(self) -> Result<Vec<u8>, SynthesisError> {
        let audio = STANDARD
            .decode(self.audio_content.trim())
            .map_err(|e| SynthesisError::ParseError(format!("audioContent is not base64: {}", e)))?;
        if audio.is_empty() {
            return Err(SynthesisError::ParseError("audioContent is empty".to_string()));
        }
        Ok(audio)
    }
}

/// Map a non-success HTTP status and body to an error
pub fn error_for_status(status_code: u16, body: &str) -> SynthesisError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{}: {}", envelope.error.status, envelope.error.message)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => body.to_string(),
    };

    match status_code {
        401 | 403 => SynthesisError::AuthenticationError(message),
        429 => SynthesisError::QuotaExceeded(message),
        _ => SynthesisError::ApiError { status_code, message },
    }
}

impl GoogleTts {
    /// Create a new client for the given service account
    pub fn new(config: &SynthesisConfig, key: ServiceAccountKey) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        let auth = TokenProvider::new(key, client.clone())?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            sample_rate_hertz: config.sample_rate_hertz,
            auth,
        })
    }

    /// Create a client from a service account key file
    pub fn from_key_file<P: AsRef<Path>>(config: &SynthesisConfig, path: P) -> Result<Self, ConfigError> {
        Self::new(config, ServiceAccountKey::from_file(path)?)
    }

    fn api_url(&self) -> String {
        format!("{}/v1/text:synthesize", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let token = self.auth.access_token().await?;
        let request = SynthesizeRequest::new(text, voice, self.sample_rate_hertz);

        debug!("Synthesizing {} chars with {}", text.chars().count(), voice.voice_name);
        let response = self.client.post(self.api_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| SynthesisError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Text-to-Speech API error ({}): {}", status, body);
            return Err(error_for_status(status.as_u16(), &body));
        }

        response.json::<SynthesizeResponse>().await
            .map_err(|e| SynthesisError::ParseError(e.to_string()))?
            .into_audio()
    }
}
