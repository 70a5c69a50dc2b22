/*!
 * Service account credentials.
 *
 * Access tokens are obtained with the OAuth2 JWT bearer flow: a JWT signed
 * with the account's private key is exchanged at the key's `token_uri`.
 * The token is cached until shortly before it expires.
 */

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::errors::{ConfigError, SynthesisError};

/// OAuth2 scope required by the Text-to-Speech API
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tokens are refreshed this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime requested for the signed assertion, in seconds
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Fields of a service account key file that are needed for authentication
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: String,

    #[serde(default)]
    pub project_id: String,

    pub client_email: String,

    pub private_key: String,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    /// Load a key file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Credentials(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse the JSON content of a key file
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let key: Self = serde_json::from_str(content)
            .map_err(|e| ConfigError::Credentials(format!("malformed key file: {}", e)))?;

        if !key.key_type.is_empty() && key.key_type != "service_account" {
            return Err(ConfigError::Credentials(format!(
                "expected a service_account key, got {:?}",
                key.key_type
            )));
        }
        if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
            return Err(ConfigError::Credentials(
                "client_email and private_key are required".to_string(),
            ));
        }

        Ok(key)
    }
}

/// Claims of the JWT bearer assertion
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Issues and caches access tokens for one service account
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_email", &self.key.client_email)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Fails when the private key is not a valid RSA PEM key
    pub fn new(key: ServiceAccountKey, client: Client) -> Result<Self, ConfigError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| ConfigError::Credentials(format!("invalid private key: {}", e)))?;

        Ok(Self {
            key,
            encoding_key,
            client,
            cached: Mutex::new(None),
        })
    }

    /// A valid access token, fetching a new one when needed
    pub async fn access_token(&self) -> Result<String, SynthesisError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() + EXPIRY_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting access token for {}", self.key.client_email);
        let response = self.fetch_token().await?;
        let value = response.access_token.clone();
        *cached = Some(CachedToken {
            value: response.access_token,
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });

        Ok(value)
    }

    fn assertion(&self, now: i64) -> Result<String, SynthesisError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| SynthesisError::AuthenticationError(format!("failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> Result<TokenResponse, SynthesisError> {
        let assertion = self.assertion(chrono::Utc::now().timestamp())?;

        let response = self.client.post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SynthesisError::RequestFailed(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 | 401 | 403 => SynthesisError::AuthenticationError(body),
                code => SynthesisError::ApiError { status_code: code, message: body },
            });
        }

        response.json::<TokenResponse>().await
            .map_err(|e| SynthesisError::ParseError(format!("token response: {}", e)))
    }
}
