use crate::error::{google_calendar_error, BotResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// OAuth scope for reading and writing calendars
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Token endpoint used when the key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they actually expire
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a Google service account JSON key the bot needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Read a key from a JSON file downloaded from the Cloud console
    pub fn from_file(path: impl AsRef<Path>) -> BotResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            google_calendar_error(&format!(
                "Failed to read service account file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> BotResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| google_calendar_error(&format!("Invalid service account key: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges signed service account assertions for access tokens
#[derive(Clone)]
pub struct TokenManager {
    key: Arc<ServiceAccountKey>,
    encoding_key: Arc<EncodingKey>,
    client: Client,
    cached: Arc<Mutex<Option<CachedToken>>>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Validate the private key up front so a bad key fails at startup
    pub fn new(key: ServiceAccountKey, client: Client) -> BotResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            google_calendar_error(&format!("Invalid service account private key: {}", e))
        })?;

        Ok(Self {
            key: Arc::new(key),
            encoding_key: Arc::new(encoding_key),
            client,
            cached: Arc::new(Mutex::new(None)),
        })
    }

    pub fn service_account_email(&self) -> &str {
        &self.key.client_email
    }

    /// Get a bearer token, reusing the cached one while it is still valid
    pub async fn get_token(&self) -> BotResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) {
                return Ok(token.access_token.clone());
            }
            debug!("Cached access token expired, requesting a new one");
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> BotResult<String> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: CALENDAR_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| google_calendar_error(&format!("Failed to sign assertion: {}", e)))
    }

    async fn request_token(&self) -> BotResult<CachedToken> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to request token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to request token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let expires_in = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        info!(
            "Obtained access token for {} (expires in {}s)",
            self.key.client_email, expires_in
        );

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_file_without_token_uri_uses_default() {
        let key = ServiceAccountKey::from_json(
            r#"{"type": "service_account", "client_email": "bot@project.iam.gserviceaccount.com", "private_key": "x"}"#,
        )
        .unwrap();

        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
        assert!(key.private_key_id.is_none());
    }

    #[test]
    fn key_debug_output_hides_private_key() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "bot@project.iam.gserviceaccount.com", "private_key": "SECRET"}"#,
        )
        .unwrap();

        assert!(!format!("{:?}", key).contains("SECRET"));
    }

    #[test]
    fn invalid_private_key_is_rejected() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "bot@project.iam.gserviceaccount.com", "private_key": "not a pem"}"#,
        )
        .unwrap();

        assert!(TokenManager::new(key, Client::new()).is_err());
    }

    #[test]
    fn missing_client_email_is_rejected() {
        assert!(ServiceAccountKey::from_json(r#"{"private_key": "x"}"#).is_err());
    }
}
