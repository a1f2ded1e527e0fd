//! Client-credentials authentication against the Spotify accounts service.
//!
//! The exchange trades the client id and secret for a bearer token that is
//! valid for an hour. Tokens are plain values: refreshing produces a new
//! [`AccessToken`], which the client keeps and hands to a [`TokenStore`]
//! for caching between runs.

use super::{client, dto};
use crate::config::ConfigError;
use crate::matching::domain::LookupError;

/// Lifetime assumed for a freshly issued token, in seconds
pub const TOKEN_LIFETIME_SECS: f64 = 3600.0;

/// Spotify application credentials
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// A bearer token and the moment it stops working
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub token: String,
    /// Epoch seconds
    pub expires_at: f64,
}

impl AccessToken {
    pub fn is_valid_at(&self, now: f64) -> bool {
        !self.token.is_empty() && self.expires_at > now
    }
}

/// Where refreshed tokens are cached.
pub trait TokenStore: Send + Sync {
    fn save_token(&self, token: &AccessToken) -> Result<(), ConfigError>;
}

/// Current time as fractional epoch seconds
pub fn now_epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Perform one client-credentials exchange.
///
/// A 400/401 answer means the credentials themselves are wrong, which no
/// retry will fix.
pub(super) async fn exchange(
    http_client: &reqwest::Client,
    auth_url: &str,
    credentials: &Credentials,
) -> Result<AccessToken, LookupError> {
    let response = http_client
        .post(auth_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| LookupError::from_transport(&e))?;

    let status = response.status();

    if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED {
        let detail = match response.json::<dto::AuthErrorResponse>().await {
            Ok(body) => body.error_description.unwrap_or(body.error),
            Err(_) => format!("HTTP {status}"),
        };
        return Err(LookupError::Auth(detail));
    }

    if !status.is_success() {
        return Err(client::status_error(response).await);
    }

    let body: dto::TokenResponse = client::read_json(response).await?;
    if body.access_token.is_empty() {
        return Err(LookupError::InvalidResponse(
            "token response without access_token".to_string(),
        ));
    }

    Ok(AccessToken {
        token: body.access_token,
        expires_at: now_epoch_secs() + TOKEN_LIFETIME_SECS,
    })
}
