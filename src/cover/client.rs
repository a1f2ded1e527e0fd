//! Image download client
//!
//! Spotify's image CDN needs no authentication, so this client is separate
//! from the Web API client and carries no token.

use std::time::Duration;

use super::{CoverArt, detect_mime_type};
use crate::matching::domain::LookupError;

const USER_AGENT: &str = concat!("gust/", env!("CARGO_PKG_VERSION"));

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Cover image client
pub struct CoverArtClient {
    http_client: reqwest::Client,
}

impl CoverArtClient {
    /// Create a new client
    pub fn new() -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| LookupError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    /// Download an image from a URL
    pub async fn fetch(&self, url: &str) -> Result<CoverArt, LookupError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::from_transport(&e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let data = response
            .bytes()
            .await
            .map_err(|e| LookupError::from_transport(&e))?
            .to_vec();

        if data.is_empty() {
            return Err(LookupError::InvalidResponse(format!("empty image at {}", url)));
        }

        Ok(CoverArt {
            mime_type: detect_mime_type(content_type.as_deref(), &data),
            data,
            url: url.to_string(),
        })
    }
}
