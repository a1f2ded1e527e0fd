//! Spotify Web API client
//!
//! Handles token management and the two lookups the tagger needs: track
//! search and album tracklists.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! Every request carries a bearer token obtained through the client
//! credentials flow. A 401 from the Web API invalidates the current token;
//! the request is replayed once with a fresh one.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::auth::{self, AccessToken, Credentials, TokenStore};
use super::retry::{RetryPolicy, with_retry};
use super::{adapter, dto};
use crate::matching::domain::{AlbumHandle, AlbumTrack, LookupError, TrackMatch};

pub const API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const AUTH_URL: &str = "https://accounts.spotify.com/api/token";

const USER_AGENT: &str = concat!("gust/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Page size for album tracklists (the API maximum)
const ALBUM_PAGE_SIZE: u32 = 50;

/// Hard stop for `next` links, well above any real box set
const MAX_ALBUM_PAGES: usize = 40;

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    api_base: String,
    auth_url: String,
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
    token_store: Box<dyn TokenStore>,
    api_retry: RetryPolicy,
    token_retry: RetryPolicy,
}

impl SpotifyClient {
    /// Create a client, optionally seeded with a cached token.
    pub fn new(
        credentials: Credentials,
        cached_token: Option<AccessToken>,
        token_store: Box<dyn TokenStore>,
    ) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LookupError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            api_base: API_BASE_URL.to_string(),
            auth_url: AUTH_URL.to_string(),
            credentials,
            token: Mutex::new(cached_token),
            token_store,
            api_retry: RetryPolicy::API,
            token_retry: RetryPolicy::TOKEN_EXCHANGE,
        })
    }

    /// Point the client at other endpoints (for testing)
    #[cfg(test)]
    pub fn with_endpoints(mut self, api_base: impl Into<String>, auth_url: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.auth_url = auth_url.into();
        self
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Ok(http_client) = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
        {
            self.http_client = http_client;
        }
        self
    }

    #[cfg(test)]
    pub fn with_retry_policies(mut self, api: RetryPolicy, token: RetryPolicy) -> Self {
        self.api_retry = api;
        self.token_retry = token;
        self
    }

    /// Make sure a valid token is held, exchanging credentials if needed.
    pub async fn ensure_token(&self) -> Result<(), LookupError> {
        self.bearer().await.map(|_| ())
    }

    /// Search tracks, best match first
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<TrackMatch>, LookupError> {
        let url = format!("{}/search", self.api_base);
        let limit = limit.to_string();
        let params = [("q", query), ("type", "track"), ("limit", limit.as_str())];

        let response: dto::SearchResponse = self.get_json(&url, &params).await?;
        adapter::to_matches(response)
    }

    /// Full tracklist of an album, following pagination
    pub async fn album_tracks(&self, album: &AlbumHandle) -> Result<Vec<AlbumTrack>, LookupError> {
        let mut url = format!(
            "{}/albums/{}/tracks?limit={}",
            self.api_base,
            urlencoding::encode(&album.0),
            ALBUM_PAGE_SIZE
        );
        let mut tracks = Vec::new();

        for page_index in 1..=MAX_ALBUM_PAGES {
            let page: dto::Paging<dto::AlbumTrack> = self.get_json(&url, &[]).await?;
            tracks.extend(adapter::to_album_tracks(page.items));

            match page.next {
                Some(next) if page_index < MAX_ALBUM_PAGES => url = next,
                Some(_) => {
                    tracing::warn!(album = %album, "Album tracklist truncated after {} pages", MAX_ALBUM_PAGES);
                }
                None => break,
            }
        }

        tracing::debug!(album = %album, tracks = tracks.len(), "Fetched album tracklist");
        Ok(tracks)
    }

    /// Current token, refreshed when missing or expired
    async fn bearer(&self) -> Result<String, LookupError> {
        let mut held = self.token.lock().await;

        if let Some(token) = held.as_ref().filter(|t| t.is_valid_at(auth::now_epoch_secs())) {
            return Ok(token.token.clone());
        }

        tracing::info!("Requesting Spotify access token");
        let fresh = with_retry(&self.token_retry, "token exchange", LookupError::is_timeout, || {
            auth::exchange(&self.http_client, &self.auth_url, &self.credentials)
        })
        .await?;

        if let Err(e) = self.token_store.save_token(&fresh) {
            tracing::warn!("Could not cache access token: {}", e);
        }

        let value = fresh.token.clone();
        *held = Some(fresh);
        Ok(value)
    }

    /// Drop the held token if it is still the one the server rejected
    async fn invalidate(&self, rejected: &str) {
        let mut held = self.token.lock().await;
        if held.as_ref().is_some_and(|t| t.token == rejected) {
            *held = None;
        }
    }

    /// GET with a bearer token; a rejected token is refreshed and the
    /// request replayed once.
    ///
    /// Token exchange stays outside the request retry loop so its own
    /// policy is the only one applied to it.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let token = self.bearer().await?;

        match self.get_json_with(url, params, &token).await {
            Err(LookupError::Auth(_)) => {
                tracing::info!("Access token rejected; refreshing");
                self.invalidate(&token).await;

                let token = self.bearer().await?;
                self.get_json_with(url, params, &token)
                    .await
                    .map_err(|e| match e {
                        LookupError::Auth(_) => {
                            LookupError::Auth("access token rejected after refresh".to_string())
                        }
                        other => other,
                    })
            }
            other => other,
        }
    }

    async fn get_json_with<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        token: &str,
    ) -> Result<T, LookupError> {
        with_retry(&self.api_retry, "spotify request", LookupError::is_transient, || {
            self.get_json_once(url, params, token)
        })
        .await
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        token: &str,
    ) -> Result<T, LookupError> {
        let response = self.send_get(url, params, token).await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        read_json(response).await
    }

    async fn send_get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        token: &str,
    ) -> Result<reqwest::Response, LookupError> {
        let mut request = self.http_client.get(url).bearer_auth(token);
        if !params.is_empty() {
            request = request.query(params);
        }

        request
            .send()
            .await
            .map_err(|e| LookupError::from_transport(&e))
    }
}

/// Map a non-success response to a lookup error
pub(super) async fn status_error(response: reqwest::Response) -> LookupError {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return LookupError::RateLimited { retry_after_secs };
    }

    let message = match response.json::<dto::ApiErrorResponse>().await {
        Ok(body) => body.error.message,
        Err(_) => status.canonical_reason().unwrap_or("Unknown").to_string(),
    };

    if status == reqwest::StatusCode::UNAUTHORIZED {
        LookupError::Auth(message)
    } else if status.is_server_error() {
        LookupError::Server {
            status: status.as_u16(),
            message,
        }
    } else {
        LookupError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Read the whole body, then decode it; a body cut short is a network
/// failure, a malformed one is a parse failure.
pub(super) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, LookupError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| LookupError::from_transport(&e))?;

    serde_json::from_slice(&body).map_err(|e| LookupError::Parse(e.to_string()))
}
