//! Spotify Web API Data Transfer Objects
//!
//! These types match what the Spotify API returns for the endpoints we use.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api
//!
//! Endpoints:
//! - `GET /v1/search?type=track` - ranked track candidates
//! - `GET /v1/albums/{id}/tracks` - paged album tracklist
//! - `POST https://accounts.spotify.com/api/token` - client credentials

use serde::{Deserialize, Serialize};

/// Search response for `type=track`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub tracks: Paging<Track>,
}

/// Generic paging object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// URL of the next page, absent on the last page
    pub next: Option<String>,
    #[serde(default)]
    pub total: u32,
}

/// Full track object as returned by search
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Album,
    pub track_number: u32,
    pub disc_number: u32,
    pub duration_ms: Option<u64>,
}

/// Simplified artist
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: Option<String>,
    pub name: String,
}

/// Simplified album nested in a track
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    /// YYYY, YYYY-MM or YYYY-MM-DD depending on `release_date_precision`
    #[serde(default)]
    pub release_date: String,
    pub release_date_precision: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub href: Option<String>,
}

/// Cover image
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Simplified track in an album tracklist
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    pub track_number: u32,
    pub disc_number: u32,
}

/// Client-credentials token response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

/// Error envelope returned by the Web API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

/// Error returned by the accounts service (OAuth style)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// ============================================================================
