//! Internal domain models for track matching.
//!
//! These types are OUR types - they don't change when the Spotify API
//! changes. All API responses get converted into these via the adapter in
//! [`crate::spotify`].

use std::fmt;

/// Opaque reference used to look up an album's tracklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AlbumHandle(pub String);

impl fmt::Display for AlbumHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Album data nested in a search result
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlbumRef {
    pub name: String,
    /// Release date as given by the service (YYYY, YYYY-MM or YYYY-MM-DD)
    pub release_date: String,
    /// Album-level artist names
    pub artists: Vec<String>,
    /// Cover image URLs, largest first
    pub image_urls: Vec<String>,
    pub handle: AlbumHandle,
}

/// One candidate returned by a search
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackMatch {
    /// Service-side track id, for logging only
    pub id: String,
    pub name: String,
    /// Track artists in credited order
    pub artists: Vec<String>,
    pub album: AlbumRef,
    /// 1-based position on its disc
    pub track_number: u32,
    /// 1-based disc number
    pub disc_number: u32,
}

impl TrackMatch {
    /// Line shown to the operator when choosing between candidates.
    pub fn display_line(&self) -> String {
        let artist = self.artists.first().map(String::as_str).unwrap_or("?");
        format!("{} — {} ({})", artist, self.name, self.album.name)
    }
}

/// Position of one track in an album tracklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumTrack {
    pub track_number: u32,
    pub disc_number: u32,
}

/// Totals derived from the album a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumContext {
    /// Number of tracks on the matched track's disc (>= 1)
    pub total_tracks_in_disc: u32,
    /// Number of discs in the album (>= 1)
    pub total_discs: u32,
}

/// Errors that can occur while looking tracks up
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("Spotify rejected the credentials: {0}. Run `gust config api` to reconfigure.")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited - try again later")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Spotify server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("API request failed (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("No matches found")]
    NoMatches,

    #[error("Album tracklist is empty")]
    EmptyAlbum,
}

impl LookupError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LookupError::Timeout(_))
    }

    /// Failures worth retrying: the same request may succeed a moment later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LookupError::Network(_)
                | LookupError::Timeout(_)
                | LookupError::RateLimited { .. }
                | LookupError::Server { .. }
        )
    }

    /// Classify a reqwest transport error.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout(err.to_string())
        } else if err.is_decode() {
            LookupError::Parse(err.to_string())
        } else {
            LookupError::Network(err.to_string())
        }
    }
}
