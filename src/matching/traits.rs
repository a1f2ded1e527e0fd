//! Trait definitions for external API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`SpotifyClient`] and [`CoverArtClient`], while
//! tests substitute the implementations in [`mocks`].

use async_trait::async_trait;

use super::domain::{AlbumHandle, AlbumTrack, LookupError, TrackMatch};
use crate::cover::{CoverArt, CoverArtClient};
use crate::spotify::SpotifyClient;

/// Track search and album lookup.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Ranked candidates for a query, at most `limit` of them.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<TrackMatch>, LookupError>;

    /// Complete tracklist of an album.
    async fn album_tracks(&self, album: &AlbumHandle) -> Result<Vec<AlbumTrack>, LookupError>;
}

/// Cover image download.
#[async_trait]
pub trait CoverArtApi: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CoverArt, LookupError>;
}

#[async_trait]
impl MetadataApi for SpotifyClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<TrackMatch>, LookupError> {
        self.search(query, limit).await
    }

    async fn album_tracks(&self, album: &AlbumHandle) -> Result<Vec<AlbumTrack>, LookupError> {
        self.album_tracks(album).await
    }
}

#[async_trait]
impl CoverArtApi for CoverArtClient {
    async fn fetch(&self, url: &str) -> Result<CoverArt, LookupError> {
        self.fetch(url).await
    }
}
