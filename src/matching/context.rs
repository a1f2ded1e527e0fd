//! Album-level numbering: tracks on the matched disc and discs overall.
//!
//! Tracklists are fetched once per album handle and kept for the rest of
//! the run, so tagging a whole album costs a single album lookup.

use std::collections::HashMap;

use super::domain::{AlbumContext, AlbumHandle, AlbumTrack, LookupError, TrackMatch};
use super::traits::MetadataApi;

/// Resolves [`AlbumContext`] for matches, memoizing tracklists per album
#[derive(Default)]
pub struct AlbumContextResolver {
    tracklists: HashMap<AlbumHandle, Vec<AlbumTrack>>,
}

impl AlbumContextResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn resolve(
        &mut self,
        api: &dyn MetadataApi,
        track: &TrackMatch,
    ) -> Result<AlbumContext, LookupError> {
        let handle = &track.album.handle;

        if !self.tracklists.contains_key(handle) {
            let tracks = api.album_tracks(handle).await?;
            self.tracklists.insert(handle.clone(), tracks);
        } else {
            tracing::debug!(album = %handle, "Reusing cached tracklist");
        }

        let tracks = self
            .tracklists
            .get(handle)
            .map(Vec::as_slice)
            .unwrap_or_default();

        compute_context(tracks, track.disc_number)
    }

    /// Number of distinct albums looked up so far
    pub fn cached_albums(&self) -> usize {
        self.tracklists.len()
    }
}

/// Count the entries on `disc` and take the highest disc number.
///
/// Neither value depends on the order the service lists tracks in.
pub fn compute_context(tracks: &[AlbumTrack], disc: u32) -> Result<AlbumContext, LookupError> {
    let total_discs = tracks
        .iter()
        .map(|t| t.disc_number)
        .max()
        .ok_or(LookupError::EmptyAlbum)?;

    let on_disc = tracks.iter().filter(|t| t.disc_number == disc).count();
    if on_disc == 0 {
        return Err(LookupError::InvalidResponse(format!(
            "album tracklist has no entries for disc {}",
            disc
        )));
    }

    Ok(AlbumContext {
        total_tracks_in_disc: on_disc as u32,
        total_discs: total_discs.max(1),
    })
}
