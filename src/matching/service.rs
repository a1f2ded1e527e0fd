//! Tagging service - orchestrates matching and writing for each file
//!
//! For one file:
//! 1. Build a query from its current tags (or file name)
//! 2. Search and pick a match (automatic or interactive)
//! 3. Resolve album numbering (tracklist memoized per album)
//! 4. Fetch the cover, if the album has one
//! 5. Stage every field and commit once
//!
//! Files are processed strictly one after another. Per-file failures are
//! counted and skipped; anything else ends the run.

use super::context::AlbumContextResolver;
use super::domain::{AlbumContext, TrackMatch};
use super::query::build_query;
use super::resolver::MatchMode;
use super::traits::{CoverArtApi, MetadataApi};
use crate::cover::CoverArt;
use crate::error::{Error, Result};
use crate::matching::domain::LookupError;
use crate::model::AudioItem;
use crate::tagging::{self, TagStore, TagWriteOptions};

/// What was written to one file
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTrack {
    pub track: TrackMatch,
    pub context: AlbumContext,
    pub cover_embedded: bool,
}

/// Totals for a directory-wide run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tagged: usize,
    /// Files with no match
    pub skipped: usize,
    /// Files whose tags could not be read or written
    pub failed: usize,
}

/// Matches files against the metadata service and writes their tags
pub struct Tagger<'a> {
    api: &'a dyn MetadataApi,
    covers: &'a dyn CoverArtApi,
    mode: MatchMode,
    options: TagWriteOptions,
    contexts: AlbumContextResolver,
}

impl<'a> Tagger<'a> {
    pub fn new(
        api: &'a dyn MetadataApi,
        covers: &'a dyn CoverArtApi,
        mode: MatchMode,
        options: TagWriteOptions,
    ) -> Self {
        Self {
            api,
            covers,
            mode,
            options,
            contexts: AlbumContextResolver::new(),
        }
    }

    /// Match one item and write the result through `store`.
    pub async fn tag_item(&mut self, item: &AudioItem, store: &mut dyn TagStore) -> Result<TaggedTrack> {
        let query = build_query(item);
        tracing::debug!(file = %item.file_name(), query = %query, "Searching");

        let candidates = self.api.search(&query, self.mode.search_limit()).await?;
        let track = self.mode.choose(&item.file_name(), candidates)?;
        tracing::debug!(file = %item.file_name(), track_id = %track.id, "Matched {}", track.display_line());

        let context = self.contexts.resolve(self.api, &track).await?;
        let cover = self.fetch_cover(&track).await;

        tagging::write_tags(store, &track, &context, cover.as_ref(), &self.options)?;

        Ok(TaggedTrack {
            cover_embedded: cover.is_some(),
            track,
            context,
        })
    }

    /// Tag every item in order.
    ///
    /// `open` yields the tag store for an item; `report` sees each file's
    /// outcome before it is classified. Returns early on the first error
    /// that is not confined to a single file.
    pub async fn tag_items<O, R>(&mut self, items: &[AudioItem], mut open: O, mut report: R) -> Result<RunSummary>
    where
        O: FnMut(&AudioItem) -> Result<Box<dyn TagStore>>,
        R: FnMut(&AudioItem, &Result<TaggedTrack>),
    {
        let mut summary = RunSummary::default();
        tracing::debug!(files = items.len(), interactive = self.mode.is_interactive(), "Starting run");

        for item in items {
            let outcome = match open(item) {
                Ok(mut store) => self.tag_item(item, store.as_mut()).await,
                Err(e) => Err(e),
            };

            report(item, &outcome);

            match outcome {
                Ok(_) => summary.tagged += 1,
                Err(Error::Lookup(LookupError::NoMatches)) => {
                    tracing::info!(file = %item.file_name(), "No match; skipped");
                    summary.skipped += 1;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(file = %item.file_name(), "Tagging failed: {}", e);
                    summary.failed += 1;
                }
                Err(e) => return Err(e.context(item.file_name())),
            }
        }

        tracing::debug!(albums = self.contexts.cached_albums(), ?summary, "Run finished");
        Ok(summary)
    }

    async fn fetch_cover(&self, track: &TrackMatch) -> Option<CoverArt> {
        let url = track.album.image_urls.first()?;

        match self.covers.fetch(url).await {
            Ok(cover) => Some(cover),
            Err(e) => {
                tracing::warn!(url = %url, "Cover download failed, tagging without art: {}", e);
                None
            }
        }
    }
}
