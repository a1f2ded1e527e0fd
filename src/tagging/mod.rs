//! Tag writing policy.
//!
//! Turns a resolved [`TrackMatch`] plus its [`AlbumContext`] into field
//! writes on a [`TagStore`]. The policy is the same for every container;
//! only track/disc numbering branches, on whether the container keeps
//! number and total in one field ("N/total") or in two.
//!
//! Nothing here touches the filesystem. [`LoftyTagStore`] is the on-disk
//! store; tests use an in-memory one.
//!
//! [`LoftyTagStore`]: crate::metadata::LoftyTagStore

use crate::cover::CoverArt;
use crate::error::Result;
use crate::matching::domain::{AlbumContext, TrackMatch};
use crate::model::{ContainerKind, keys};

/// Album artist written when the album credits more than one artist
pub const VARIOUS_ARTISTS: &str = "Various Artists";

/// Fields the writer sets or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagField {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Date,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
}

impl TagField {
    pub const ALL: [TagField; 9] = [
        TagField::Title,
        TagField::Artist,
        TagField::Album,
        TagField::AlbumArtist,
        TagField::Date,
        TagField::TrackNumber,
        TagField::TrackTotal,
        TagField::DiscNumber,
        TagField::DiscTotal,
    ];

    /// Canonical tag name, as used in [`crate::model::AudioItem::tags`]
    pub fn key(self) -> &'static str {
        match self {
            TagField::Title => keys::TITLE,
            TagField::Artist => keys::ARTIST,
            TagField::Album => keys::ALBUM,
            TagField::AlbumArtist => keys::ALBUM_ARTIST,
            TagField::Date => keys::DATE,
            TagField::TrackNumber => keys::TRACK_NUMBER,
            TagField::TrackTotal => keys::TRACK_TOTAL,
            TagField::DiscNumber => keys::DISC_NUMBER,
            TagField::DiscTotal => keys::DISC_TOTAL,
        }
    }
}

/// Uniform view of one file's tag container.
///
/// Changes are staged until [`commit`](TagStore::commit) writes them out.
pub trait TagStore {
    fn container(&self) -> ContainerKind;

    fn supports_combined_number_total_fields(&self) -> bool {
        self.container().supports_combined_number_total_fields()
    }

    /// Replace all values of `field`.
    fn set_text_field(&mut self, field: TagField, values: &[String]) -> Result<()>;

    /// Remove `field`; removing an absent field is a no-op.
    fn remove_field(&mut self, field: TagField) -> Result<()>;

    /// Replace every embedded picture with `cover` as the front cover.
    fn set_picture(&mut self, cover: &CoverArt) -> Result<()>;

    /// Persist staged changes.
    fn commit(&mut self) -> Result<()>;
}

/// Operator switches for the writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagWriteOptions {
    /// Write the release date as given instead of the year alone
    pub use_full_date: bool,
    /// Keep disc fields on single-disc albums
    pub always_keep_disc_fields: bool,
}

impl TagWriteOptions {
    pub fn keep_disc_fields(&self, total_discs: u32) -> bool {
        (self.always_keep_disc_fields && total_discs == 1) || total_discs > 1
    }
}

/// Stage every field for a match, then the cover, then commit once.
pub fn write_tags(
    store: &mut dyn TagStore,
    track: &TrackMatch,
    context: &AlbumContext,
    cover: Option<&CoverArt>,
    options: &TagWriteOptions,
) -> Result<()> {
    apply_match(store, track, context, options)?;
    if let Some(cover) = cover {
        embed_cover(store, cover)?;
    }
    store.commit()
}

/// Stage the text fields for a match. Nothing is persisted.
pub fn apply_match(
    store: &mut dyn TagStore,
    track: &TrackMatch,
    context: &AlbumContext,
    options: &TagWriteOptions,
) -> Result<()> {
    store.set_text_field(TagField::Title, &[track.name.clone()])?;

    // A match without artists must not leave the previous file's artist behind
    if track.artists.is_empty() {
        store.remove_field(TagField::Artist)?;
    } else {
        store.set_text_field(TagField::Artist, &track.artists)?;
    }

    store.set_text_field(TagField::Album, &[track.album.name.clone()])?;

    if let Some(album_artist) = album_artist(&track.album.artists) {
        store.set_text_field(TagField::AlbumArtist, &[album_artist])?;
    }

    let date = release_date(&track.album.release_date, options.use_full_date);
    if !date.is_empty() {
        store.set_text_field(TagField::Date, &[date])?;
    }

    apply_numbering(store, track, context, options)
}

fn apply_numbering(
    store: &mut dyn TagStore,
    track: &TrackMatch,
    context: &AlbumContext,
    options: &TagWriteOptions,
) -> Result<()> {
    let keep_discs = options.keep_disc_fields(context.total_discs);

    if store.supports_combined_number_total_fields() {
        store.set_text_field(
            TagField::TrackNumber,
            &[format!("{}/{}", track.track_number, context.total_tracks_in_disc)],
        )?;

        if keep_discs {
            store.set_text_field(
                TagField::DiscNumber,
                &[format!("{}/{}", track.disc_number, context.total_discs)],
            )?;
        } else {
            store.remove_field(TagField::DiscNumber)?;
        }
    } else {
        store.set_text_field(TagField::TrackNumber, &[track.track_number.to_string()])?;
        store.set_text_field(
            TagField::TrackTotal,
            &[context.total_tracks_in_disc.to_string()],
        )?;

        if keep_discs {
            store.set_text_field(TagField::DiscNumber, &[track.disc_number.to_string()])?;
            store.set_text_field(TagField::DiscTotal, &[context.total_discs.to_string()])?;
        } else {
            store.remove_field(TagField::DiscNumber)?;
            store.remove_field(TagField::DiscTotal)?;
        }
    }

    Ok(())
}

/// Stage `cover` as the only embedded picture.
pub fn embed_cover(store: &mut dyn TagStore, cover: &CoverArt) -> Result<()> {
    tracing::debug!(url = %cover.url, bytes = cover.data.len(), "Embedding cover");
    store.set_picture(cover)
}

/// "Various Artists" for compilations, the sole name otherwise.
pub fn album_artist(artists: &[String]) -> Option<String> {
    match artists {
        [] => None,
        [only] => Some(only.clone()),
        _ => Some(VARIOUS_ARTISTS.to_string()),
    }
}

/// Release date as written: the year alone unless the full date is wanted.
pub fn release_date(date: &str, use_full_date: bool) -> String {
    if use_full_date {
        date.to_string()
    } else {
        date.chars().take(4).collect()
    }
}
