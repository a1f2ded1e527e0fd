//! Local entities: audio files under management and their tag containers.
//!
//! An [`AudioItem`] is built once by probing a file during the directory
//! walk. Its [`ContainerKind`] never changes afterwards and decides how
//! track/disc numbering is laid out when tags are written back.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical tag names used in [`AudioItem::tags`].
pub mod keys {
    pub const TITLE: &str = "title";
    pub const ARTIST: &str = "artist";
    pub const ALBUM: &str = "album";
    pub const ALBUM_ARTIST: &str = "albumartist";
    pub const DATE: &str = "date";
    pub const TRACK_NUMBER: &str = "tracknumber";
    pub const TRACK_TOTAL: &str = "tracktotal";
    pub const DISC_NUMBER: &str = "discnumber";
    pub const DISC_TOTAL: &str = "disctotal";
}

/// On-disk tag format family of a supported audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// MP3 with an ID3v2 tag
    Id3,
    /// Native FLAC (Vorbis comments + PICTURE blocks)
    Flac,
    /// Ogg Vorbis
    Vorbis,
    /// Ogg Opus
    Opus,
}

impl ContainerKind {
    /// Whether a single field holds "N/total" for track and disc numbering.
    ///
    /// ID3v2 stores numbering in TRCK/TPOS as "N/total"; Vorbis comments use
    /// separate TRACKNUMBER/TRACKTOTAL and DISCNUMBER/DISCTOTAL fields.
    pub fn supports_combined_number_total_fields(self) -> bool {
        matches!(self, ContainerKind::Id3)
    }

    /// Container kind implied by a file extension, before probing.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(ContainerKind::Id3),
            "flac" => Some(ContainerKind::Flac),
            "ogg" => Some(ContainerKind::Vorbis),
            "opus" => Some(ContainerKind::Opus),
            _ => None,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::Id3 => "ID3v2",
            ContainerKind::Flac => "FLAC",
            ContainerKind::Vorbis => "Ogg Vorbis",
            ContainerKind::Opus => "Ogg Opus",
        };
        f.write_str(name)
    }
}

/// One local audio file and the tags it had when it was probed.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioItem {
    path: PathBuf,
    container: ContainerKind,
    /// Canonical tag name (see [`keys`]) to its values
    pub tags: BTreeMap<String, Vec<String>>,
}

impl AudioItem {
    pub fn new(path: impl Into<PathBuf>, container: ContainerKind) -> Self {
        Self {
            path: path.into(),
            container,
            tags: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach a tag value.
    pub fn with_tag(mut self, key: &str, value: impl Into<String>) -> Self {
        self.tags
            .entry(key.to_string())
            .or_default()
            .push(value.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn container(&self) -> ContainerKind {
        self.container
    }

    /// File name for display, falling back to the full path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// All non-empty values of a tag joined with ", ".
    ///
    /// Returns `None` when the tag is missing or only holds blank values.
    pub fn tag_text(&self, key: &str) -> Option<String> {
        let values: Vec<&str> = self
            .tags
            .get(key)?
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }
}
