//! Test utilities and fixtures for gust tests.
//!
//! This module provides common test helpers, mock factories, and an
//! in-memory tag store to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{MemoryTagStore, make_match};
//!
//! #[test]
//! fn test_something() {
//!     let mut store = MemoryTagStore::new(ContainerKind::Flac);
//!     let track = make_match("Song", 1, 1);
//!     // ... test logic
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::cover::CoverArt;
use crate::error::{Error, Result};
use crate::matching::domain::{AlbumHandle, AlbumRef, AlbumTrack, TrackMatch};
use crate::matching::resolver::{Selection, Selector};
use crate::model::ContainerKind;
use crate::tagging::{TagField, TagStore};

/// Tag store that keeps everything in memory.
///
/// Fields and pictures are public so tests can seed and inspect them
/// directly. Staged and committed state are the same.
#[derive(Debug, Clone)]
pub struct MemoryTagStore {
    pub container: ContainerKind,
    pub fields: BTreeMap<TagField, Vec<String>>,
    pub pictures: Vec<CoverArt>,
    pub commits: usize,
    fail_commit: bool,
}

impl MemoryTagStore {
    pub fn new(container: ContainerKind) -> Self {
        Self {
            container,
            fields: BTreeMap::new(),
            pictures: Vec::new(),
            commits: 0,
            fail_commit: false,
        }
    }

    /// Seed an existing field value.
    pub fn with_field(mut self, field: TagField, value: &str) -> Self {
        self.fields.insert(field, vec![value.to_string()]);
        self
    }

    /// Make every commit fail like a read-only file would.
    pub fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn field(&self, field: TagField) -> Option<Vec<String>> {
        self.fields.get(&field).cloned()
    }
}

impl TagStore for MemoryTagStore {
    fn container(&self) -> ContainerKind {
        self.container
    }

    fn set_text_field(&mut self, field: TagField, values: &[String]) -> Result<()> {
        self.fields.insert(field, values.to_vec());
        Ok(())
    }

    fn remove_field(&mut self, field: TagField) -> Result<()> {
        self.fields.remove(&field);
        Ok(())
    }

    fn set_picture(&mut self, cover: &CoverArt) -> Result<()> {
        self.pictures.clear();
        self.pictures.push(cover.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.fail_commit {
            return Err(Error::metadata("/memory/track", "Permission denied"));
        }
        self.commits += 1;
        Ok(())
    }
}

/// Creates a search candidate on the album "Record" by "Band".
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let track = TrackMatch {
///     artists: vec!["Someone".to_string()],
///     ..make_match("Song", 1, 1)
/// };
/// ```
pub fn make_match(name: &str, track_number: u32, disc_number: u32) -> TrackMatch {
    TrackMatch {
        id: format!("trk-{}", name.to_lowercase()),
        name: name.to_string(),
        artists: vec!["Band".to_string()],
        album: AlbumRef {
            name: "Record".to_string(),
            release_date: "2001-02-03".to_string(),
            artists: vec!["Band".to_string()],
            image_urls: vec![
                "https://img.example/640".to_string(),
                "https://img.example/300".to_string(),
            ],
            handle: AlbumHandle("alb".to_string()),
        },
        track_number,
        disc_number,
    }
}

/// Album tracklist from a list of disc numbers, numbering tracks per disc.
pub fn tracklist(discs: &[u32]) -> Vec<AlbumTrack> {
    let mut per_disc: BTreeMap<u32, u32> = BTreeMap::new();
    discs
        .iter()
        .map(|&disc| {
            let n = per_disc.entry(disc).or_insert(0);
            *n += 1;
            AlbumTrack {
                track_number: *n,
                disc_number: disc,
            }
        })
        .collect()
}

/// Placeholder JPEG cover tagged with a URL for identification.
pub fn make_cover(url: &str) -> CoverArt {
    CoverArt {
        data: vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10],
        mime_type: "image/jpeg".to_string(),
        url: url.to_string(),
    }
}

/// Selector that replays scripted answers and records what it was offered.
///
/// Runs out of script as a cancellation.
pub struct ScriptedSelector {
    answers: Vec<Selection>,
    offered: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedSelector {
    pub fn new(mut answers: Vec<Selection>) -> Self {
        answers.reverse();
        Self {
            answers,
            offered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle on the option lists offered so far.
    pub fn offered(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.offered)
    }
}

impl Selector for ScriptedSelector {
    fn select(&mut self, _heading: &str, options: &[String]) -> Selection {
        self.offered.lock().unwrap().push(options.to_vec());
        self.answers.pop().unwrap_or(Selection::Cancelled)
    }
}

// ============================================================================
// Audio file fixtures
// ============================================================================

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo, no padding
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
const MP3_FRAME_LEN: usize = 417;

/// Write a tagless MP3 made of silent frames.
pub fn write_mp3_fixture(path: &Path) {
    let mut bytes = Vec::with_capacity(MP3_FRAME_LEN * 8);
    for _ in 0..8 {
        let mut frame = vec![0u8; MP3_FRAME_LEN];
        frame[..4].copy_from_slice(&MP3_FRAME_HEADER);
        bytes.extend_from_slice(&frame);
    }
    std::fs::write(path, bytes).unwrap();
}

/// Write a FLAC stream with only a STREAMINFO block (44.1 kHz, stereo, 16 bit).
pub fn write_flac_fixture(path: &Path) {
    let mut bytes = b"fLaC".to_vec();
    // Last metadata block, type STREAMINFO, 34 bytes
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    // Block size 4096..4096, frame sizes unknown
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    // Sample rate, channels, bits per sample, 44100 total samples
    bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0xAC, 0x44]);
    // MD5 of the audio, unset
    bytes.extend_from_slice(&[0u8; 16]);
    // A little trailing frame data
    bytes.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x00, 0x00]);
    std::fs::write(path, bytes).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracklist_numbers_per_disc() {
        let tracks = tracklist(&[1, 1, 2, 1]);
        assert_eq!(tracks[1].track_number, 2);
        assert_eq!(tracks[2].track_number, 1);
        assert_eq!(tracks[3].track_number, 3);
        assert_eq!(tracks[3].disc_number, 1);
    }

    #[test]
    fn test_make_match_defaults() {
        let track = make_match("Song", 4, 2);
        assert_eq!(track.album.name, "Record");
        assert_eq!(track.album.image_urls[0], "https://img.example/640");
        assert_eq!(track.disc_number, 2);
    }

    #[test]
    fn test_memory_store_replaces_pictures() {
        let mut store = MemoryTagStore::new(ContainerKind::Id3);
        store.set_picture(&make_cover("a")).unwrap();
        store.set_picture(&make_cover("b")).unwrap();
        assert_eq!(store.pictures.len(), 1);
        assert_eq!(store.pictures[0].url, "b");
    }

    #[test]
    fn test_scripted_selector_runs_out_as_cancel() {
        let mut selector = ScriptedSelector::new(vec![Selection::Chosen(1)]);
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(selector.select("?", &options), Selection::Chosen(1));
        assert_eq!(selector.select("?", &options), Selection::Cancelled);
    }
}
