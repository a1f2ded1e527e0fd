//! Audio file tag reading and writing.
//!
//! Uses the lofty crate for format-independent tag access. Supported
//! containers are MP3 (ID3v2), FLAC, Ogg Vorbis and Ogg Opus.
//!
//! # Numbering
//! lofty keeps track/disc number and total as separate items on its
//! generic [`Tag`] and merges them into one `TRCK`/`TPOS` frame when an
//! ID3v2 tag is written. A combined "N/total" value handed to
//! [`LoftyTagStore`] is therefore split into the two items; separate-field
//! containers get `TRACKNUMBER`/`TRACKTOTAL` and `DISCNUMBER`/`DISCTOTAL`.
//!
//! # Pictures
//! Pictures live on the same generic tag and are written as APIC frames,
//! FLAC PICTURE blocks or `METADATA_BLOCK_PICTURE` comments, so text and
//! art go out in a single save.

use lofty::config::WriteOptions;
use lofty::file::{FileType, TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, ItemValue, Tag, TagExt, TagItem};
use std::path::{Path, PathBuf};

use crate::cover::CoverArt;
use crate::error::{Error, Result};
use crate::model::{AudioItem, ContainerKind};
use crate::tagging::{TagField, TagStore};

const COVER_DESCRIPTION: &str = "Cover";

/// ID3v2.4 multi-value separator inside a single text frame
const ID3V2_VALUE_SEPARATOR: &str = "\0";

/// Container kind for a probed file type, `None` when unsupported
pub fn container_kind(file_type: FileType) -> Option<ContainerKind> {
    match file_type {
        FileType::Mpeg => Some(ContainerKind::Id3),
        FileType::Flac => Some(ContainerKind::Flac),
        FileType::Vorbis => Some(ContainerKind::Vorbis),
        FileType::Opus => Some(ContainerKind::Opus),
        _ => None,
    }
}

fn item_key(field: TagField) -> ItemKey {
    match field {
        TagField::Title => ItemKey::TrackTitle,
        TagField::Artist => ItemKey::TrackArtist,
        TagField::Album => ItemKey::AlbumTitle,
        TagField::AlbumArtist => ItemKey::AlbumArtist,
        TagField::Date => ItemKey::RecordingDate,
        TagField::TrackNumber => ItemKey::TrackNumber,
        TagField::TrackTotal => ItemKey::TrackTotal,
        TagField::DiscNumber => ItemKey::DiscNumber,
        TagField::DiscTotal => ItemKey::DiscTotal,
    }
}

fn parse_number(path: &Path, field: TagField, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| Error::metadata(path, format!("invalid {} value {:?}", field.key(), value)))
}

/// Split "N/total" into its parts. A bare "N" has no total.
fn split_number_total(value: &str) -> (&str, Option<&str>) {
    match value.split_once('/') {
        Some((number, total)) => (number.trim(), Some(total.trim()).filter(|t| !t.is_empty())),
        None => (value.trim(), None),
    }
}

fn read_tagged(path: &Path) -> Result<TaggedFile> {
    Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("failed to open file for probing: {e}")))?
        .read()
        .map_err(|e| Error::metadata(path, format!("failed to read tags: {e}")))
}

/// Probe a file and read its current tags.
///
/// Returns `Ok(None)` for files lofty reads but that are not one of the
/// supported containers.
pub fn probe(path: &Path) -> Result<Option<AudioItem>> {
    let tagged = read_tagged(path)?;

    let Some(container) = container_kind(tagged.file_type()) else {
        tracing::debug!(path = %path.display(), file_type = ?tagged.file_type(), "Unsupported container");
        return Ok(None);
    };

    let mut item = AudioItem::new(path, container);

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        for field in TagField::ALL {
            let values: Vec<String> = tag
                .get_strings(&item_key(field))
                .flat_map(|value| value.split(ID3V2_VALUE_SEPARATOR))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect();
            if !values.is_empty() {
                item.tags.insert(field.key().to_string(), values);
            }
        }
    }

    Ok(Some(item))
}

/// [`TagStore`] over a file's primary tag, saved back with lofty.
pub struct LoftyTagStore {
    path: PathBuf,
    container: ContainerKind,
    tag: Tag,
}

impl LoftyTagStore {
    /// Open a supported audio file; a missing primary tag starts empty.
    pub fn open(path: &Path) -> Result<Self> {
        let tagged = read_tagged(path)?;

        let container = container_kind(tagged.file_type())
            .ok_or_else(|| Error::metadata(path, "unsupported audio container"))?;

        let tag_type = tagged.primary_tag_type();
        let tag = tagged
            .tag(tag_type)
            .cloned()
            .unwrap_or_else(|| Tag::new(tag_type));

        Ok(Self {
            path: path.to_path_buf(),
            container,
            tag,
        })
    }

    fn set_item(&mut self, key: ItemKey, values: &[String]) {
        self.tag.remove_key(&key);

        // ID3v2 allows one frame per text ID; multiple values share it
        if self.supports_combined_number_total_fields() && values.len() > 1 {
            let joined = values.join(ID3V2_VALUE_SEPARATOR);
            self.tag.push(TagItem::new(key, ItemValue::Text(joined)));
            return;
        }

        for value in values {
            self.tag.push(TagItem::new(key.clone(), ItemValue::Text(value.clone())));
        }
    }

    /// Stage a combined "N/total" value through lofty's number accessors.
    fn set_number_total(&mut self, field: TagField, value: &str) -> Result<()> {
        let (number, total) = split_number_total(value);
        let number = parse_number(&self.path, field, number)?;
        let total = total
            .map(|t| parse_number(&self.path, field, t))
            .transpose()?;

        if field == TagField::DiscNumber {
            self.tag.set_disk(number);
            match total {
                Some(total) => self.tag.set_disk_total(total),
                None => self.tag.remove_disk_total(),
            }
        } else {
            self.tag.set_track(number);
            match total {
                Some(total) => self.tag.set_track_total(total),
                None => self.tag.remove_track_total(),
            }
        }

        Ok(())
    }

    #[cfg(test)]
    fn text(&self, field: TagField) -> Vec<String> {
        self.tag
            .get_strings(&item_key(field))
            .map(str::to_string)
            .collect()
    }
}

impl TagStore for LoftyTagStore {
    fn container(&self) -> ContainerKind {
        self.container
    }

    fn set_text_field(&mut self, field: TagField, values: &[String]) -> Result<()> {
        let combined = self.supports_combined_number_total_fields();

        match (field, values.first()) {
            (TagField::TrackNumber | TagField::DiscNumber, Some(value)) if combined => {
                self.set_number_total(field, value)
            }
            _ => {
                self.set_item(item_key(field), values);
                Ok(())
            }
        }
    }

    fn remove_field(&mut self, field: TagField) -> Result<()> {
        self.tag.remove_key(&item_key(field));

        // The total lives inside the same frame on combined containers
        if self.supports_combined_number_total_fields() {
            match field {
                TagField::TrackNumber => self.tag.remove_track_total(),
                TagField::DiscNumber => self.tag.remove_disk_total(),
                _ => {}
            }
        }

        Ok(())
    }

    fn set_picture(&mut self, cover: &CoverArt) -> Result<()> {
        while !self.tag.pictures().is_empty() {
            self.tag.remove_picture(0);
        }

        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::from_str(&cover.mime_type)),
            Some(COVER_DESCRIPTION.to_string()),
            cover.data.clone(),
        );
        self.tag.push_picture(picture);

        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| Error::metadata(&self.path, format!("failed to write tags: {e}")))?;

        tracing::debug!(path = %self.path.display(), "Tags written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::domain::AlbumContext;
    use crate::tagging::{self, TagWriteOptions};
    use crate::test_utils::{make_cover, make_match, write_flac_fixture, write_mp3_fixture};
    use lofty::tag::TagType;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn store(container: ContainerKind, tag_type: TagType) -> LoftyTagStore {
        LoftyTagStore {
            path: PathBuf::from("/nonexistent/track"),
            container,
            tag: Tag::new(tag_type),
        }
    }

    fn cover(data: &[u8]) -> CoverArt {
        CoverArt {
            data: data.to_vec(),
            mime_type: "image/jpeg".to_string(),
            url: "https://img.example/640".to_string(),
        }
    }

    #[test]
    fn test_probe_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write to temp file");

        let result = probe(file.path());

        assert!(result.is_err());
        assert!(result.unwrap_err().is_recoverable());
    }

    #[test]
    fn test_probe_non_existent_file_returns_error() {
        let path = Path::new("non_existent_file.mp3");
        assert!(probe(path).is_err());
    }

    #[test]
    fn test_open_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "Not an audio file").expect("Failed to write");

        assert!(LoftyTagStore::open(file.path()).is_err());
    }

    #[test]
    fn test_container_kind_mapping() {
        assert_eq!(container_kind(FileType::Mpeg), Some(ContainerKind::Id3));
        assert_eq!(container_kind(FileType::Flac), Some(ContainerKind::Flac));
        assert_eq!(container_kind(FileType::Vorbis), Some(ContainerKind::Vorbis));
        assert_eq!(container_kind(FileType::Opus), Some(ContainerKind::Opus));
        assert_eq!(container_kind(FileType::Wav), None);
    }

    #[test]
    fn test_split_number_total() {
        assert_eq!(split_number_total("3/12"), ("3", Some("12")));
        assert_eq!(split_number_total("3"), ("3", None));
        assert_eq!(split_number_total("3/"), ("3", None));
    }

    #[test]
    fn test_combined_track_number_is_split() {
        let mut store = store(ContainerKind::Id3, TagType::Id3v2);

        store
            .set_text_field(TagField::TrackNumber, &["4/9".to_string()])
            .unwrap();

        assert_eq!(store.tag.track(), Some(4));
        assert_eq!(store.tag.track_total(), Some(9));
    }

    #[test]
    fn test_combined_number_must_be_numeric() {
        let mut store = store(ContainerKind::Id3, TagType::Id3v2);

        let result = store.set_text_field(TagField::DiscNumber, &["A/2".to_string()]);

        assert!(matches!(result, Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_combined_disc_removal_drops_total() {
        let mut store = store(ContainerKind::Id3, TagType::Id3v2);
        store
            .set_text_field(TagField::DiscNumber, &["1/2".to_string()])
            .unwrap();

        assert_eq!(store.tag.disk(), Some(1));
        assert_eq!(store.tag.disk_total(), Some(2));

        store.remove_field(TagField::DiscNumber).unwrap();

        assert_eq!(store.tag.disk(), None);
        assert_eq!(store.tag.disk_total(), None);
    }

    #[test]
    fn test_separate_fields_stay_separate() {
        let mut store = store(ContainerKind::Flac, TagType::VorbisComments);

        store
            .set_text_field(TagField::TrackNumber, &["4".to_string()])
            .unwrap();
        store
            .set_text_field(TagField::TrackTotal, &["9".to_string()])
            .unwrap();
        store.remove_field(TagField::DiscNumber).unwrap();

        assert_eq!(store.text(TagField::TrackNumber), vec!["4"]);
        assert_eq!(store.text(TagField::TrackTotal), vec!["9"]);
    }

    #[test]
    fn test_multiple_artists() {
        let mut store = store(ContainerKind::Vorbis, TagType::VorbisComments);
        let artists = vec!["Queen".to_string(), "David Bowie".to_string()];

        store.set_text_field(TagField::Artist, &artists).unwrap();
        store.set_text_field(TagField::Artist, &artists).unwrap();

        assert_eq!(store.text(TagField::Artist), artists);
    }

    #[test]
    fn test_set_picture_replaces_all() {
        let mut store = store(ContainerKind::Flac, TagType::VorbisComments);
        store.set_picture(&cover(b"\xff\xd8one")).unwrap();
        store.set_picture(&cover(b"\xff\xd8two")).unwrap();
        store.set_picture(&cover(b"\xff\xd8three")).unwrap();

        assert_eq!(store.tag.pictures().len(), 1);
        assert_eq!(store.tag.pictures()[0].data(), b"\xff\xd8three");
        assert_eq!(store.tag.pictures()[0].pic_type(), PictureType::CoverFront);
    }

    #[test]
    fn test_commit_to_missing_file_is_recoverable() {
        let mut store = store(ContainerKind::Id3, TagType::Id3v2);
        store
            .set_text_field(TagField::Title, &["Song".to_string()])
            .unwrap();

        let err = store.commit().unwrap_err();

        assert!(matches!(err, Error::Metadata { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_multiple_artists_share_one_id3_frame() {
        let mut store = store(ContainerKind::Id3, TagType::Id3v2);
        let artists = vec!["Queen".to_string(), "David Bowie".to_string()];

        store.set_text_field(TagField::Artist, &artists).unwrap();

        assert_eq!(store.text(TagField::Artist), vec!["Queen\0David Bowie"]);
    }

    // ------------------------------------------------------------------------
    // Round trips through real files
    // ------------------------------------------------------------------------

    fn occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    fn context(total_tracks_in_disc: u32, total_discs: u32) -> AlbumContext {
        AlbumContext {
            total_tracks_in_disc,
            total_discs,
        }
    }

    #[test]
    fn test_mp3_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        write_mp3_fixture(&path);

        let mut track = make_match("Under Pressure", 3, 2);
        track.artists = vec!["Queen".to_string(), "David Bowie".to_string()];

        let mut store = LoftyTagStore::open(&path).unwrap();
        assert_eq!(store.container(), ContainerKind::Id3);
        tagging::write_tags(
            &mut store,
            &track,
            &context(12, 2),
            Some(&make_cover("https://img.example/640")),
            &TagWriteOptions::default(),
        )
        .unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(occurrences(&raw, b"TPE1"), 1);
        assert_eq!(occurrences(&raw, b"TRCK"), 1);
        assert_eq!(occurrences(&raw, b"3/12"), 1);
        assert_eq!(occurrences(&raw, b"2/2"), 1);

        let item = probe(&path).unwrap().unwrap();
        assert_eq!(item.container(), ContainerKind::Id3);
        assert_eq!(item.tags["artist"], vec!["Queen", "David Bowie"]);
        assert_eq!(item.tag_text("title").as_deref(), Some("Under Pressure"));
        assert_eq!(item.tag_text("date").as_deref(), Some("2001"));
        assert_eq!(item.tag_text("tracknumber").as_deref(), Some("3"));
        assert_eq!(item.tag_text("tracktotal").as_deref(), Some("12"));

        let tagged = read_tagged(&path).unwrap();
        let tag = tagged.primary_tag().unwrap();
        assert_eq!(tag.pictures().len(), 1);
        assert_eq!(tag.pictures()[0].pic_type(), PictureType::CoverFront);
    }

    #[test]
    fn test_flac_single_disc_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.flac");
        write_flac_fixture(&path);

        // Stale disc fields and an old picture from an earlier tagger
        let mut store = LoftyTagStore::open(&path).unwrap();
        store
            .set_text_field(TagField::DiscNumber, &["1".to_string()])
            .unwrap();
        store
            .set_text_field(TagField::DiscTotal, &["1".to_string()])
            .unwrap();
        store.set_picture(&cover(b"\xff\xd8old")).unwrap();
        store.commit().unwrap();

        let mut store = LoftyTagStore::open(&path).unwrap();
        assert_eq!(store.container(), ContainerKind::Flac);
        assert_eq!(store.text(TagField::DiscNumber), vec!["1"]);

        let new_cover = make_cover("https://img.example/640");
        tagging::write_tags(
            &mut store,
            &make_match("Song", 4, 1),
            &context(5, 1),
            Some(&new_cover),
            &TagWriteOptions::default(),
        )
        .unwrap();

        let item = probe(&path).unwrap().unwrap();
        assert_eq!(item.tag_text("tracknumber").as_deref(), Some("4"));
        assert_eq!(item.tag_text("tracktotal").as_deref(), Some("5"));
        assert_eq!(item.tag_text("artist").as_deref(), Some("Band"));
        assert!(!item.tags.contains_key("discnumber"));
        assert!(!item.tags.contains_key("disctotal"));

        let tagged = read_tagged(&path).unwrap();
        let tag = tagged.primary_tag().unwrap();
        assert_eq!(tag.pictures().len(), 1);
        assert_eq!(tag.pictures()[0].data(), new_cover.data.as_slice());
    }
}
