//! Search query construction from a file's existing tags.

use crate::model::{AudioItem, keys};

/// Build the search expression for an item.
///
/// Title and artist win whenever both are present; album is appended when
/// known. Anything less falls back to the file name. Encoding is left to
/// the HTTP layer.
pub fn build_query(item: &AudioItem) -> String {
    let title = item.tag_text(keys::TITLE);
    let artist = item.tag_text(keys::ARTIST);

    match (title, artist) {
        (Some(title), Some(artist)) => match item.tag_text(keys::ALBUM) {
            Some(album) => format!("{} - {} - {}", title, artist, album),
            None => format!("{} - {}", title, artist),
        },
        _ => item.file_name(),
    }
}
