use futures::stream::Stream;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::model::ContainerKind;

/// Whether a path has the extension of a taggable container (case-insensitive).
pub fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(ContainerKind::from_extension)
        .is_some()
}

/// Scans the given root directory recursively for audio files.
///
/// Supported extensions: mp3, flac, ogg, opus (case-insensitive).
/// Entries are visited in file-name order so runs are repeatable.
/// Returns a Stream of PathBufs.
pub fn scan(root: PathBuf) -> impl Stream<Item = PathBuf> {
    let (tx, rx) = mpsc::channel(100);

    // Spawn a blocking task to perform the synchronous file system traversal
    tokio::task::spawn_blocking(move || {
        let entries = WalkDir::new(root).sort_by_file_name().into_iter();

        for entry in entries.filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        }) {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !has_audio_extension(path) {
                tracing::debug!(path = %path.display(), "Not an audio file");
                continue;
            }

            // If the receiver is dropped, blocking_send fails and we stop scanning.
            if tx.blocking_send(path.to_path_buf()).is_err() {
                break;
            }
        }
    });

    // Convert the mpsc Receiver into a Stream
    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|path| (path, rx))
    })
}
