use crate::model::AudioItem;
use crate::{metadata, scanner};
use futures::{Stream, StreamExt};
use std::path::PathBuf;

/// Files probed at once; results still arrive in scan order
const PROBE_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// A supported container, with the tags it currently has
    Found(AudioItem),
    /// Right extension, but not a container gust can tag
    Unsupported(PathBuf),
    Error(PathBuf, String),
}

/// Scans a directory and probes every audio file found.
/// Returns a stream of ScanEvents in file-name order.
pub fn read_audio_items(root: PathBuf) -> impl Stream<Item = ScanEvent> {
    scanner::scan(root)
        .map(|path| async move {
            let probe_path = path.clone();
            match tokio::task::spawn_blocking(move || metadata::probe(&probe_path)).await {
                Ok(Ok(Some(item))) => ScanEvent::Found(item),
                Ok(Ok(None)) => ScanEvent::Unsupported(path),
                Ok(Err(e)) => ScanEvent::Error(path, e.to_string()),
                Err(e) => ScanEvent::Error(path, format!("probe task failed: {e}")),
            }
        })
        .buffered(PROBE_CONCURRENCY)
}

/// Collect every taggable item under `root`, logging what gets skipped.
pub async fn collect_audio_items(root: PathBuf) -> Vec<AudioItem> {
    let mut items = Vec::new();
    let mut events = std::pin::pin!(read_audio_items(root));

    while let Some(event) = events.next().await {
        match event {
            ScanEvent::Found(item) => {
                tracing::debug!(file = %item.file_name(), container = %item.container(), "Found");
                items.push(item);
            }
            ScanEvent::Unsupported(path) => {
                tracing::debug!(path = %path.display(), "Skipping unsupported container");
            }
            ScanEvent::Error(path, message) => {
                tracing::warn!(path = %path.display(), "Skipping unreadable file: {}", message);
            }
        }
    }

    items
}
