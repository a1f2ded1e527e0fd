//! The `tag` command: match every audio file under a directory and write its tags.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::cli::prompt::TerminalSelector;
use crate::config::{self, FileTokenStore};
use crate::cover::CoverArtClient;
use crate::error::{Error, Result};
use crate::library;
use crate::matching::{MatchMode, TaggedTrack, Tagger};
use crate::metadata::LoftyTagStore;
use crate::model::AudioItem;
use crate::spotify::SpotifyClient;
use crate::tagging::{TagStore, TagWriteOptions};

use super::config::cmd_config_api;

/// Tag all audio files under `path`
pub fn cmd_tag(rt: &Runtime, path: &Path, interactive: bool, options: TagWriteOptions) -> anyhow::Result<()> {
    let config_path = config::config_path()?;
    let mut cfg = config::load_or_init_at(&config_path)?;

    if !cfg.has_credentials() {
        println!("No Spotify credentials configured yet.");
        cmd_config_api(None, None)?;
        cfg = config::load_or_init_at(&config_path)?;
    }

    let client = SpotifyClient::new(
        cfg.credentials()?,
        cfg.cached_token(),
        Box::new(FileTokenStore::new(&config_path)),
    )?;

    rt.block_on(async {
        client.ensure_token().await?;

        if !path.exists() {
            return Err(Error::not_found(path).into());
        }

        println!("Reading audio files in {}...", path.display());
        let items = library::collect_audio_items(path.to_path_buf()).await;
        if items.is_empty() {
            println!("No taggable audio files found.");
            return Ok(());
        }

        let mode = if interactive {
            println!("Tagging {} files interactively. Ctrl-C cancels.", items.len());
            MatchMode::Interactive(Box::new(TerminalSelector::new()?))
        } else {
            println!("Tagging {} files with the best match for each.", items.len());
            MatchMode::Automatic
        };

        let covers = CoverArtClient::new()?;
        let mut tagger = Tagger::new(&client, &covers, mode, options);

        let summary = tagger
            .tag_items(&items, open_store, print_outcome)
            .await?;

        println!();
        println!(
            "Done: {} tagged, {} skipped (no match), {} failed",
            summary.tagged, summary.skipped, summary.failed
        );
        Ok::<_, anyhow::Error>(())
    })
}

fn open_store(item: &AudioItem) -> Result<Box<dyn TagStore>> {
    Ok(Box::new(LoftyTagStore::open(item.path())?))
}

fn print_outcome(item: &AudioItem, outcome: &Result<TaggedTrack>) {
    match outcome {
        Ok(tagged) => {
            let art = if tagged.cover_embedded { "" } else { " [no cover]" };
            println!("✓ {} -> {}{}", item.file_name(), tagged.track.display_line(), art);
        }
        Err(e) => println!("✗ {}: {}", item.file_name(), e),
    }
}
