//! CLI command definitions and dispatch.
//!
//! Each subcommand lives in its own submodule:
//! - `tag`: Match files against Spotify and write their tags
//! - `config`: Credential setup and reset

mod config;
mod tag;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::tagging::TagWriteOptions;

pub use config::{cmd_config_api, cmd_config_reset};
pub use tag::cmd_tag;

/// Get Ur Songs Tagged
#[derive(Parser)]
#[command(
    name = "gust",
    version,
    about = "Get Ur Songs Tagged with metadata from Spotify",
    long_about = None
)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Tag every audio file in a directory
    Tag {
        /// Directory to tag (searched recursively)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Choose each match from the top results instead of taking the first
        #[arg(short, long)]
        interactive: bool,
        /// Write the full release date instead of just the year
        #[arg(long)]
        date_full: bool,
        /// Keep disc number fields on single-disc albums
        #[arg(long)]
        always_keep_discs: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set the Spotify client credentials (prompts for missing values)
    Api {
        /// Spotify client ID
        #[arg(long, env = "SPOTIFY_CLIENT_ID")]
        client_id: Option<String>,
        /// Spotify client secret
        #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
        client_secret: Option<String>,
    },
    /// Restore the default configuration, dropping stored credentials
    Reset,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Tag {
            path,
            interactive,
            date_full,
            always_keep_discs,
        } => {
            let rt = Runtime::new()?;
            let options = TagWriteOptions {
                use_full_date: *date_full,
                always_keep_disc_fields: *always_keep_discs,
            };
            cmd_tag(&rt, path, *interactive, options)
        }
        Commands::Config {
            action: ConfigAction::Api {
                client_id,
                client_secret,
            },
        } => cmd_config_api(client_id.as_deref(), client_secret.as_deref()),
        Commands::Config {
            action: ConfigAction::Reset,
        } => cmd_config_reset(),
    }
}
