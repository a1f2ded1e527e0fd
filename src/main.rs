//! gust - Get Ur Songs Tagged.
//!
//! Looks up every audio file in a directory on Spotify and writes the
//! matched title, artists, album, numbering, date and cover art into the
//! file's tags.

pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod library;
pub mod matching;
pub mod metadata;
pub mod model;
pub mod scanner;
pub mod spotify;
pub mod tagging;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so they never interleave with prompts and results
    let level = if args.verbose { "gust=debug" } else { "gust=info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy()
                .add_directive(level.parse()?),
        )
        .init();

    cli::run_command(&args)
}
