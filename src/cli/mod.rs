//! Command-line interface for gust.
//!
//! `gust tag` tags a directory; `gust config` manages credentials.

mod commands;
mod prompt;

pub use commands::{Cli, run_command};
