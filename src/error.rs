//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`ConfigError`](crate::config::ConfigError),
//! [`LookupError`](crate::matching::LookupError)), while the CLI and `main`
//! use `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error for the tagging pipeline
//! - [`Error::is_recoverable`] decides whether a failure only affects the
//!   current file or has to stop the whole run
//!
//! # Example
//!
//! ```ignore
//! use crate::error::Result;
//!
//! async fn tag_file(tagger: &mut Tagger<'_>, item: &AudioItem) -> Result<()> {
//!     let mut store = LoftyTagStore::open(item.path())?; // Metadata errors
//!     tagger.tag_item(item, &mut store).await?; // Lookup errors auto-convert
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::matching::LookupError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level pipeline error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag reading/writing error
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Spotify lookup error
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Operator aborted an interactive selection
    #[error("Cancelled by user")]
    Cancelled,

    /// Selector answered with an index outside the candidate list
    #[error("Selection {index} is out of range ({count} candidates)")]
    InvalidSelection { index: usize, count: usize },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether the run can continue with the next file after this error.
    ///
    /// Missing matches and per-file tag I/O failures only affect the file
    /// being processed. Credentials, exhausted retries, malformed service
    /// responses and operator cancellation stop the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Io(_) | Error::Metadata { .. } => true,
            Error::Lookup(e) => matches!(e, LookupError::NoMatches),
            Error::Config(_)
            | Error::NotFound(_)
            | Error::Cancelled
            | Error::InvalidSelection { .. } => false,
            Error::WithContext { source, .. } => source.is_recoverable(),
        }
    }
}
