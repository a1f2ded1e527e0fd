//! Track matching - turns a local file into a Spotify track and writes it.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Our types; API responses are adapted into them
//! - **Query** (`query.rs`) - Search expression from existing tags
//! - **Resolver** (`resolver.rs`) - Automatic or operator-chosen candidate
//! - **Context** (`context.rs`) - Track/disc totals from the album tracklist
//! - **Traits** (`traits.rs`) - Service seams, with mocks for tests
//! - **Service** (`service.rs`) - Per-file orchestration and run summary
//!
//! # Usage
//!
//! ```ignore
//! let mut tagger = Tagger::new(&spotify, &covers, MatchMode::Automatic, options);
//! let summary = tagger.tag_items(&items, open_store, report).await?;
//! println!("{} tagged, {} skipped", summary.tagged, summary.skipped);
//! ```

pub mod context;
pub mod domain;
pub mod query;
pub mod resolver;
pub mod service;
pub mod traits;

pub use domain::LookupError;
pub use resolver::{MatchMode, Selection, Selector};
pub use service::{RunSummary, TaggedTrack, Tagger};
