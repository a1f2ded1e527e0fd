//! Picking one candidate out of a search result.
//!
//! Automatic mode trusts the service's top hit. Interactive mode hands the
//! candidates to a [`Selector`] and blocks until it answers.

use super::domain::{LookupError, TrackMatch};
use crate::error::{Error, Result};

/// Candidates requested when the operator chooses
pub const INTERACTIVE_LIMIT: u32 = 5;

/// Candidates requested when the top hit is taken as-is
pub const AUTOMATIC_LIMIT: u32 = 1;

/// Operator answer to a selection request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the offered options
    Chosen(usize),
    /// Abort the whole run
    Cancelled,
}

/// Request/response boundary for interactive selection.
///
/// Receives one display line per candidate and returns the chosen index.
/// Implementations block until the operator answers.
pub trait Selector {
    fn select(&mut self, heading: &str, options: &[String]) -> Selection;
}

/// How a match is chosen among search results
pub enum MatchMode {
    Automatic,
    Interactive(Box<dyn Selector>),
}

impl MatchMode {
    pub fn search_limit(&self) -> u32 {
        match self {
            MatchMode::Automatic => AUTOMATIC_LIMIT,
            MatchMode::Interactive(_) => INTERACTIVE_LIMIT,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, MatchMode::Interactive(_))
    }

    /// Choose one candidate for `file_name`.
    pub fn choose(&mut self, file_name: &str, mut candidates: Vec<TrackMatch>) -> Result<TrackMatch> {
        if candidates.is_empty() {
            return Err(Error::Lookup(LookupError::NoMatches));
        }

        match self {
            MatchMode::Automatic => Ok(candidates.swap_remove(0)),
            MatchMode::Interactive(selector) => {
                let options: Vec<String> = candidates.iter().map(TrackMatch::display_line).collect();
                let heading = format!("Which track data do you want for {}?", file_name);

                match selector.select(&heading, &options) {
                    Selection::Chosen(index) if index < candidates.len() => {
                        Ok(candidates.swap_remove(index))
                    }
                    Selection::Chosen(index) => Err(Error::InvalidSelection {
                        index,
                        count: candidates.len(),
                    }),
                    Selection::Cancelled => Err(Error::Cancelled),
                }
            }
        }
    }
}
