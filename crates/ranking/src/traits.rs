//! Core traits for the ranking pipeline.

use crate::candidate::Candidate;

/// A step that drops candidates before they are sorted.
///
/// ## Design Note
/// - `Send + Sync` so one pipeline can be shared between query threads
/// - Filters take ownership of the Vec and return what survives, keeping
///   the input order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate>;
}
