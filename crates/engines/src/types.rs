//! Shared scoring types.

use crate::error::Result;
use data_loader::MovieIdx;
use serde::{Deserialize, Serialize};

/// Why a seed contributed nothing to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsufficientDataKind {
    /// The seed has no metadata tokens (content engine)
    NoMetadata,
    /// The seed has no observed ratings (collaborative engine)
    NoRatings,
}

/// A non-fatal note that one seed was scored as a zero contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsufficientData {
    pub seed: MovieIdx,
    pub kind: InsufficientDataKind,
}

/// Per-query scores, one slot per catalog movie in dense-index order.
///
/// Seeds keep whatever score they accumulated; excluding them is the
/// assembler's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateScores {
    pub scores: Vec<f32>,
    pub warnings: Vec<InsufficientData>,
}

impl CandidateScores {
    pub fn zeros(len: usize) -> Self {
        Self {
            scores: vec![0.0; len],
            warnings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Core trait for scoring strategies.
///
/// `Send + Sync` lets one built engine serve queries from many threads.
pub trait ScoringEngine: Send + Sync {
    /// Returns the name of this engine (for logging/debugging)
    fn name(&self) -> &str;

    /// Score every catalog movie against the given seeds.
    fn score(&self, seeds: &[MovieIdx]) -> Result<CandidateScores>;
}
