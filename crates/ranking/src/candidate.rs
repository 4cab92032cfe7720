//! Candidate and result types.

use data_loader::MovieId;
use serde::{Deserialize, Serialize};

/// A scored movie on its way through the filters and the sort
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub movie_id: MovieId,
    pub score: f32,
}

impl Candidate {
    pub fn new(movie_id: MovieId, score: f32) -> Self {
        Self { movie_id, score }
    }
}

/// One line of a final recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
}
