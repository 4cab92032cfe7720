//! Error types for result assembly.

use data_loader::{DataLoadError, MovieId};
use thiserror::Error;

/// Assembly failures.
///
/// Each one means the score set and the title index disagree, which the
/// caller should treat as an internal invariant violation rather than a
/// bad request.
#[derive(Error, Debug)]
pub enum RankingError {
    #[error("score set covers {scores} movies but the catalog has {catalog}")]
    ScoreLengthMismatch { scores: usize, catalog: usize },

    #[error("ranked movie {movie_id} has no title")]
    Lookup {
        movie_id: MovieId,
        #[source]
        source: DataLoadError,
    },
}

pub type Result<T> = std::result::Result<T, RankingError>;
