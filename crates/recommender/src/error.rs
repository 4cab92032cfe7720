//! Caller-facing error taxonomy.

use data_loader::{DataLoadError, MovieId};
use engines::EngineError;
use ranking::RankingError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything a recommendation query or the lifecycle calls can fail with.
///
/// `UnknownTitle`, `AmbiguousTitle` and `InvalidRequest` are the caller's
/// to fix. `Invariant` means the loaded state is inconsistent and is never
/// a user error.
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("unknown title: {0:?}")]
    UnknownTitle(String),

    #[error("title {title:?} matches several movies: {candidates:?}")]
    AmbiguousTitle {
        title: String,
        candidates: Vec<MovieId>,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("data error: {0}")]
    Data(#[from] DataLoadError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read config file {path:?}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl RecommendError {
    /// True for errors the caller caused and can correct
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTitle(_) | Self::AmbiguousTitle { .. } | Self::InvalidRequest(_)
        )
    }
}

impl From<EngineError> for RecommendError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidConfig(msg) => Self::Config(msg),
            other => Self::Invariant(other.to_string()),
        }
    }
}

impl From<RankingError> for RecommendError {
    fn from(err: RankingError) -> Self {
        Self::Invariant(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
