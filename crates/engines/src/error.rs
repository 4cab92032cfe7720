//! Error types for the engines crate.

use data_loader::MovieIdx;
use thiserror::Error;

/// Errors raised by engine construction or scoring.
///
/// Neither variant is a user error: seeds are resolved through the same
/// title index the engines were built from, and configs are validated up
/// front, so seeing one of these means an invariant broke upstream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("seed index {idx} is outside the catalog of {len} movies")]
    SeedOutOfRange { idx: MovieIdx, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
