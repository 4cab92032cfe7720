//! Error types for the data-loader crate.
//!
//! Loading errors are split by where they happen: opening a file, decoding a
//! CSV row, or cross-checking rows against each other once everything is
//! parsed. Title resolution errors live here too because the `TitleIndex`
//! is owned by this crate.

use crate::types::MovieId;
use thiserror::Error;

/// Errors that can occur while loading the catalog or rating log, or while
/// resolving titles against the loaded catalog.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV record couldn't be decoded
    ///
    /// `line` is the 1-based line in the source file when the reader knows it.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Referenced entity doesn't exist (e.g., rating for non-existent movie)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// No catalog movie carries this exact title
    #[error("Unknown title: {0:?}")]
    UnknownTitle(String),

    /// More than one catalog movie carries this exact title
    #[error("Ambiguous title {title:?} matches movie ids {candidates:?}")]
    AmbiguousTitle {
        title: String,
        candidates: Vec<MovieId>,
    },

    /// Identifier is not part of the catalog
    #[error("Unknown movie id: {0}")]
    UnknownIdentifier(MovieId),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
