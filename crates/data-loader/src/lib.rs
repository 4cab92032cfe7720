//! # Data Loader Crate
//!
//! Loads the movie catalog and rating log and owns the title index.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, Catalog, RatingLog)
//! - **parser**: Parse the CSV files into Rust structs
//! - **dataset**: Load a whole data directory and validate it
//! - **index**: `TitleIndex`, title <-> identifier resolution
//! - **error**: Error types for loading and resolution
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DataSet, TitleIndex};
//! use std::path::Path;
//!
//! let dataset = DataSet::load_from_dir(Path::new("data"))?;
//! let index = TitleIndex::new(dataset.catalog)?;
//!
//! let id = index.resolve("Toy Story (1995)")?;
//! println!("{} -> {}", id, index.lookup(id)?);
//! ```

pub mod dataset;
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use dataset::{DataSet, METADATA_FILE, MOVIES_FILE, RATINGS_FILE};
pub use error::{DataLoadError, Result};
pub use index::TitleIndex;
pub use types::{
    // Type aliases
    MovieId,
    MovieIdx,
    UserId,
    // Core types
    Catalog,
    Movie,
    MovieMetadata,
    Rating,
    RatingLog,
    // Constants
    MAX_RATING,
    MIN_RATING,
};
