//! # Engines Crate
//!
//! The two scoring strategies behind movie recommendations.
//!
//! ## Components
//!
//! ### Content Engine
//! Metadata similarity:
//! - "Movies that look like the ones you picked"
//! - TF-IDF over genres, cast, directors and plot keywords
//! - Cosine similarity through an inverted index, summed over seeds
//!
//! ### Collaborative Engine
//! Latent factors learned from the rating log:
//! - "Movies rated like the ones you picked"
//! - Alternating least squares on observed ratings only
//! - Candidates scored against the centroid of the seeds' item factors
//!
//! Both engines are built once from a `TitleIndex` and are read-only
//! afterwards; `score` may be called from any number of threads.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DataSet, TitleIndex};
//! use engines::{ContentConfig, ContentEngine, ScoringEngine};
//!
//! let data = DataSet::load_from_dir("data".as_ref())?;
//! let index = TitleIndex::new(data.catalog)?;
//! let engine = ContentEngine::build(&index, &ContentConfig::default())?;
//!
//! let seed = index.idx_of(index.resolve("Toy Story (1995)")?).unwrap();
//! let scores = engine.score(&[seed])?;
//! ```
//!
//! Scores come back unsorted with the seeds still in them; ranking is a
//! separate step.

pub mod collaborative;
pub mod config;
pub mod content;
pub mod error;
pub mod linalg;
pub mod types;

pub use collaborative::{CollaborativeEngine, FactorModel, RatingMatrix};
pub use config::{ContentConfig, FactorConfig, FactorScoring};
pub use content::{ContentEngine, FeatureMatrix};
pub use error::{EngineError, Result};
pub use types::{CandidateScores, InsufficientData, InsufficientDataKind, ScoringEngine};
