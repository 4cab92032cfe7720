//! The movie recommendation core.
//!
//! `Recommender` owns the title index and lazily built engines, validates
//! requests and turns favorite titles into a ranked list of titles.
//!
//! ```ignore
//! use recommender::{Recommender, RecommenderConfig, Strategy};
//!
//! let recommender = Recommender::load("data".as_ref(), RecommenderConfig::default())?;
//! let titles = recommender.recommend(
//!     &["Toy Story (1995)", "Heat (1995)", "Casino (1995)"],
//!     10,
//!     Strategy::ContentBased,
//! )?;
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod strategy;

pub use config::RecommenderConfig;
pub use error::{RecommendError, Result};
pub use ranking::RankedMovie;
pub use service::{Recommendation, Recommender, SeedWarning};
pub use strategy::Strategy;
