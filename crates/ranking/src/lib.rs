//! Ranking and result assembly for engine scores.
//!
//! This crate provides:
//! - `Filter` trait and `FilterPipeline` for dropping candidates by rule
//! - `ExcludeIdsFilter` for keeping seeds out of their own results
//! - `assemble` / `assemble_ranked` for the deterministic final ordering
//!
//! ## Example Usage
//! ```ignore
//! use ranking::assemble;
//!
//! let scores = engine.score(&seed_idxs)?;
//! let titles = assemble(&scores, 10, &seed_ids, &index)?;
//! ```

pub mod assembler;
pub mod candidate;
pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;

pub use assembler::{assemble, assemble_ranked, rank_order};
pub use candidate::{Candidate, RankedMovie};
pub use error::{RankingError, Result};
pub use filter_pipeline::FilterPipeline;
pub use filters::ExcludeIdsFilter;
pub use traits::Filter;
