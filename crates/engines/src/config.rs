//! Tunable parameters for both engines.
//!
//! Both structs deserialize from TOML tables with every field optional, and
//! offer `with_*` builders for programmatic use.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Content engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Multiplier applied to genre token weights
    pub genre_weight: f32,
    /// Multiplier applied to cast token weights
    pub cast_weight: f32,
    /// Multiplier applied to director token weights
    pub director_weight: f32,
    /// Multiplier applied to plot keyword token weights
    pub keyword_weight: f32,
    /// Only the first `max_cast` billed cast members become tokens
    pub max_cast: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            genre_weight: 1.0,
            cast_weight: 1.0,
            director_weight: 1.0,
            keyword_weight: 0.5,
            max_cast: 3,
        }
    }
}

impl ContentConfig {
    pub fn with_genre_weight(mut self, weight: f32) -> Self {
        self.genre_weight = weight;
        self
    }

    pub fn with_cast_weight(mut self, weight: f32) -> Self {
        self.cast_weight = weight;
        self
    }

    pub fn with_director_weight(mut self, weight: f32) -> Self {
        self.director_weight = weight;
        self
    }

    pub fn with_keyword_weight(mut self, weight: f32) -> Self {
        self.keyword_weight = weight;
        self
    }

    pub fn with_max_cast(mut self, max_cast: usize) -> Self {
        self.max_cast = max_cast;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("genre_weight", self.genre_weight),
            ("cast_weight", self.cast_weight),
            ("director_weight", self.director_weight),
            ("keyword_weight", self.keyword_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

/// How candidates are compared against the seed centroid in factor space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorScoring {
    /// Cosine of the angle; ignores vector length
    #[default]
    Cosine,
    /// Raw dot product; longer (usually more-rated) vectors score higher
    InnerProduct,
}

/// Collaborative engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    /// Number of latent dimensions (k)
    pub rank: usize,
    /// L2 penalty, scaled per row by its number of observed ratings
    pub regularization: f32,
    /// Alternating least squares sweeps (one user pass + one item pass each)
    pub iterations: usize,
    /// Seed for the factor initialisation
    pub seed: u64,
    pub scoring: FactorScoring,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            rank: 20,
            regularization: 0.05,
            iterations: 15,
            seed: 42,
            scoring: FactorScoring::Cosine,
        }
    }
}

impl FactorConfig {
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_regularization(mut self, regularization: f32) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_scoring(mut self, scoring: FactorScoring) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rank == 0 {
            return Err(EngineError::InvalidConfig("rank must be at least 1".into()));
        }
        if self.iterations == 0 {
            return Err(EngineError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }
        if !self.regularization.is_finite() || self.regularization <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "regularization must be positive, got {}",
                self.regularization
            )));
        }
        Ok(())
    }
}
