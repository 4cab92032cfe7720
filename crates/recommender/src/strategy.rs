//! Strategy selection.

use crate::error::RecommendError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which engine scores a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Metadata similarity (genres, cast, directors, keywords)
    ContentBased,
    /// Latent factors learned from the rating log
    Collaborative,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::ContentBased, Strategy::Collaborative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ContentBased => "content",
            Strategy::Collaborative => "collaborative",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" | "content-based" | "content_based" => Ok(Strategy::ContentBased),
            "collaborative" | "collab" | "svd" => Ok(Strategy::Collaborative),
            other => Err(RecommendError::InvalidRequest(format!(
                "unknown strategy {other:?} (expected \"content\" or \"collaborative\")"
            ))),
        }
    }
}
