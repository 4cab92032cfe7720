//! Recommender configuration.
//!
//! Loaded from an optional TOML file; missing tables and keys fall back to
//! the defaults:
//!
//! ```toml
//! [content]
//! keyword_weight = 0.5
//! max_cast = 3
//!
//! [collaborative]
//! rank = 20
//! regularization = 0.05
//! iterations = 15
//! seed = 42
//! scoring = "cosine"
//! ```

use crate::error::{RecommendError, Result};
use engines::{ContentConfig, FactorConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub content: ContentConfig,
    pub collaborative: FactorConfig,
}

impl RecommenderConfig {
    pub fn with_content(mut self, content: ContentConfig) -> Self {
        self.content = content;
        self
    }

    pub fn with_collaborative(mut self, collaborative: FactorConfig) -> Self {
        self.collaborative = collaborative;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RecommendError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {:?}", path);
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.content.validate()?;
        self.collaborative.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engines::FactorScoring;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RecommenderConfig::from_toml_str(
            r#"
            [collaborative]
            rank = 8
            scoring = "inner_product"
            "#,
        )
        .unwrap();

        assert_eq!(config.collaborative.rank, 8);
        assert_eq!(config.collaborative.scoring, FactorScoring::InnerProduct);
        assert_eq!(config.collaborative.iterations, 15);
        assert_eq!(config.content, ContentConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            RecommenderConfig::from_toml_str("").unwrap(),
            RecommenderConfig::default()
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            RecommenderConfig::from_toml_str("[collaborative]\nrank = 0"),
            Err(RecommendError::Config(_))
        ));
        assert!(matches!(
            RecommenderConfig::from_toml_str("[content]\ngenre_weight = -2.0"),
            Err(RecommendError::Config(_))
        ));
        assert!(matches!(
            RecommenderConfig::from_toml_str("[collaborative]\nrank = \"big\""),
            Err(RecommendError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[content]\nmax_cast = 5").unwrap();

        let config = RecommenderConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.content.max_cast, 5);

        assert!(matches!(
            RecommenderConfig::from_toml_file(Path::new("/nonexistent/recs.toml")),
            Err(RecommendError::ConfigFile { .. })
        ));
    }
}
