//! Configuration for the recommendation engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ann::{AnnParams, EnginePreference};
use crate::error::Result;
use crate::hybrid::HybridConfig;

/// File paths for the tabular data sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Catalog CSV path.
    pub books_csv: String,
    /// Interaction log CSV path.
    pub interactions_csv: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            books_csv: "sample_data/books_sample.csv".to_string(),
            interactions_csv: "sample_data/user_interactions_sample.csv".to_string(),
        }
    }
}

/// Top-level configuration for a recommender instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Data source paths.
    #[serde(default)]
    pub paths: DataPaths,
    /// Blending, diversity, and explanation settings.
    #[serde(default)]
    pub recommendation: HybridConfig,
    /// ANN engine selection and construction parameters.
    #[serde(default)]
    pub ann: AnnSettings,
}

/// ANN acceleration settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnSettings {
    /// Which engine to build, or `Auto` to walk the preference chain.
    #[serde(default)]
    pub engine: EnginePreference,
    /// Construction parameters shared by all engines.
    #[serde(default)]
    pub params: AnnParams,
}

impl RecommenderConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the default configuration; a present but
    /// malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
