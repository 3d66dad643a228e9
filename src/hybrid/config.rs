//! Configuration for hybrid blending and ranking.

use serde::{Deserialize, Serialize};

fn default_alpha() -> f64 {
    0.6
}

fn default_diversity_weight() -> f64 {
    0.15
}

fn default_graph_boost() -> f64 {
    0.1
}

/// Blending and diversity settings for the hybrid engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Content-model weight in `[0, 1]`; the collaborative model gets
    /// `1 - alpha`.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Weight of the diversity adjustment multiplier.
    #[serde(default = "default_diversity_weight")]
    pub diversity_weight: f64,
    /// Additive boost per graph-collaborator mention, applied before the
    /// diversity adjustment. Only used when a similarity graph is wired in.
    #[serde(default = "default_graph_boost")]
    pub graph_boost: f64,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            diversity_weight: default_diversity_weight(),
            graph_boost: default_graph_boost(),
        }
    }
}
