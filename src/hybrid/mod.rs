//! Hybrid blender and ranker.
//!
//! Combines the content similarity and collaborative signal models:
//! eligibility filtering, linear score blending, diversity adjustment,
//! ranking with liked-title deduplication, and human-readable
//! explanations.

pub mod config;
pub mod engine;
pub mod explain;
pub mod handle;
pub mod types;

pub use config::HybridConfig;
pub use engine::HybridEngine;
pub use handle::RecommenderHandle;
pub use types::{RecommendationRequest, RecommendationResponse, RecommendedBook};
