//! # Bibliorec
//!
//! A hybrid book recommendation engine for Rust.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - TF-IDF content similarity over catalog text fields
//! - Collaborative co-occurrence signals with popularity priors
//! - Linear score blending with a diversity adjustment
//! - Pluggable approximate nearest-neighbor search with exact fallback
//! - Offline ranking-quality metrics (precision, recall, NDCG)

pub mod ann;
pub mod cache;
pub mod catalog;
pub mod collab;
pub mod config;
pub mod content;
pub mod error;
pub mod eval;
pub mod graph;
pub mod hybrid;
pub mod sample;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::catalog::{Book, Catalog};
    pub use crate::collab::{CollaborativeModel, Interaction};
    pub use crate::config::RecommenderConfig;
    pub use crate::content::ContentModel;
    pub use crate::error::{RecommenderError, Result};
    pub use crate::hybrid::{
        HybridConfig, HybridEngine, RecommendationRequest, RecommendationResponse,
        RecommendedBook, RecommenderHandle,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
