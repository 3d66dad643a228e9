//! Serving handle with build-then-swap initialization semantics.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{RecommenderError, Result};

use super::engine::HybridEngine;
use super::types::{RecommendationRequest, RecommendationResponse};

/// Shared handle through which the serving boundary reaches the engine.
///
/// Starts empty; requests arriving before [`RecommenderHandle::install`]
/// fail fast with a not-ready error instead of operating on partial
/// state. Installing a rebuilt engine is an atomic snapshot swap, so
/// in-flight requests keep reading the engine they started with and the
/// read path never blocks on a rebuild.
#[derive(Default)]
pub struct RecommenderHandle {
    engine: RwLock<Option<Arc<HybridEngine>>>,
}

impl RecommenderHandle {
    /// Create an empty (not ready) handle.
    pub fn new() -> Self {
        Self {
            engine: RwLock::new(None),
        }
    }

    /// Whether an engine has been installed.
    pub fn is_ready(&self) -> bool {
        self.engine.read().is_some()
    }

    /// Atomically install a freshly fitted engine, replacing any previous
    /// snapshot.
    pub fn install(&self, engine: HybridEngine) {
        *self.engine.write() = Some(Arc::new(engine));
    }

    /// Current engine snapshot, if ready.
    pub fn snapshot(&self) -> Option<Arc<HybridEngine>> {
        self.engine.read().clone()
    }

    /// Serve one request against the current snapshot.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let engine = self
            .snapshot()
            .ok_or_else(|| RecommenderError::not_ready("initialization has not completed"))?;
        engine.recommend(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Book, Catalog};
    use crate::hybrid::HybridConfig;

    fn engine() -> HybridEngine {
        let catalog = Arc::new(Catalog::from_books(vec![Book {
            book_id: "b1".to_string(),
            title: "Things Fall Apart".to_string(),
            rating_count: 10,
            avg_rating: 4.0,
            ..Book::default()
        }]));
        HybridEngine::fit(HybridConfig::default(), catalog, None)
    }

    #[test]
    fn test_not_ready_before_install() {
        let handle = RecommenderHandle::new();
        assert!(!handle.is_ready());
        let err = handle
            .recommend(&RecommendationRequest::default())
            .unwrap_err();
        assert!(matches!(err, RecommenderError::NotReady(_)));
    }

    #[test]
    fn test_ready_after_install() {
        let handle = RecommenderHandle::new();
        handle.install(engine());
        assert!(handle.is_ready());
        let response = handle
            .recommend(&RecommendationRequest::default())
            .unwrap();
        assert_eq!(response.recommendations.len(), 1);
    }

    #[test]
    fn test_install_swaps_snapshot() {
        let handle = RecommenderHandle::new();
        handle.install(engine());
        let first = handle.snapshot().unwrap();
        handle.install(engine());
        let second = handle.snapshot().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
