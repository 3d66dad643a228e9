//! Optional graph-similarity collaborator.
//!
//! An external service that, given a book title, returns related titles
//! discovered by traversing shared author/genre/theme relationships. The
//! engine may merge its output as a supplementary soft signal but never
//! depends on it: the contract under failure is "return no additional
//! signal", never propagate an error.

/// Supplementary title-similarity provider.
pub trait SimilarityGraph: Send + Sync {
    /// Related titles for `title`, best first, at most `limit`. Any
    /// backend failure must surface as an empty list.
    fn related_titles(&self, title: &str, limit: usize) -> Vec<String>;
}

/// Provider that contributes no signal. Used when no graph backend is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGraph;

impl SimilarityGraph for NullGraph {
    fn related_titles(&self, _title: &str, _limit: usize) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_graph_returns_no_signal() {
        assert!(NullGraph.related_titles("Akata Witch", 10).is_empty());
    }
}
