//! Approximate nearest-neighbor search over the content vector space.
//!
//! The index is a capability provider selected once at construction:
//! an exact inner-product engine when available, else a graph-based
//! approximate engine, else no engine at all with a deterministic
//! brute-force cosine fallback at query time. The fallback chain is
//! transparent to callers: [`AnnIndex::search`] behaves identically
//! regardless of which engine was built, and engine-specific result
//! semantics (inner product vs. distance) are normalized before return.

pub mod flat;
pub mod graph;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use flat::FlatIpEngine;
pub use graph::GraphEngine;

/// Norm epsilon guarding division by zero on all-zero vectors.
pub(crate) const NORM_EPSILON: f32 = 1e-9;

/// Which engine to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePreference {
    /// Walk the preference chain: flat, then graph, then none.
    #[default]
    Auto,
    /// Exact inner-product engine only.
    Flat,
    /// Graph-based approximate engine only.
    Graph,
    /// No engine; always answer via the brute-force fallback.
    None,
}

/// Construction parameters shared by the engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnParams {
    /// Neighbor-list size for the graph engine.
    pub m: usize,
    /// Candidate-set breadth during graph construction.
    pub ef_construction: usize,
    /// Candidate-set breadth during graph search.
    pub ef_search: usize,
}

impl Default for AnnParams {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 64,
        }
    }
}

/// One search hit: item index and similarity score, descending by
/// similarity.
pub type Neighbor = (usize, f32);

enum Engine {
    Flat(FlatIpEngine),
    Graph(GraphEngine),
    None,
}

/// ANN index over a dense float matrix (rows = items).
pub struct AnnIndex {
    engine: Engine,
    /// L2-normalized item rows, retained for the brute-force path.
    items_norm: Vec<Vec<f32>>,
}

impl AnnIndex {
    /// Build an index over item rows.
    ///
    /// Engine construction failures downgrade silently to the next engine
    /// in the preference chain; they never propagate to the caller.
    /// Building with zero items yields an index that answers every query
    /// with an empty result set.
    pub fn build(vectors: Vec<Vec<f32>>, preference: EnginePreference, params: &AnnParams) -> Self {
        let items_norm = vectors.iter().map(|row| normalize(row)).collect();

        let engine = if vectors.is_empty() {
            Engine::None
        } else {
            match preference {
                EnginePreference::Auto => Self::build_chain(&vectors, params),
                EnginePreference::Flat => match FlatIpEngine::build(vectors.clone()) {
                    Ok(engine) => Engine::Flat(engine),
                    Err(reason) => {
                        tracing::debug!(reason, "flat engine unavailable, using brute force");
                        Engine::None
                    }
                },
                EnginePreference::Graph => match GraphEngine::build(&vectors, params) {
                    Ok(engine) => Engine::Graph(engine),
                    Err(reason) => {
                        tracing::debug!(reason, "graph engine unavailable, using brute force");
                        Engine::None
                    }
                },
                EnginePreference::None => Engine::None,
            }
        };

        Self { engine, items_norm }
    }

    fn build_chain(vectors: &[Vec<f32>], params: &AnnParams) -> Engine {
        match FlatIpEngine::build(vectors.to_vec()) {
            Ok(engine) => return Engine::Flat(engine),
            Err(reason) => {
                tracing::debug!(reason, "flat engine unavailable, trying graph engine");
            }
        }
        match GraphEngine::build(vectors, params) {
            Ok(engine) => Engine::Graph(engine),
            Err(reason) => {
                tracing::debug!(reason, "graph engine unavailable, using brute force");
                Engine::None
            }
        }
    }

    /// Name of the engine that was built.
    pub fn engine_name(&self) -> &'static str {
        match self.engine {
            Engine::Flat(_) => "flat",
            Engine::Graph(_) => "graph",
            Engine::None => "brute_force",
        }
    }

    /// Top-`top_k` item indices per query row, ordered by descending
    /// similarity, with their similarity scores.
    ///
    /// Inner-product engines return similarity directly; the graph engine
    /// ranks by cosine distance, converted here via
    /// `similarity = 1 - distance`.
    pub fn search(&self, queries: &[Vec<f32>], top_k: usize) -> Vec<Vec<Neighbor>> {
        if self.items_norm.is_empty() || top_k == 0 {
            return queries.iter().map(|_| Vec::new()).collect();
        }

        match &self.engine {
            Engine::Flat(engine) => queries
                .iter()
                .map(|query| engine.search(query, top_k))
                .collect(),
            Engine::Graph(engine) => queries
                .iter()
                .map(|query| {
                    engine
                        .search(query, top_k)
                        .into_iter()
                        .map(|(index, distance)| (index, 1.0 - distance))
                        .collect()
                })
                .collect(),
            Engine::None => self.brute_force(queries, top_k),
        }
    }

    /// Brute-force cosine fallback: L2-normalize both sides, full
    /// similarity matrix, top-k per row descending with ties broken by
    /// item index ascending.
    fn brute_force(&self, queries: &[Vec<f32>], top_k: usize) -> Vec<Vec<Neighbor>> {
        queries
            .par_iter()
            .map(|query| {
                let query_norm = normalize(query);
                let mut sims: Vec<Neighbor> = self
                    .items_norm
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (index, dot(&query_norm, item)))
                    .collect();
                top_k_desc(&mut sims, top_k);
                sims
            })
            .collect()
    }
}

/// L2-normalize a row, adding [`NORM_EPSILON`] to the norm so all-zero
/// vectors stay zero instead of dividing by zero.
pub(crate) fn normalize(row: &[f32]) -> Vec<f32> {
    let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt() + NORM_EPSILON;
    row.iter().map(|v| v / norm).collect()
}

/// Dense dot product over the shared prefix of two rows.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Keep the `top_k` highest-similarity entries, descending, ties by item
/// index ascending (stable with respect to test fixtures).
pub(crate) fn top_k_desc(neighbors: &mut Vec<Neighbor>, top_k: usize) {
    neighbors.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    neighbors.truncate(top_k);
}
