//! Graph-based approximate engine.
//!
//! A deterministic single-layer navigable-small-world graph over
//! L2-normalized rows. Nodes are inserted in row order and connected to
//! their `m` nearest discovered neighbors; queries run a best-first beam
//! search of breadth `ef_search`. Scores are cosine *distances*
//! (`1 - cosine similarity`); the index boundary converts them back to
//! similarity.

use super::{dot, normalize, AnnParams, Neighbor};

/// Navigable-small-world search over a dense matrix.
pub struct GraphEngine {
    items_norm: Vec<Vec<f32>>,
    neighbors: Vec<Vec<usize>>,
    m: usize,
    ef_search: usize,
}

impl GraphEngine {
    /// Build the graph. Fails (downgrading the caller to brute force) on
    /// degenerate parameters or inconsistent row dimensions.
    pub fn build(items: &[Vec<f32>], params: &AnnParams) -> Result<Self, &'static str> {
        let Some(first) = items.first() else {
            return Err("no item rows");
        };
        if params.m == 0 || params.ef_construction == 0 {
            return Err("degenerate graph parameters");
        }
        let dimension = first.len();
        if dimension == 0 {
            return Err("zero-dimension rows");
        }
        if items.iter().any(|row| row.len() != dimension) {
            return Err("inconsistent row dimensions");
        }

        let items_norm: Vec<Vec<f32>> = items.iter().map(|row| normalize(row)).collect();
        let mut engine = Self {
            items_norm,
            neighbors: vec![Vec::new(); items.len()],
            m: params.m,
            ef_search: params.ef_search.max(1),
        };

        for node in 1..engine.items_norm.len() {
            let query = engine.items_norm[node].clone();
            let nearest =
                engine.search_layer(&query, params.ef_construction, node);
            for &(neighbor, _) in nearest.iter().take(engine.m) {
                engine.connect(node, neighbor);
                engine.connect(neighbor, node);
            }
        }

        Ok(engine)
    }

    /// Top-`top_k` items by ascending cosine distance, ties by index
    /// ascending.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<(usize, f32)> {
        let query_norm = normalize(query);
        let ef = self.ef_search.max(top_k);
        let mut nearest = self.search_layer(&query_norm, ef, self.items_norm.len());
        nearest.truncate(top_k);
        nearest
    }

    /// Best-first beam search from the entry node over nodes `< limit`,
    /// returning up to `ef` hits sorted by (distance, index).
    fn search_layer(&self, query_norm: &[f32], ef: usize, limit: usize) -> Vec<Neighbor> {
        if limit == 0 {
            return Vec::new();
        }

        let mut visited = vec![false; limit];
        let entry = 0;
        visited[entry] = true;
        let entry_distance = self.distance(query_norm, entry);

        // Both lists sorted by (distance ascending, index ascending).
        let mut results: Vec<(f32, usize)> = vec![(entry_distance, entry)];
        let mut frontier: Vec<(f32, usize)> = vec![(entry_distance, entry)];

        while let Some((candidate_distance, candidate)) = pop_nearest(&mut frontier) {
            let worst = results
                .last()
                .map(|&(distance, _)| distance)
                .unwrap_or(f32::INFINITY);
            if results.len() >= ef && candidate_distance > worst {
                break;
            }

            for &neighbor in &self.neighbors[candidate] {
                if neighbor >= limit || visited[neighbor] {
                    continue;
                }
                visited[neighbor] = true;
                let distance = self.distance(query_norm, neighbor);
                let current_worst = results
                    .last()
                    .map(|&(worst_distance, _)| worst_distance)
                    .unwrap_or(f32::INFINITY);
                if results.len() < ef || distance < current_worst {
                    insert_sorted(&mut results, (distance, neighbor));
                    results.truncate(ef);
                    insert_sorted(&mut frontier, (distance, neighbor));
                }
            }
        }

        results
            .into_iter()
            .map(|(distance, index)| (index, distance))
            .collect()
    }

    fn connect(&mut self, node: usize, neighbor: usize) {
        if node == neighbor || self.neighbors[node].contains(&neighbor) {
            return;
        }
        self.neighbors[node].push(neighbor);
        if self.neighbors[node].len() > self.m {
            // Prune to the m closest neighbors of this node.
            let anchor = self.items_norm[node].clone();
            let mut list = std::mem::take(&mut self.neighbors[node]);
            list.sort_by(|&a, &b| {
                self.distance(&anchor, a)
                    .partial_cmp(&self.distance(&anchor, b))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.cmp(&b))
            });
            list.truncate(self.m);
            self.neighbors[node] = list;
        }
    }

    fn distance(&self, query_norm: &[f32], index: usize) -> f32 {
        1.0 - dot(query_norm, &self.items_norm[index])
    }
}

fn insert_sorted(list: &mut Vec<(f32, usize)>, entry: (f32, usize)) {
    let position = list
        .iter()
        .position(|&(distance, index)| {
            entry.0 < distance || (entry.0 == distance && entry.1 < index)
        })
        .unwrap_or(list.len());
    list.insert(position, entry);
}

fn pop_nearest(list: &mut Vec<(f32, usize)>) -> Option<(f32, usize)> {
    if list.is_empty() {
        None
    } else {
        Some(list.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AnnParams {
        AnnParams {
            m: 4,
            ef_construction: 32,
            ef_search: 16,
        }
    }

    #[test]
    fn test_finds_exact_match() {
        let items = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.7, 0.7, 0.0],
        ];
        let engine = GraphEngine::build(&items, &params()).unwrap();
        let results = engine.search(&[0.0, 1.0, 0.0], 2);
        assert_eq!(results[0].0, 1);
        assert!(results[0].1.abs() < 1e-4);
    }

    #[test]
    fn test_returns_distances_not_similarities() {
        let items = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let engine = GraphEngine::build(&items, &params()).unwrap();
        let results = engine.search(&[0.0, 1.0], 2);
        // Orthogonal item has cosine distance ~1.
        let orthogonal = results.iter().find(|&&(index, _)| index == 0).unwrap();
        assert!((orthogonal.1 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_params_fail_build() {
        let items = vec![vec![1.0, 0.0]];
        let bad = AnnParams {
            m: 0,
            ..params()
        };
        assert!(GraphEngine::build(&items, &bad).is_err());
    }

    #[test]
    fn test_small_graph_matches_exhaustive_order() {
        // With ef well above the item count the beam search degenerates to
        // an exhaustive scan, so ordering must match brute force.
        let items = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.1, 0.9],
            vec![0.0, 1.0],
        ];
        let engine = GraphEngine::build(&items, &params()).unwrap();
        let results = engine.search(&[1.0, 0.0], 4);
        let order: Vec<usize> = results.iter().map(|&(index, _)| index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }
}
