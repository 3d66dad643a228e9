//! Exact inner-product engine.
//!
//! Scans every item row and scores by raw inner product, the same result
//! semantics as a flat IP index: callers get similarity directly, with no
//! distance conversion.

use super::{dot, top_k_desc, Neighbor};

/// Exact inner-product search over a dense matrix.
pub struct FlatIpEngine {
    items: Vec<Vec<f32>>,
}

impl FlatIpEngine {
    /// Build over item rows. Fails (downgrading the caller to the next
    /// engine) when rows disagree on dimension.
    pub fn build(items: Vec<Vec<f32>>) -> Result<Self, &'static str> {
        let Some(first) = items.first() else {
            return Err("no item rows");
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err("zero-dimension rows");
        }
        if items.iter().any(|row| row.len() != dimension) {
            return Err("inconsistent row dimensions");
        }
        Ok(Self { items })
    }

    /// Top-`top_k` items by descending inner product, ties by index
    /// ascending.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<Neighbor> {
        let mut scores: Vec<Neighbor> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (index, dot(query, item)))
            .collect();
        top_k_desc(&mut scores, top_k);
        scores
    }
}
