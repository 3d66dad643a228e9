//! Offline ranking-quality metrics.
//!
//! Consumed by evaluation harnesses to score recommendation quality
//! against ground truth; never invoked by the serving path.

use ahash::AHashSet;

/// Fraction of the top `k` recommendations that are relevant.
///
/// Returns 0 for `k <= 0` (expressed here as `k == 0`).
pub fn precision_at_k(recommended: &[String], relevant: &AHashSet<String>, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = recommended
        .iter()
        .take(k)
        .filter(|id| relevant.contains(*id))
        .count();
    hits as f64 / k as f64
}

/// Fraction of the relevant set found in the top `k` recommendations.
///
/// Returns 0 when the relevant set is empty.
pub fn recall_at_k(recommended: &[String], relevant: &AHashSet<String>, k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let hits = recommended
        .iter()
        .take(k)
        .filter(|id| relevant.contains(*id))
        .count();
    hits as f64 / relevant.len() as f64
}

/// Normalized discounted cumulative gain over the top `k`, with binary
/// gains and `log2(rank + 1)` discounts.
///
/// Returns 0 when `k == 0` or the ideal DCG is 0 (no relevant items in
/// range).
pub fn ndcg_at_k(recommended: &[String], relevant: &AHashSet<String>, k: usize) -> f64 {
    fn dcg(gains: &[u32]) -> f64 {
        gains
            .iter()
            .enumerate()
            .map(|(index, &gain)| gain as f64 / ((index + 2) as f64).log2())
            .sum()
    }

    if k == 0 {
        return 0.0;
    }
    let gains: Vec<u32> = recommended
        .iter()
        .take(k)
        .map(|id| u32::from(relevant.contains(id)))
        .collect();
    let mut ideal = gains.clone();
    ideal.sort_unstable_by(|a, b| b.cmp(a));

    let ideal_dcg = dcg(&ideal);
    if ideal_dcg == 0.0 {
        return 0.0;
    }
    dcg(&gains) / ideal_dcg
}
