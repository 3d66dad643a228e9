//! Collaborative signal model: item co-occurrence plus popularity priors.
//!
//! Built from historical interaction events. Degrades gracefully to a
//! content-agnostic popularity signal when no usable interaction log is
//! available (cold start).

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Book, Catalog};
use crate::hybrid::RecommendationRequest;

/// Weight of the popularity prior added on top of co-occurrence scores.
/// Deliberate low-weight smoothing, not a tunable surfaced to callers.
const POPULARITY_SMOOTHING: f64 = 0.05;

/// A single observed (user, book, strength) interaction event.
///
/// Multiple events per (user, book) pair are kept as-is, never
/// deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// User identifier.
    pub user_id: String,
    /// Book identifier.
    pub book_id: String,
    /// Observed signal strength (rating, click weight, ...), >= 0.
    pub event_strength: f64,
}

/// Load interaction events from a CSV file.
///
/// Returns `None` when the file is missing or lacks any of the required
/// `user_id`, `book_id`, `event_strength` columns. Both conditions are
/// degraded-signal paths, never initialization failures.
pub fn load_interactions(path: impl AsRef<Path>) -> Option<Vec<Interaction>> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "interaction log not found, using popularity-only signal");
        return None;
    }

    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "interaction log unreadable");
            return None;
        }
    };
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "interaction log unreadable");
            return None;
        }
    };
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (user_col, book_col, strength_col) =
        match (column("user_id"), column("book_id"), column("event_strength")) {
            (Some(u), Some(b), Some(s)) => (u, b, s),
            _ => {
                tracing::warn!(
                    path = %path.display(),
                    "interaction log is missing required columns, treating as absent"
                );
                return None;
            }
        };

    let mut interactions = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else { continue };
        let user_id = record.get(user_col).unwrap_or_default().trim();
        let book_id = record.get(book_col).unwrap_or_default().trim();
        if user_id.is_empty() || book_id.is_empty() {
            continue;
        }
        let event_strength = record
            .get(strength_col)
            .unwrap_or_default()
            .trim()
            .parse()
            .unwrap_or(0.0);
        interactions.push(Interaction {
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
            event_strength,
        });
    }
    Some(interactions)
}

/// Collaborative signal model.
///
/// Rebuilt in full on each fit call; immutable afterwards.
#[derive(Debug, Default)]
pub struct CollaborativeModel {
    popularity: AHashMap<String, f64>,
    cooccurrence: AHashMap<String, AHashMap<String, u32>>,
}

impl CollaborativeModel {
    /// Fit the model from an interaction log, with the catalog as the
    /// cold-start fallback.
    ///
    /// `interactions == None` (absent or invalid log) derives a
    /// popularity-only signal of `rating_count * avg_rating` per catalog
    /// book. Otherwise the popularity prior is per-book summed event
    /// strength, and a symmetric co-occurrence table is built from
    /// per-user baskets.
    pub fn fit(interactions: Option<&[Interaction]>, catalog: &Catalog) -> Self {
        let Some(interactions) = interactions else {
            let popularity = catalog
                .iter()
                .map(|book| (book.book_id.clone(), book.popularity_proxy()))
                .collect();
            return Self {
                popularity,
                cooccurrence: AHashMap::new(),
            };
        };

        let mut popularity: AHashMap<String, f64> = AHashMap::new();
        for event in interactions {
            *popularity.entry(event.book_id.clone()).or_insert(0.0) += event.event_strength;
        }

        // Per-user baskets, in first-seen user order.
        let mut basket_index: AHashMap<&str, usize> = AHashMap::new();
        let mut baskets: Vec<Vec<(&str, f64)>> = Vec::new();
        for event in interactions {
            let slot = *basket_index
                .entry(event.user_id.as_str())
                .or_insert_with(|| {
                    baskets.push(Vec::new());
                    baskets.len() - 1
                });
            baskets[slot].push((event.book_id.as_str(), event.event_strength));
        }

        let mut cooccurrence: AHashMap<String, AHashMap<String, u32>> = AHashMap::new();
        for basket in &mut baskets {
            // Descending strength; the sort is stable, so equal strengths
            // keep their original row order.
            basket.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            for i in 0..basket.len() {
                let a = basket[i].0;
                cooccurrence.entry(a.to_string()).or_default();
                for &(b, _) in basket.iter().skip(i + 1) {
                    if a == b {
                        continue;
                    }
                    *cooccurrence
                        .entry(a.to_string())
                        .or_default()
                        .entry(b.to_string())
                        .or_insert(0) += 1;
                    *cooccurrence
                        .entry(b.to_string())
                        .or_default()
                        .entry(a.to_string())
                        .or_insert(0) += 1;
                }
            }
        }

        tracing::info!(
            events = interactions.len(),
            users = baskets.len(),
            items = cooccurrence.len(),
            "collaborative model fitted"
        );

        Self {
            popularity,
            cooccurrence,
        }
    }

    /// Co-occurrence count between two items (0 when never observed
    /// together).
    pub fn cooccurrence_count(&self, a: &str, b: &str) -> u32 {
        self.cooccurrence
            .get(a)
            .and_then(|partners| partners.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Popularity prior for an item, if any.
    pub fn popularity(&self, book_id: &str) -> Option<f64> {
        self.popularity.get(book_id).copied()
    }

    /// Score candidates for a request.
    ///
    /// Liked titles are resolved case-insensitively against the candidate
    /// set only; unresolved titles are silently ignored. The result is the
    /// per-candidate co-occurrence mass with the liked items plus
    /// `0.05 * popularity` smoothing, with popularity-proxy fallbacks per
    /// the cold-start rules.
    pub fn score_candidates(
        &self,
        request: &RecommendationRequest,
        candidates: &[&Book],
    ) -> AHashMap<String, f64> {
        if candidates.is_empty() {
            return AHashMap::new();
        }

        let mut title_to_id: AHashMap<String, &str> = AHashMap::new();
        for book in candidates {
            title_to_id.insert(book.title.to_lowercase(), book.book_id.as_str());
        }
        let liked_ids: Vec<&str> = request
            .liked_books
            .iter()
            .filter_map(|title| title_to_id.get(&title.to_lowercase()).copied())
            .collect();

        if liked_ids.is_empty() && self.popularity.is_empty() {
            return Self::candidate_popularity(candidates);
        }

        let mut scores: AHashMap<String, f64> = AHashMap::new();
        for liked in &liked_ids {
            if let Some(partners) = self.cooccurrence.get(*liked) {
                for (other, &count) in partners {
                    *scores.entry(other.clone()).or_insert(0.0) += count as f64;
                }
            }
        }
        for (item, &prior) in &self.popularity {
            *scores.entry(item.clone()).or_insert(0.0) += POPULARITY_SMOOTHING * prior;
        }

        let candidate_ids: AHashMap<&str, ()> = candidates
            .iter()
            .map(|book| (book.book_id.as_str(), ()))
            .collect();
        scores.retain(|book_id, _| candidate_ids.contains_key(book_id.as_str()));

        if scores.is_empty() {
            tracing::debug!("no collaborative signal within candidates, using popularity proxy");
            return Self::candidate_popularity(candidates);
        }
        scores
    }

    fn candidate_popularity(candidates: &[&Book]) -> AHashMap<String, f64> {
        candidates
            .iter()
            .map(|book| (book.book_id.clone(), book.popularity_proxy()))
            .collect()
    }
}
