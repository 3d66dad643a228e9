//! The hybrid recommendation engine.

use std::sync::Arc;

use ahash::AHashMap;
use ahash::AHashSet;

use crate::catalog::{Book, Catalog};
use crate::collab::{self, CollaborativeModel, Interaction};
use crate::config::RecommenderConfig;
use crate::content::ContentModel;
use crate::error::Result;
use crate::graph::SimilarityGraph;

use super::config::HybridConfig;
use super::explain::build_explanation;
use super::types::{RecommendationRequest, RecommendationResponse, RecommendedBook};

/// Hybrid recommendation engine holding the catalog and both fitted
/// signal models.
///
/// All state is immutable after [`HybridEngine::fit`]; `recommend` takes
/// `&self` and may be called from arbitrarily many threads without
/// locking. Rebuilds produce a fresh engine installed through
/// [`super::handle::RecommenderHandle`].
pub struct HybridEngine {
    config: HybridConfig,
    catalog: Arc<Catalog>,
    content: ContentModel,
    collab: CollaborativeModel,
    graph: Option<Box<dyn SimilarityGraph>>,
}

impl HybridEngine {
    /// Fit both models against the catalog and interaction history.
    pub fn fit(
        config: HybridConfig,
        catalog: Arc<Catalog>,
        interactions: Option<&[Interaction]>,
    ) -> Self {
        let content = ContentModel::fit(&catalog);
        let collab = CollaborativeModel::fit(interactions, &catalog);
        Self {
            config,
            catalog,
            content,
            collab,
            graph: None,
        }
    }

    /// Load every data source named by the configuration and fit.
    ///
    /// The catalog is required (a missing file is a configuration error);
    /// the interaction log degrades gracefully when absent or invalid.
    pub fn from_config(config: &RecommenderConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::load_csv(&config.paths.books_csv)?);
        let interactions = collab::load_interactions(&config.paths.interactions_csv);
        Ok(Self::fit(
            config.recommendation.clone(),
            catalog,
            interactions.as_deref(),
        ))
    }

    /// Attach an optional similarity-graph collaborator. Its output is
    /// merged as a small additive boost; the engine never depends on it.
    pub fn with_graph(mut self, graph: Box<dyn SimilarityGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// The catalog this engine was fitted over.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The fitted content model (for ANN index construction).
    pub fn content_model(&self) -> &ContentModel {
        &self.content
    }

    /// The fitted collaborative model.
    pub fn collaborative_model(&self) -> &CollaborativeModel {
        &self.collab
    }

    /// Produce ranked, explained recommendations for a request.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let candidates = self.filter_candidates(request);
        if candidates.is_empty() {
            return Ok(RecommendationResponse::default());
        }

        let content_scores = self.content.score_candidates(request, &candidates);
        let collab_scores = self.collab.score_candidates(request, &candidates);

        // Blend over the union of both score maps, walked in candidate
        // (insertion) order so equal scores rank deterministically.
        let alpha = self.config.alpha;
        let mut blended: Vec<(usize, f64)> = Vec::new();
        for (position, book) in candidates.iter().enumerate() {
            let content = content_scores.get(&book.book_id);
            let collab = collab_scores.get(&book.book_id);
            if content.is_none() && collab.is_none() {
                continue;
            }
            let score = alpha * content.copied().unwrap_or(0.0)
                + (1.0 - alpha) * collab.copied().unwrap_or(0.0);
            blended.push((position, score));
        }

        self.apply_graph_boost(request, &candidates, &mut blended);
        self.apply_diversity_adjustment(&candidates, &mut blended);

        // Stable sort keeps candidate order on ties.
        blended.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let liked_titles: AHashSet<String> = request
            .liked_books
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        let limit = request.limit.max(1);

        let mut recommendations = Vec::with_capacity(limit);
        for &(position, score) in &blended {
            if recommendations.len() >= limit {
                break;
            }
            let book = candidates[position];
            if liked_titles.contains(&book.title.to_lowercase()) {
                continue;
            }
            let explanation = build_explanation(
                book,
                request,
                content_scores.contains_key(&book.book_id),
                collab_scores.contains_key(&book.book_id),
            );
            recommendations.push(RecommendedBook {
                book_id: book.book_id.clone(),
                title: book.title.clone(),
                author: book.author.clone(),
                country: non_empty(&book.country),
                language: non_empty(&book.language),
                genres: book.genres.clone(),
                year: book.year,
                score,
                explanation,
            });
        }

        Ok(RecommendationResponse { recommendations })
    }

    /// Conjunctive eligibility filtering. An empty result abandons the
    /// filter and uses the full catalog, so overly strict filters never
    /// produce an empty response.
    fn filter_candidates(&self, request: &RecommendationRequest) -> Vec<&Book> {
        let authors = lowercase_set(&request.authors);
        let countries = lowercase_set(&request.countries);
        let languages = lowercase_set(&request.languages);

        let filtered: Vec<&Book> = self
            .catalog
            .iter()
            .filter(|book| {
                if !request.genres.is_empty()
                    && !request.genres.iter().any(|g| book.has_genre(g))
                {
                    return false;
                }
                if !authors.is_empty() && !authors.contains(&book.author.to_lowercase()) {
                    return false;
                }
                if !countries.is_empty() && !countries.contains(&book.country.to_lowercase()) {
                    return false;
                }
                if !languages.is_empty() && !languages.contains(&book.language.to_lowercase()) {
                    return false;
                }
                if let Some(min_year) = request.min_year {
                    match book.year {
                        Some(year) if year >= min_year => {}
                        _ => return false,
                    }
                }
                if let Some(max_year) = request.max_year {
                    match book.year {
                        Some(year) if year <= max_year => {}
                        _ => return false,
                    }
                }
                true
            })
            .collect();

        if filtered.is_empty() {
            tracing::debug!("filters matched no books, falling back to the full catalog");
            self.catalog.iter().collect()
        } else {
            filtered
        }
    }

    /// Merge the optional graph collaborator as an additive boost per
    /// related-title mention. A failing or absent provider contributes
    /// nothing.
    fn apply_graph_boost(
        &self,
        request: &RecommendationRequest,
        candidates: &[&Book],
        blended: &mut [(usize, f64)],
    ) {
        let Some(graph) = &self.graph else { return };
        if request.liked_books.is_empty() {
            return;
        }

        let mut title_to_position: AHashMap<String, usize> = AHashMap::new();
        for (position, book) in candidates.iter().enumerate() {
            title_to_position.insert(book.title.to_lowercase(), position);
        }

        let mut boosts: AHashMap<usize, f64> = AHashMap::new();
        for liked in &request.liked_books {
            for related in graph.related_titles(liked, request.limit.max(1)) {
                if let Some(&position) = title_to_position.get(&related.to_lowercase()) {
                    *boosts.entry(position).or_insert(0.0) += self.config.graph_boost;
                }
            }
        }
        if boosts.is_empty() {
            return;
        }

        for (position, score) in blended.iter_mut() {
            if let Some(boost) = boosts.get(position) {
                *score += boost;
            }
        }
    }

    /// Multiply each blended score by a rarity term computed over the
    /// candidate set's country and language frequencies.
    ///
    /// The rarity sum is divided by 2 inside the multiplier even when only
    /// one signal contributed, matching the reference arithmetic exactly.
    fn apply_diversity_adjustment(&self, candidates: &[&Book], blended: &mut [(usize, f64)]) {
        if candidates.is_empty() || blended.is_empty() {
            return;
        }

        let mut country_counts: AHashMap<String, usize> = AHashMap::new();
        let mut language_counts: AHashMap<String, usize> = AHashMap::new();
        for book in candidates {
            *country_counts
                .entry(book.country.to_lowercase())
                .or_insert(0) += 1;
            *language_counts
                .entry(book.language.to_lowercase())
                .or_insert(0) += 1;
        }
        let max_country = country_counts.values().copied().max().unwrap_or(1) as f64;
        let max_language = language_counts.values().copied().max().unwrap_or(1) as f64;

        let diversity_weight = self.config.diversity_weight;
        for (position, score) in blended.iter_mut() {
            let book = candidates[*position];
            let mut rarity = 0.0;
            let country = book.country.to_lowercase();
            if !country.is_empty() {
                let count = country_counts.get(&country).copied().unwrap_or(0) as f64;
                rarity += 1.0 - count / max_country;
            }
            let language = book.language.to_lowercase();
            if !language.is_empty() {
                let count = language_counts.get(&language).copied().unwrap_or(0) as f64;
                rarity += 1.0 - count / max_language;
            }
            *score *= 1.0 + diversity_weight * (rarity / 2.0);
        }
    }
}

fn lowercase_set(values: &[String]) -> AHashSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
