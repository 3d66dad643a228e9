//! Request and response types for the recommendation engine.

use serde::{Deserialize, Serialize};

fn default_limit() -> usize {
    10
}

/// Structured user preferences for one recommendation request.
///
/// List order never affects filtering semantics; all matching is
/// case-insensitive. Liked titles act both as a positive-preference signal
/// and as an exclusion set from the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Preferred genres (whole-token match against book genre sets).
    #[serde(default)]
    pub genres: Vec<String>,
    /// Preferred authors (exact match).
    #[serde(default)]
    pub authors: Vec<String>,
    /// Preferred countries (exact match).
    #[serde(default)]
    pub countries: Vec<String>,
    /// Preferred languages (exact match).
    #[serde(default)]
    pub languages: Vec<String>,
    /// Preferred themes (whole-token match against book theme sets).
    #[serde(default)]
    pub themes: Vec<String>,
    /// Inclusive lower publication-year bound.
    #[serde(default)]
    pub min_year: Option<i32>,
    /// Inclusive upper publication-year bound.
    #[serde(default)]
    pub max_year: Option<i32>,
    /// Titles of books the user liked.
    #[serde(default)]
    pub liked_books: Vec<String>,
    /// Maximum number of results (clamped to at least 1 during ranking).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            authors: Vec::new(),
            countries: Vec::new(),
            languages: Vec::new(),
            themes: Vec::new(),
            min_year: None,
            max_year: None,
            liked_books: Vec::new(),
            limit: default_limit(),
        }
    }
}

/// One recommended book in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedBook {
    /// Catalog identifier.
    pub book_id: String,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Country, when known.
    pub country: Option<String>,
    /// Language, when known.
    pub language: Option<String>,
    /// Genre tokens.
    pub genres: Vec<String>,
    /// Publication year, when known.
    pub year: Option<i32>,
    /// Blended score. Unbounded but finite; not a probability.
    pub score: f64,
    /// Short natural-language explanation.
    pub explanation: String,
}

/// Ordered list of recommendations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationResponse {
    /// Recommendations, best first.
    pub recommendations: Vec<RecommendedBook>,
}
