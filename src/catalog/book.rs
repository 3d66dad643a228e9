//! The typed catalog record.

use serde::{Deserialize, Serialize};

/// A single catalog row.
///
/// String attributes default to empty when absent in the source; numeric
/// attributes parse to their semantic type or are treated as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    /// Unique, stable identifier for this catalog row.
    pub book_id: String,
    /// Book title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Country of origin.
    pub country: String,
    /// Language code or name.
    pub language: String,
    /// Genre tokens (pipe-delimited in the persisted form).
    pub genres: Vec<String>,
    /// Theme tokens (pipe-delimited in the persisted form).
    pub themes: Vec<String>,
    /// Publication year, if known.
    pub year: Option<i32>,
    /// Average rating, >= 0.
    pub avg_rating: f64,
    /// Number of ratings, >= 0.
    pub rating_count: u64,
    /// Free-text description.
    pub description: String,
}

impl Book {
    /// Popularity proxy used by both signal models when they degrade:
    /// `rating_count * avg_rating`.
    pub fn popularity_proxy(&self) -> f64 {
        self.rating_count as f64 * self.avg_rating
    }

    /// Whether any of this book's genre tokens equals `genre`,
    /// case-insensitively (whole-token match).
    pub fn has_genre(&self, genre: &str) -> bool {
        let genre = genre.to_lowercase();
        self.genres.iter().any(|g| g.to_lowercase() == genre)
    }

    /// Whether any of this book's theme tokens equals `theme`,
    /// case-insensitively (whole-token match).
    pub fn has_theme(&self, theme: &str) -> bool {
        let theme = theme.to_lowercase();
        self.themes.iter().any(|t| t.to_lowercase() == theme)
    }
}

/// Split a pipe-delimited token list, trimming whitespace and dropping
/// empty entries.
pub(crate) fn split_tokens(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
