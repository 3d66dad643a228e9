//! Explanation strings for recommended books.

use crate::catalog::Book;

use super::types::RecommendationRequest;

/// Fallback phrase when no preference matched.
const GENERIC_REASON: &str = "personalized based on your preferences";

/// Build a short reason string for one recommended book.
///
/// Reasons are checked in fixed priority order (genre, theme, author,
/// country, language, year range) and at most the first two are joined by
/// `"; "`. When either signal model scored the book, a
/// `"; signal: content, collab"` suffix names the contributors, in that
/// fixed order.
pub fn build_explanation(
    book: &Book,
    request: &RecommendationRequest,
    from_content: bool,
    from_collab: bool,
) -> String {
    let mut reasons: Vec<&str> = Vec::new();

    if request.genres.iter().any(|g| book.has_genre(g)) {
        reasons.push("matches your preferred genre");
    }
    if request.themes.iter().any(|t| book.has_theme(t)) {
        reasons.push("aligns with your themes");
    }
    let author = book.author.to_lowercase();
    if !request.authors.is_empty()
        && request.authors.iter().any(|a| a.to_lowercase() == author)
    {
        reasons.push("by your preferred author");
    }
    let country = book.country.to_lowercase();
    if !request.countries.is_empty()
        && request.countries.iter().any(|c| c.to_lowercase() == country)
    {
        reasons.push("from your selected country");
    }
    let language = book.language.to_lowercase();
    if !request.languages.is_empty()
        && request.languages.iter().any(|l| l.to_lowercase() == language)
    {
        reasons.push("in your preferred language");
    }
    if request.min_year.is_some() || request.max_year.is_some() {
        reasons.push("within your publication year range");
    }

    let mut explanation = if reasons.is_empty() {
        GENERIC_REASON.to_string()
    } else {
        reasons[..reasons.len().min(2)].join("; ")
    };

    let mut signals: Vec<&str> = Vec::new();
    if from_content {
        signals.push("content");
    }
    if from_collab {
        signals.push("collab");
    }
    if !signals.is_empty() {
        explanation.push_str("; signal: ");
        explanation.push_str(&signals.join(", "));
    }

    explanation
}
