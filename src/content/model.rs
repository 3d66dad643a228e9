//! Content scoring model over the fitted TF-IDF vector space.

use ahash::AHashMap;

use super::vectorizer::{SparseVector, TfIdfConfig, TfIdfVectorizer};
use crate::catalog::{Book, Catalog};
use crate::hybrid::RecommendationRequest;

/// Content similarity model.
///
/// Fit once against the catalog; immutable afterwards. Scores candidates
/// by cosine similarity between their pre-fit vectors and a pseudo-document
/// built from the request's preference tokens.
#[derive(Debug)]
pub struct ContentModel {
    vectorizer: TfIdfVectorizer,
    id_to_row: AHashMap<String, usize>,
    rows: Vec<SparseVector>,
    fitted: bool,
}

impl ContentModel {
    /// Fit the model over every book in the catalog.
    ///
    /// An empty catalog yields a degenerate unfit model whose score calls
    /// return empty results rather than erroring.
    pub fn fit(catalog: &Catalog) -> Self {
        let corpus: Vec<String> = catalog.iter().map(Self::book_document).collect();
        let vectorizer = TfIdfVectorizer::fit(&corpus, TfIdfConfig::default());

        let mut id_to_row = AHashMap::with_capacity(catalog.len());
        let mut rows = Vec::with_capacity(catalog.len());
        for (row, book) in catalog.iter().enumerate() {
            id_to_row.insert(book.book_id.clone(), row);
            rows.push(vectorizer.transform(&corpus[row]));
        }

        let fitted = !corpus.is_empty();
        if fitted {
            tracing::info!(
                books = rows.len(),
                vocabulary = vectorizer.dimension(),
                "content model fitted"
            );
        } else {
            tracing::warn!("content model fitted over an empty catalog");
        }

        Self {
            vectorizer,
            id_to_row,
            rows,
            fitted,
        }
    }

    /// Whether the model was fit over a non-empty corpus.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Score candidates against the request's preference tokens.
    ///
    /// Returns a map from `book_id` to cosine similarity. Absence from the
    /// map means "no content-model opinion": candidates outside the fitted
    /// book set are silently dropped. A request with no preference tokens
    /// falls back to the popularity proxy `rating_count * avg_rating`.
    pub fn score_candidates(
        &self,
        request: &RecommendationRequest,
        candidates: &[&Book],
    ) -> AHashMap<String, f64> {
        if !self.fitted || candidates.is_empty() {
            return AHashMap::new();
        }

        let query_text = Self::query_text(request);
        if query_text.trim().is_empty() {
            tracing::debug!("no preference tokens in request, scoring by popularity proxy");
            return candidates
                .iter()
                .map(|book| (book.book_id.clone(), book.popularity_proxy()))
                .collect();
        }

        let query = self.vectorizer.transform(&query_text);
        let mut scores = AHashMap::with_capacity(candidates.len());
        for book in candidates {
            if let Some(&row) = self.id_to_row.get(&book.book_id) {
                let similarity = query.dot(&self.rows[row]) as f64;
                scores.insert(book.book_id.clone(), similarity);
            }
        }
        scores
    }

    /// Vector-space dimension of the fitted model.
    pub fn dimension(&self) -> usize {
        self.vectorizer.dimension()
    }

    /// Densify all fitted rows, in catalog order. Used to feed the ANN
    /// index at larger catalog scales.
    pub fn dense_matrix(&self) -> Vec<Vec<f32>> {
        let dimension = self.dimension();
        self.rows.iter().map(|row| row.to_dense(dimension)).collect()
    }

    /// Transform arbitrary text into the fitted vector space.
    pub fn embed(&self, text: &str) -> SparseVector {
        self.vectorizer.transform(text)
    }

    /// One text document per book: title, author, genre tokens, theme
    /// tokens, description, country, language, space-joined, skipping
    /// empty fields.
    fn book_document(book: &Book) -> String {
        let fields = [
            book.title.clone(),
            book.author.clone(),
            book.genres.join(" "),
            book.themes.join(" "),
            book.description.clone(),
            book.country.clone(),
            book.language.clone(),
        ];
        fields
            .iter()
            .filter(|f| !f.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pseudo-document from the request: genres, themes, authors,
    /// countries, languages, liked titles, in that order.
    fn query_text(request: &RecommendationRequest) -> String {
        let mut tokens: Vec<&str> = Vec::new();
        tokens.extend(request.genres.iter().map(String::as_str));
        tokens.extend(request.themes.iter().map(String::as_str));
        tokens.extend(request.authors.iter().map(String::as_str));
        tokens.extend(request.countries.iter().map(String::as_str));
        tokens.extend(request.languages.iter().map(String::as_str));
        tokens.extend(request.liked_books.iter().map(String::as_str));
        tokens.join(" ")
    }
}
