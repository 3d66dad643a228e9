//! TF-IDF vectorization over a text corpus.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Configuration for TF-IDF vectorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfConfig {
    /// Maximum vocabulary size. Terms are kept by descending document
    /// frequency, ties broken by term (ascending) for determinism.
    pub max_features: usize,
    /// Largest n-gram length. 2 means unigrams and bigrams.
    pub ngram_max: usize,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            max_features: 20_000,
            ngram_max: 2,
        }
    }
}

/// A sparse vector: (column, weight) entries sorted by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    /// Build from unsorted entries, sorting by column.
    pub fn from_entries(mut entries: Vec<(u32, f32)>) -> Self {
        entries.sort_by_key(|&(col, _)| col);
        Self { entries }
    }

    /// Whether the vector has no non-zero entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The (column, weight) entries, sorted by column.
    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    /// Dot product with another sparse vector (merge over sorted columns).
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_col, a_val) = self.entries[i];
            let (b_col, b_val) = other.entries[j];
            match a_col.cmp(&b_col) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_val * b_val;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Scale entries so the vector has unit L2 norm. A zero vector is left
    /// unchanged.
    pub fn l2_normalize(&mut self) {
        let norm: f32 = self
            .entries
            .iter()
            .map(|&(_, v)| v * v)
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for (_, v) in &mut self.entries {
                *v /= norm;
            }
        }
    }

    /// Densify to a fixed dimension.
    pub fn to_dense(&self, dimension: usize) -> Vec<f32> {
        let mut dense = vec![0.0; dimension];
        for &(col, val) in &self.entries {
            if (col as usize) < dimension {
                dense[col as usize] = val;
            }
        }
        dense
    }
}

/// A fitted TF-IDF vectorizer: vocabulary plus per-term idf weights.
///
/// Uses smoothed inverse document frequency
/// (`ln((1 + n) / (1 + df)) + 1`) and L2-normalizes transformed vectors,
/// so cosine similarity between two transformed vectors reduces to their
/// dot product.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    config: TfIdfConfig,
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f32>,
    total_documents: usize,
}

impl TfIdfVectorizer {
    /// Fit a vectorizer over a corpus.
    ///
    /// An empty corpus yields a degenerate zero-dimension vectorizer whose
    /// transforms are all empty.
    pub fn fit(corpus: &[String], config: TfIdfConfig) -> Self {
        let tokenized: Vec<Vec<String>> = corpus
            .iter()
            .map(|doc| Self::ngrams(doc, config.ngram_max))
            .collect();

        // Document frequency per term.
        let mut document_frequencies: AHashMap<String, usize> = AHashMap::new();
        for tokens in &tokenized {
            let mut seen: AHashSet<&str> = AHashSet::new();
            for token in tokens {
                if seen.insert(token) {
                    *document_frequencies.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        // Select the vocabulary: highest document frequency first, term
        // ascending on ties, then assign columns in term order.
        let mut terms: Vec<(String, usize)> = document_frequencies.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(config.max_features);
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        let total_documents = corpus.len();
        let mut vocabulary = AHashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (column, (term, df)) in terms.into_iter().enumerate() {
            vocabulary.insert(term, column as u32);
            idf.push(((1.0 + total_documents as f32) / (1.0 + df as f32)).ln() + 1.0);
        }

        Self {
            config,
            vocabulary,
            idf,
            total_documents,
        }
    }

    /// Transform a document into the fitted vector space (L2 normalized).
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = Self::ngrams(text, self.config.ngram_max);
        let mut counts: AHashMap<u32, f32> = AHashMap::new();
        for token in &tokens {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column as usize]))
            .collect();
        let mut vector = SparseVector::from_entries(entries);
        vector.l2_normalize();
        vector
    }

    /// Vocabulary size (vector dimension).
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents the vectorizer was fitted over.
    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    /// Tokenize into lowercase alphanumeric unigrams plus n-grams up to
    /// `ngram_max` (space-joined).
    fn ngrams(text: &str, ngram_max: usize) -> Vec<String> {
        let unigrams: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let mut tokens = unigrams.clone();
        for n in 2..=ngram_max {
            for window in unigrams.windows(n) {
                tokens.push(window.join(" "));
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_ngrams_include_bigrams() {
        let tokens = TfIdfVectorizer::ngrams("Science Fiction epic", 2);
        assert!(tokens.contains(&"science".to_string()));
        assert!(tokens.contains(&"science fiction".to_string()));
        assert!(tokens.contains(&"fiction epic".to_string()));
    }

    #[test]
    fn test_fit_transform_identical_document_is_most_similar() {
        let docs = corpus(&[
            "fantasy magic adventure",
            "space opera science fiction",
            "quiet literary novel",
        ]);
        let vectorizer = TfIdfVectorizer::fit(&docs, TfIdfConfig::default());

        let query = vectorizer.transform("fantasy magic adventure");
        let sims: Vec<f32> = docs
            .iter()
            .map(|d| query.dot(&vectorizer.transform(d)))
            .collect();

        assert!((sims[0] - 1.0).abs() < 1e-5);
        assert!(sims[0] > sims[1]);
        assert!(sims[0] > sims[2]);
    }

    #[test]
    fn test_empty_corpus_is_degenerate() {
        let vectorizer = TfIdfVectorizer::fit(&[], TfIdfConfig::default());
        assert_eq!(vectorizer.dimension(), 0);
        assert!(vectorizer.transform("anything at all").is_empty());
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let docs = corpus(&["a b c d e f g h", "a b c d", "a b"]);
        let config = TfIdfConfig {
            max_features: 3,
            ngram_max: 1,
        };
        let vectorizer = TfIdfVectorizer::fit(&docs, config);
        assert_eq!(vectorizer.dimension(), 3);
    }

    #[test]
    fn test_transform_is_normalized() {
        let docs = corpus(&["alpha beta gamma", "beta gamma delta"]);
        let vectorizer = TfIdfVectorizer::fit(&docs, TfIdfConfig::default());
        let v = vectorizer.transform("alpha beta beta gamma");
        let norm: f32 = v.entries().iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector::from_entries(vec![(0, 1.0), (2, 2.0)]);
        let b = SparseVector::from_entries(vec![(2, 0.5), (3, 4.0)]);
        assert_eq!(a.dot(&b), 1.0);
    }

    #[test]
    fn test_to_dense() {
        let v = SparseVector::from_entries(vec![(1, 0.5), (3, 0.25)]);
        assert_eq!(v.to_dense(4), vec![0.0, 0.5, 0.0, 0.25]);
    }
}
