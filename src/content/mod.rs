//! Content similarity model: TF-IDF vector space over catalog text fields.
//!
//! The vector space is built once at fit time and immutable afterwards.
//! Scoring computes cosine similarity between a query pseudo-document
//! derived from request preferences and each candidate's pre-fit vector.

pub mod model;
pub mod vectorizer;

pub use model::ContentModel;
pub use vectorizer::{SparseVector, TfIdfConfig, TfIdfVectorizer};
