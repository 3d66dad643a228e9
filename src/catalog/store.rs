//! The immutable catalog store and its CSV loader.

use std::path::Path;

use ahash::AHashMap;

use super::book::{split_tokens, Book};
use crate::error::{RecommenderError, Result};

/// In-memory book catalog keyed by `book_id`.
///
/// Loaded once, read-only afterwards. Exposes iteration and id lookup;
/// all scoring happens downstream.
#[derive(Debug, Default)]
pub struct Catalog {
    books: Vec<Book>,
    id_index: AHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from already-typed records.
    ///
    /// Duplicate `book_id` rows keep the last occurrence, preserving the
    /// one-row-per-id invariant.
    pub fn from_books(books: Vec<Book>) -> Self {
        let mut id_index = AHashMap::with_capacity(books.len());
        let mut deduped: Vec<Book> = Vec::with_capacity(books.len());
        for book in books {
            match id_index.get(&book.book_id) {
                Some(&pos) => deduped[pos] = book,
                None => {
                    id_index.insert(book.book_id.clone(), deduped.len());
                    deduped.push(book);
                }
            }
        }
        Self {
            books: deduped,
            id_index,
        }
    }

    /// Load a catalog from a CSV file.
    ///
    /// Fails with a configuration error when the file cannot be located or
    /// the required `book_id` identity column is missing. All other columns
    /// are optional and normalize per the field defaults on [`Book`].
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RecommenderError::config(format!(
                "books CSV not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);

        let id_col = column("book_id").ok_or_else(|| {
            RecommenderError::config(format!(
                "books CSV is missing the required book_id column: {}",
                path.display()
            ))
        })?;
        let title_col = column("title");
        let author_col = column("author");
        let country_col = column("country");
        let language_col = column("language");
        let genres_col = column("genres");
        let themes_col = column("themes");
        let year_col = column("year");
        let avg_rating_col = column("avg_rating");
        let rating_count_col = column("rating_count");
        let description_col = column("description");

        let field = |record: &csv::StringRecord, col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        let mut books = Vec::new();
        for record in reader.records() {
            let record = record?;
            let book_id = field(&record, Some(id_col));
            if book_id.is_empty() {
                continue;
            }
            books.push(Book {
                book_id,
                title: field(&record, title_col),
                author: field(&record, author_col),
                country: field(&record, country_col),
                language: field(&record, language_col),
                genres: split_tokens(&field(&record, genres_col)),
                themes: split_tokens(&field(&record, themes_col)),
                year: field(&record, year_col).parse().ok(),
                avg_rating: field(&record, avg_rating_col).parse().unwrap_or(0.0),
                rating_count: field(&record, rating_count_col).parse().unwrap_or(0),
                description: field(&record, description_col),
            });
        }

        tracing::info!(books = books.len(), path = %path.display(), "catalog loaded");
        Ok(Self::from_books(books))
    }

    /// Number of books in the catalog.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Look up a book by id.
    pub fn get(&self, book_id: &str) -> Option<&Book> {
        self.id_index.get(book_id).map(|&i| &self.books[i])
    }

    /// Iterate over all books in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    /// All books as a slice, in catalog order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }
}
