//! Sample-data generation for demos and smoke tests.
//!
//! Produces a small multi-country catalog CSV and an interaction log CSV
//! matching the loader schemas. Seeded, so repeated runs write identical
//! files.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;

const AUTHORS: &[(&str, &str, &str)] = &[
    ("Nnedi Okorafor", "Nigeria", "en"),
    ("Chinua Achebe", "Nigeria", "en"),
    ("Haruki Murakami", "Japan", "ja"),
    ("Yoko Ogawa", "Japan", "ja"),
    ("Gabriel Garcia Marquez", "Colombia", "es"),
    ("Isabel Allende", "Chile", "es"),
    ("Olga Tokarczuk", "Poland", "pl"),
    ("Han Kang", "South Korea", "ko"),
];

const GENRES: &[&str] = &[
    "Fantasy",
    "Science Fiction",
    "Literary",
    "Historical",
    "Mystery",
    "Magical Realism",
];

const THEMES: &[&str] = &[
    "identity",
    "memory",
    "family",
    "migration",
    "coming of age",
    "loss",
    "power",
];

/// Write `books` catalog rows and `interactions` event rows under `dir`,
/// creating the directory when needed. Returns the two file paths.
pub fn write_sample_data(
    dir: impl AsRef<Path>,
    books: usize,
    interactions: usize,
    seed: u64,
) -> Result<(std::path::PathBuf, std::path::PathBuf)> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let books_path = dir.join("books_sample.csv");
    let interactions_path = dir.join("user_interactions_sample.csv");

    let mut rng = StdRng::seed_from_u64(seed);

    let mut writer = csv::Writer::from_path(&books_path)?;
    writer.write_record([
        "book_id",
        "title",
        "author",
        "country",
        "language",
        "genres",
        "themes",
        "year",
        "avg_rating",
        "rating_count",
        "description",
    ])?;
    for index in 0..books {
        let (author, country, language) = AUTHORS[rng.random_range(0..AUTHORS.len())];
        let primary = GENRES[rng.random_range(0..GENRES.len())];
        let secondary = GENRES[rng.random_range(0..GENRES.len())];
        let genres = if primary == secondary {
            primary.to_string()
        } else {
            format!("{primary}|{secondary}")
        };
        let theme_a = THEMES[rng.random_range(0..THEMES.len())];
        let theme_b = THEMES[rng.random_range(0..THEMES.len())];
        let year = rng.random_range(1950..=2023);
        let avg_rating = 3.0 + rng.random::<f64>() * 2.0;
        let rating_count = rng.random_range(10..5000);
        writer.write_record([
            format!("book_{:04}", index + 1),
            format!("Sample Title {}", index + 1),
            author.to_string(),
            country.to_string(),
            language.to_string(),
            genres,
            format!("{theme_a}|{theme_b}"),
            year.to_string(),
            format!("{avg_rating:.2}"),
            rating_count.to_string(),
            format!("A {primary} novel about {theme_a} and {theme_b}."),
        ])?;
    }
    writer.flush()?;

    let users = (books / 2).max(1);
    let mut writer = csv::Writer::from_path(&interactions_path)?;
    writer.write_record(["user_id", "book_id", "event_strength"])?;
    for _ in 0..interactions {
        let user = rng.random_range(0..users);
        let book = rng.random_range(0..books.max(1));
        let strength = 1.0 + rng.random::<f64>() * 4.0;
        writer.write_record([
            format!("user_{:03}", user + 1),
            format!("book_{:04}", book + 1),
            format!("{strength:.2}"),
        ])?;
    }
    writer.flush()?;

    tracing::info!(
        books,
        interactions,
        dir = %dir.display(),
        "sample data written"
    );
    Ok((books_path, interactions_path))
}
