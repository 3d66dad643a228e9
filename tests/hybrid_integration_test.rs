//! End-to-end scenarios for the hybrid recommendation pipeline.

use std::sync::Arc;

use bibliorec::catalog::{Book, Catalog};
use bibliorec::collab::{CollaborativeModel, Interaction};
use bibliorec::config::RecommenderConfig;
use bibliorec::graph::SimilarityGraph;
use bibliorec::hybrid::{
    HybridConfig, HybridEngine, RecommendationRequest, RecommenderHandle,
};

fn book(
    id: &str,
    title: &str,
    author: &str,
    country: &str,
    language: &str,
    genres: &[&str],
    themes: &[&str],
    year: i32,
    rating_count: u64,
    avg_rating: f64,
) -> Book {
    Book {
        book_id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        country: country.to_string(),
        language: language.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        themes: themes.iter().map(|t| t.to_string()).collect(),
        year: Some(year),
        rating_count,
        avg_rating,
        description: format!("{title}, a novel by {author}."),
    }
}

/// Five books: three Nigerian fantasy/SF titles and two Japanese literary
/// titles.
fn fixture_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_books(vec![
        book(
            "b1",
            "Akata Witch",
            "Nnedi Okorafor",
            "Nigeria",
            "en",
            &["Fantasy"],
            &["magic", "coming of age"],
            2011,
            100,
            4.0,
        ),
        book(
            "b2",
            "Binti",
            "Nnedi Okorafor",
            "Nigeria",
            "en",
            &["Science Fiction", "Fantasy"],
            &["identity", "space"],
            2015,
            200,
            4.5,
        ),
        book(
            "b3",
            "Lagoon",
            "Nnedi Okorafor",
            "Nigeria",
            "en",
            &["Science Fiction", "Fantasy"],
            &["first contact"],
            2014,
            150,
            4.1,
        ),
        book(
            "b4",
            "Kafka on the Shore",
            "Haruki Murakami",
            "Japan",
            "ja",
            &["Literary"],
            &["memory", "loss"],
            2002,
            300,
            4.2,
        ),
        book(
            "b5",
            "Norwegian Wood",
            "Haruki Murakami",
            "Japan",
            "ja",
            &["Literary"],
            &["loss", "youth"],
            1987,
            250,
            4.0,
        ),
    ]))
}

/// u1:{b1,b2}, u2:{b1,b3}, u3:{b4,b5}.
fn fixture_interactions() -> Vec<Interaction> {
    let event = |user: &str, book: &str, strength: f64| Interaction {
        user_id: user.to_string(),
        book_id: book.to_string(),
        event_strength: strength,
    };
    vec![
        event("u1", "b1", 5.0),
        event("u1", "b2", 4.0),
        event("u2", "b1", 3.0),
        event("u2", "b3", 5.0),
        event("u3", "b4", 4.0),
        event("u3", "b5", 4.5),
    ]
}

fn fixture_engine() -> HybridEngine {
    let interactions = fixture_interactions();
    HybridEngine::fit(HybridConfig::default(), fixture_catalog(), Some(&interactions))
}

#[test]
fn collaborative_fit_builds_cluster_cooccurrence() {
    let interactions = fixture_interactions();
    let model = CollaborativeModel::fit(Some(&interactions), &fixture_catalog());

    assert_eq!(model.cooccurrence_count("b1", "b2"), 1);
    assert_eq!(model.cooccurrence_count("b1", "b3"), 1);
    assert_eq!(model.cooccurrence_count("b4", "b5"), 1);
    assert_eq!(model.cooccurrence_count("b2", "b1"), 1);
    // No cross-cluster co-occurrence.
    assert_eq!(model.cooccurrence_count("b1", "b4"), 0);
    assert_eq!(model.cooccurrence_count("b3", "b5"), 0);
}

#[test]
fn filtered_request_excludes_liked_title_and_explains_genre_match() {
    let engine = fixture_engine();
    let request = RecommendationRequest {
        genres: vec!["Fantasy".to_string()],
        authors: vec!["Nnedi Okorafor".to_string()],
        countries: vec!["Nigeria".to_string()],
        languages: vec!["en".to_string()],
        liked_books: vec!["Akata Witch".to_string()],
        limit: 3,
        ..RecommendationRequest::default()
    };

    let response = engine.recommend(&request).unwrap();
    assert!(!response.recommendations.is_empty());

    // The seed title is excluded by title even though it passes the
    // filter.
    assert!(response
        .recommendations
        .iter()
        .all(|r| r.title.to_lowercase() != "akata witch"));

    // Only books passing the filter come back.
    for rec in &response.recommendations {
        assert!(["b2", "b3"].contains(&rec.book_id.as_str()), "{}", rec.book_id);
        assert!(rec.explanation.contains("matches your preferred genre"));
    }
}

#[test]
fn overly_strict_filters_fall_back_to_full_catalog() {
    let engine = fixture_engine();
    let request = RecommendationRequest {
        genres: vec!["Cookbook".to_string()],
        limit: 5,
        ..RecommendationRequest::default()
    };

    let response = engine.recommend(&request).unwrap();
    assert_eq!(response.recommendations.len(), 5);
}

#[test]
fn scoring_is_deterministic_across_calls() {
    let engine = fixture_engine();
    let request = RecommendationRequest {
        genres: vec!["Fantasy".to_string()],
        themes: vec!["magic".to_string()],
        liked_books: vec!["Akata Witch".to_string()],
        limit: 4,
        ..RecommendationRequest::default()
    };

    let first = engine.recommend(&request).unwrap();
    let second = engine.recommend(&request).unwrap();
    assert_eq!(first.recommendations, second.recommendations);
    for (a, b) in first
        .recommendations
        .iter()
        .zip(second.recommendations.iter())
    {
        assert_eq!(a.score.to_bits(), b.score.to_bits());
    }
}

#[test]
fn liked_title_boosts_cooccurring_items() {
    let engine = fixture_engine();
    // No filters: all five books are candidates. Liking Akata Witch (b1)
    // should surface its co-occurrence partners b2/b3 ahead of the
    // Japanese cluster once content and collab signals are blended.
    let request = RecommendationRequest {
        genres: vec!["Fantasy".to_string()],
        liked_books: vec!["Akata Witch".to_string()],
        limit: 2,
        ..RecommendationRequest::default()
    };

    let response = engine.recommend(&request).unwrap();
    let ids: Vec<&str> = response
        .recommendations
        .iter()
        .map(|r| r.book_id.as_str())
        .collect();
    assert!(ids.contains(&"b2") || ids.contains(&"b3"));
}

#[test]
fn handle_reports_not_ready_then_serves() {
    let handle = RecommenderHandle::new();
    assert!(handle.recommend(&RecommendationRequest::default()).is_err());

    handle.install(fixture_engine());
    let response = handle
        .recommend(&RecommendationRequest {
            limit: 2,
            ..RecommendationRequest::default()
        })
        .unwrap();
    assert_eq!(response.recommendations.len(), 2);
}

#[test]
fn graph_collaborator_merges_as_soft_boost() {
    struct StubGraph;
    impl SimilarityGraph for StubGraph {
        fn related_titles(&self, title: &str, _limit: usize) -> Vec<String> {
            if title.eq_ignore_ascii_case("akata witch") {
                vec!["Lagoon".to_string()]
            } else {
                Vec::new()
            }
        }
    }

    let interactions = fixture_interactions();
    let config = HybridConfig {
        graph_boost: 10.0,
        ..HybridConfig::default()
    };
    let without_graph = HybridEngine::fit(
        HybridConfig::default(),
        fixture_catalog(),
        Some(&interactions),
    );
    let with_graph = HybridEngine::fit(config, fixture_catalog(), Some(&interactions))
        .with_graph(Box::new(StubGraph));

    let request = RecommendationRequest {
        liked_books: vec!["Akata Witch".to_string()],
        limit: 1,
        ..RecommendationRequest::default()
    };

    // A large enough boost puts the graph-suggested title on top.
    let boosted = with_graph.recommend(&request).unwrap();
    assert_eq!(boosted.recommendations[0].title, "Lagoon");

    // The engine answers fine without any graph provider.
    assert!(without_graph.recommend(&request).is_ok());
}

#[test]
fn end_to_end_from_csv_sources() {
    let dir = tempfile::tempdir().unwrap();
    let books_csv = dir.path().join("books.csv");
    let interactions_csv = dir.path().join("interactions.csv");

    std::fs::write(
        &books_csv,
        "book_id,title,author,country,language,genres,themes,year,avg_rating,rating_count,description\n\
         b1,Akata Witch,Nnedi Okorafor,Nigeria,en,Fantasy,magic|coming of age,2011,4.0,100,A young witch discovers her powers.\n\
         b2,Binti,Nnedi Okorafor,Nigeria,en,Science Fiction|Fantasy,identity|space,2015,4.5,200,A girl leaves home for the stars.\n\
         b3,Kafka on the Shore,Haruki Murakami,Japan,ja,Literary,memory|loss,2002,4.2,300,A boy runs away from home.\n",
    )
    .unwrap();
    std::fs::write(
        &interactions_csv,
        "user_id,book_id,event_strength\nu1,b1,5.0\nu1,b2,4.0\n",
    )
    .unwrap();

    let mut config = RecommenderConfig::default();
    config.paths.books_csv = books_csv.to_string_lossy().into_owned();
    config.paths.interactions_csv = interactions_csv.to_string_lossy().into_owned();

    let engine = HybridEngine::from_config(&config).unwrap();
    let response = engine
        .recommend(&RecommendationRequest {
            genres: vec!["Fantasy".to_string()],
            liked_books: vec!["Akata Witch".to_string()],
            limit: 3,
            ..RecommendationRequest::default()
        })
        .unwrap();

    assert!(!response.recommendations.is_empty());
    assert!(response
        .recommendations
        .iter()
        .all(|r| r.title != "Akata Witch"));
}

#[test]
fn missing_interaction_log_degrades_to_popularity() {
    let dir = tempfile::tempdir().unwrap();
    let books_csv = dir.path().join("books.csv");
    std::fs::write(
        &books_csv,
        "book_id,title,author,avg_rating,rating_count\n\
         b1,Quiet Book,Someone,4.0,10\n\
         b2,Popular Book,Someone Else,4.5,1000\n",
    )
    .unwrap();

    let mut config = RecommenderConfig::default();
    config.paths.books_csv = books_csv.to_string_lossy().into_owned();
    config.paths.interactions_csv = dir
        .path()
        .join("missing.csv")
        .to_string_lossy()
        .into_owned();

    let engine = HybridEngine::from_config(&config).unwrap();
    let response = engine
        .recommend(&RecommendationRequest {
            limit: 2,
            ..RecommendationRequest::default()
        })
        .unwrap();

    // Cold start: popularity decides the order.
    assert_eq!(response.recommendations[0].book_id, "b2");
    assert_eq!(response.recommendations[1].book_id, "b1");
}
