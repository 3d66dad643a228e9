//! Bibliorec CLI binary.

use std::io::Read;
use std::process;

use clap::{Parser, Subcommand};

use bibliorec::ann::AnnIndex;
use bibliorec::config::RecommenderConfig;
use bibliorec::error::{RecommenderError, Result};
use bibliorec::hybrid::{HybridEngine, RecommendationRequest, RecommenderHandle};
use bibliorec::sample;

#[derive(Parser)]
#[command(name = "bibliorec", version, about = "Hybrid book recommendation engine")]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "config/config.json", env = "BIBLIOREC_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the models and answer one recommendation request.
    Recommend {
        /// Request JSON file, or "-" to read from stdin.
        #[arg(short, long, default_value = "-")]
        request: String,
    },
    /// Find books closest to one catalog book in the content vector space.
    Similar {
        /// Identifier of the query book.
        #[arg(short, long)]
        book_id: String,
        /// Number of neighbors to return.
        #[arg(short, long, default_value_t = 10)]
        top_k: usize,
    },
    /// Write sample catalog and interaction CSV files.
    Sample {
        /// Output directory.
        #[arg(short, long, default_value = "sample_data")]
        dir: String,
        /// Number of catalog rows.
        #[arg(long, default_value_t = 50)]
        books: usize,
        /// Number of interaction events.
        #[arg(long, default_value_t = 200)]
        interactions: usize,
        /// Generator seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Recommend { request } => {
            let config = RecommenderConfig::load(&args.config)?;

            let handle = RecommenderHandle::new();
            handle.install(HybridEngine::from_config(&config)?);

            let request = read_request(&request)?;
            let response = handle.recommend(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Similar { book_id, top_k } => {
            let config = RecommenderConfig::load(&args.config)?;
            let engine = HybridEngine::from_config(&config)?;

            let book = engine
                .catalog()
                .get(&book_id)
                .ok_or_else(|| {
                    RecommenderError::invalid_request(format!("unknown book id: {book_id}"))
                })?
                .clone();

            let content = engine.content_model();
            let index = AnnIndex::build(content.dense_matrix(), config.ann.engine, &config.ann.params);
            let query = content
                .embed(&format!("{} {}", book.title, book.description))
                .to_dense(content.dimension());

            // top_k + 1 because the query book is its own nearest neighbor.
            let hits = index.search(&[query], top_k + 1);
            let books = engine.catalog().books();
            let neighbors = hits[0]
                .iter()
                .filter(|&&(row, _)| books[row].book_id != book.book_id)
                .take(top_k);
            for &(row, similarity) in neighbors {
                println!("{:.4}  {}  {}", similarity, books[row].book_id, books[row].title);
            }
            Ok(())
        }
        Command::Sample {
            dir,
            books,
            interactions,
            seed,
        } => {
            let (books_path, interactions_path) =
                sample::write_sample_data(&dir, books, interactions, seed)?;
            println!("wrote {}", books_path.display());
            println!("wrote {}", interactions_path.display());
            Ok(())
        }
    }
}

fn read_request(source: &str) -> Result<RecommendationRequest> {
    let contents = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(source)?
    };
    serde_json::from_str(&contents)
        .map_err(|e| RecommenderError::invalid_request(format!("malformed request JSON: {e}")))
}
