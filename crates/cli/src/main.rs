use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::seq::IndexedRandom;
use recommender::{Recommendation, Recommender, RecommenderConfig, Strategy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// movie-recs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Content-based and collaborative movie recommendations", long_about = None)]
struct Cli {
    /// Directory holding movies.csv, ratings.csv and optionally imdb_data.csv
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// TOML file with engine parameters (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a few favorites
    Recommend {
        /// Exact title of a favorite movie (repeat, usually three times)
        #[arg(long = "favorite", required = true)]
        favorites: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        top_n: usize,

        /// Scoring strategy: content or collaborative
        #[arg(long, default_value = "content")]
        strategy: Strategy,

        /// Show scores and seed warnings
        #[arg(long)]
        explain: bool,

        /// Print the full result as JSON
        #[arg(long, conflicts_with = "explain")]
        json: bool,
    },

    /// List catalog titles in load order
    Titles {
        #[arg(long, default_value = "0")]
        offset: usize,

        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        #[arg(long, default_value = "content")]
        strategy: Strategy,

        #[arg(long, default_value = "10")]
        top_n: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RecommenderConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RecommenderConfig::default(),
    };

    let recommender = Arc::new(load_recommender(&cli.data_dir, config)?);

    match cli.command {
        Commands::Recommend {
            favorites,
            top_n,
            strategy,
            explain,
            json,
        } => handle_recommend(&recommender, &favorites, top_n, strategy, explain, json)?,
        Commands::Titles { offset, limit } => handle_titles(&recommender, offset, limit),
        Commands::Search { title } => handle_search(&recommender, &title),
        Commands::Benchmark {
            requests,
            concurrent,
            strategy,
            top_n,
        } => handle_benchmark(recommender, requests, concurrent, strategy, top_n).await?,
    }

    Ok(())
}

fn load_recommender(data_dir: &Path, config: RecommenderConfig) -> Result<Recommender> {
    println!("Loading movie data from {}...", data_dir.display());
    let start = Instant::now();
    let recommender = Recommender::load(data_dir, config)
        .with_context(|| format!("Failed to load data from {}", data_dir.display()))?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        recommender.index().len(),
        start.elapsed()
    );
    Ok(recommender)
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &Recommender,
    favorites: &[String],
    top_n: usize,
    strategy: Strategy,
    explain: bool,
    json: bool,
) -> Result<()> {
    let report = recommender.recommend_detailed(favorites, top_n, strategy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_recommendations(&report, explain);
    }
    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(recommender: &Recommender, offset: usize, limit: usize) {
    let titles = recommender.titles_for_display();
    let (start, end) = page_bounds(titles.len(), offset, limit);
    if start == end {
        println!(
            "{}",
            format!("No titles past {} (catalog has {})", offset, titles.len()).bold().blue()
        );
        return;
    }

    println!("{}", format!("Titles {}-{} of {}:", start + 1, end, titles.len()).bold().blue());
    for (pos, title) in titles.iter().enumerate().take(end).skip(start) {
        println!("{:>6}. {}", pos + 1, title);
    }
}

/// Clamp a page request to `[start, end)` within a list of `len` items
fn page_bounds(len: usize, offset: usize, limit: usize) -> (usize, usize) {
    let start = offset.min(len);
    (start, start.saturating_add(limit).min(len))
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str) {
    let matches = recommender.index().search(title, 20);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for movie in matches {
        let genres = if movie.genres.is_empty() {
            "-".to_string()
        } else {
            movie.genres.join(", ")
        };
        println!("{}: {} [{}]", movie.id.to_string().cyan(), movie.title, genres);
        if !movie.directors.is_empty() {
            println!("      directed by {}", movie.directors.join(", "));
        }
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    recommender: Arc<Recommender>,
    requests: usize,
    concurrent: usize,
    strategy: Strategy,
    top_n: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must both be positive");
    }

    // Only titles that resolve to exactly one movie make valid favorites
    let pool: Vec<String> = recommender
        .titles_for_display()
        .iter()
        .filter(|title| recommender.index().resolve(title).is_ok())
        .cloned()
        .collect();
    if pool.len() < 3 {
        bail!("need at least three distinct titles to benchmark, found {}", pool.len());
    }

    // Keep the one-time engine build out of the latency numbers
    let warm = Instant::now();
    recommender.warm_up(strategy)?;
    info!("Engine warm-up took {:?}", warm.elapsed());

    let queries: Vec<Vec<String>> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| pool.choose_multiple(&mut rng, 3).cloned().collect())
            .collect()
    };

    let limiter = Arc::new(Semaphore::new(concurrent));
    let wall = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for favorites in queries {
        let recommender = Arc::clone(&recommender);
        let limiter = Arc::clone(&limiter);
        handles.push(tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            let elapsed = tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                recommender.recommend(&favorites, top_n, strategy)?;
                Ok::<_, anyhow::Error>(start.elapsed())
            })
            .await??;
            Ok::<_, anyhow::Error>(elapsed)
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", format!("Benchmark results ({strategy}):").bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent);
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(report: &Recommendation, explain: bool) {
    println!(
        "{}",
        format!("Movie Recommendations ({}):", report.strategy).bold().blue()
    );
    for (rank, movie) in report.movies.iter().enumerate() {
        if explain {
            println!(
                "{}. {} - Score: {:.4}",
                (rank + 1).to_string().green(),
                movie.title,
                movie.score
            );
        } else {
            println!("{}. {}", (rank + 1).to_string().green(), movie.title);
        }
    }

    if explain {
        for warning in &report.warnings {
            println!(
                "{} {} contributed nothing ({:?})",
                "!".yellow(),
                warning.title,
                warning.kind
            );
        }
        println!("Computed in {:?}", report.elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_within_list() {
        assert_eq!(page_bounds(50, 0, 10), (0, 10));
        assert_eq!(page_bounds(50, 45, 10), (45, 50));
    }

    #[test]
    fn test_page_bounds_past_end_is_empty() {
        assert_eq!(page_bounds(50, 100, 10), (50, 50));
        assert_eq!(page_bounds(50, 50, 10), (50, 50));
        assert_eq!(page_bounds(0, 0, 10), (0, 0));
    }

    #[test]
    fn test_page_bounds_huge_limit_does_not_overflow() {
        assert_eq!(page_bounds(50, 10, usize::MAX), (10, 50));
        assert_eq!(page_bounds(50, usize::MAX, usize::MAX), (50, 50));
    }
}
