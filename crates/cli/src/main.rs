use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client::{collect_rankings, ClientConfig, Gateway, StrategyDispatcher};
use colored::Colorize;
use rand::seq::IndexedRandom;
use recommender::{BackendHandle, Ranking, Strategy};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// MovieRecs - multi-strategy movie recommender
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Search movies and get recommendations from one of four concurrency strategies", long_about = None)]
struct Cli {
    /// Dataset file, one `Title::v1,v2,...` line per movie (overrides the config)
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Strategy tag: parallelflux, parallelstream, structuredconcurrency or sequentialloop
    /// (or the PARALLEL_FLUX style constant)
    #[arg(short, long, global = true, default_value = "parallelflux")]
    strategy: String,

    /// Use the timed entry points and print latency afterwards
    #[arg(long, global = true)]
    timed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every movie, ascending by title
    Movies,

    /// Find movies whose title contains every term (case-insensitive)
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Recommend movies similar to the ones watched
    Recommend {
        /// Watched movie title; repeat for several
        #[arg(long, required = true)]
        watched: Vec<String>,

        /// Number of recommendations (defaults to the config value)
        #[arg(long)]
        max_count: Option<usize>,
    },

    /// Run one timed request per operation on every strategy and print the latencies
    Timings,

    /// Fire concurrent recommendation requests at the chosen strategy
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
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

    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(dataset) = &cli.dataset {
        config.dataset = dataset.clone();
    }

    println!("Loading movies from {}...", config.dataset.display());
    let start = Instant::now();
    let gateway = Gateway::from_config(&config)?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        gateway.store().count(),
        start.elapsed()
    );

    // Parsing only picks a dispatcher; its gate decides whether the tag is exact
    let serving = cli.strategy.parse::<Strategy>().unwrap_or(Strategy::ParallelFlux);
    let dispatcher = gateway
        .dispatcher(serving)
        .ok_or_else(|| anyhow!("No dispatcher for {}", serving))?;

    match cli.command {
        Commands::Movies => {
            let stream = dispatcher.movies(&cli.strategy, cli.timed)?;
            print_titles("Movies", &collect_rankings(stream).await?);
        }
        Commands::Search { terms } => {
            let query = terms.join(" ");
            let stream = dispatcher.search(&cli.strategy, &query, cli.timed)?;
            print_titles(
                &format!("Search results for '{}'", query),
                &collect_rankings(stream).await?,
            );
        }
        Commands::Recommend { watched, max_count } => {
            let max_count = max_count.unwrap_or(config.default_max_count);
            let stream =
                dispatcher.recommendations_many(&cli.strategy, &watched, max_count, cli.timed)?;
            print_recommendations(&watched, &collect_rankings(stream).await?);
        }
        Commands::Timings => handle_timings(&gateway, config.default_max_count).await?,
        Commands::Benchmark { requests } => {
            handle_benchmark(dispatcher, &cli.strategy, &gateway, requests, config.default_max_count)
                .await?
        }
    }

    if cli.timed {
        println!();
        print!("{}", gateway.timings_report());
    }

    Ok(())
}

/// Handle the 'timings' command
async fn handle_timings(gateway: &Gateway, max_count: usize) -> Result<()> {
    let sample = gateway
        .store()
        .find_all()?
        .first()
        .map(|movie| movie.id.clone())
        .context("Dataset is empty")?;

    for strategy in Strategy::ALL {
        let dispatcher = gateway
            .dispatcher(strategy)
            .ok_or_else(|| anyhow!("No dispatcher for {}", strategy))?;
        let tag = strategy.as_str();

        collect_rankings(dispatcher.movies(tag, true)?).await?;
        collect_rankings(dispatcher.search(tag, &sample, true)?).await?;
        collect_rankings(dispatcher.recommendations(tag, &sample, max_count, true)?).await?;
    }

    println!("{}", "Timings:".bold().blue());
    print!("{}", gateway.timings_report());
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    dispatcher: &StrategyDispatcher<BackendHandle>,
    strategy: &str,
    gateway: &Gateway,
    requests: usize,
    max_count: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be positive"));
    }

    let titles: Vec<String> = gateway
        .store()
        .find_all()?
        .into_iter()
        .map(|movie| movie.id)
        .collect();

    // Pick a random watched movie for every request
    let watched: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| titles.choose(&mut rng).cloned())
            .collect()
    };
    if watched.is_empty() {
        return Err(anyhow!("Dataset is empty"));
    }

    info!("Running {} requests against {}", watched.len(), strategy);
    let wall_clock = Instant::now();

    // Streams are opened up front so every request is in flight at once
    let mut handles = vec![];
    for title in watched {
        let stream = dispatcher.recommendations(strategy, &title, max_count, false)?;
        let handle = tokio::spawn(async move {
            let start = Instant::now();
            collect_rankings(stream).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let sum: Duration = timings.iter().sum();
    let avg_latency = sum / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", format!("Benchmark results ({}):", strategy).bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_titles(header: &str, rankings: &[Ranking]) {
    println!("{}", format!("{}:", header).bold().blue());
    if rankings.is_empty() {
        println!("  (none)");
    }
    for ranking in rankings {
        println!("{}{}", "• ".green(), ranking.title);
    }
}

fn print_recommendations(watched: &[String], rankings: &[Ranking]) {
    println!(
        "{}",
        format!("Because you watched {}:", watched.join(", ")).bold().blue()
    );
    if rankings.is_empty() {
        println!("  (no recommendations)");
    }
    for (idx, ranking) in rankings.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.3}",
            (idx + 1).to_string().green(),
            ranking.title,
            ranking.score
        );
    }
}
