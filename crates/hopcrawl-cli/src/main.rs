//! `hopcrawl` - breadth-first crawl of a remote neighbor lookup service.
//!
//! Prints every level discovered from the start node and the time the crawl
//! took. Logs go to stderr; `RUST_LOG` overrides the default filter.

mod report;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hopcrawl_core::{
    BfsEngine, CrawlerConfig, HttpNeighborClient, ParallelBfsEngine, SequentialBfsEngine,
    TraversalResult,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Which traversal engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    /// Concurrent workers per level
    Parallel,
    /// Single FIFO queue
    Sequential,
    /// Run both and check they agree
    Compare,
}

/// Breadth-first crawl of a remote graph through its neighbor service
#[derive(Parser, Debug)]
#[command(name = "hopcrawl")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Node id to start from
    #[arg(value_name = "START_NODE")]
    start_node: String,

    /// Maximum number of hops from the start node
    #[arg(value_name = "DEPTH")]
    depth: u32,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Traversal engine
    #[arg(short, long, value_enum, default_value_t = EngineKind::Parallel)]
    engine: EngineKind,

    /// Log per-level progress and every request
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,hopcrawl=info,hopcrawl_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn timed_crawl(
    engine: &dyn BfsEngine,
    start: &str,
    depth: u32,
) -> Result<TraversalResult> {
    tracing::info!(engine = engine.name(), start, depth, "Starting crawl");
    let started = Instant::now();
    let (result, stats) = engine
        .traverse(start, depth)
        .await
        .with_context(|| format!("{} crawl failed", engine.name()))?;
    let elapsed = started.elapsed();

    {
        let mut out = BufWriter::new(io::stdout().lock());
        report::write_levels(&mut out, &result)
            .and_then(|()| writeln!(out, "{}", report::render_timing(engine.name(), elapsed)))
            .and_then(|()| out.flush())
            .context("failed to write report")?;
    }
    tracing::info!(
        start = result.start_node(),
        levels = result.num_levels(),
        "{}",
        report::render_stats(&stats)
    );
    Ok(result)
}

fn load_config(args: &Args) -> Result<CrawlerConfig> {
    let mut config =
        CrawlerConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    config.verbose |= args.verbose;
    Ok(config)
}

async fn run(args: Args, config: CrawlerConfig) -> Result<()> {
    let client = HttpNeighborClient::new(&config).context("failed to initialize client")?;
    tracing::debug!(base_url = %client.base_url(), max_workers = config.max_workers, "Client ready");

    let parallel = ParallelBfsEngine::new(client.clone(), config.clone());
    let sequential = SequentialBfsEngine::new(client, config);

    match args.engine {
        EngineKind::Parallel => {
            println!("Parallel BFS Traversal:");
            timed_crawl(&parallel, &args.start_node, args.depth).await?;
        }
        EngineKind::Sequential => {
            println!("Sequential BFS Traversal:");
            timed_crawl(&sequential, &args.start_node, args.depth).await?;
        }
        EngineKind::Compare => {
            println!("Sequential BFS Traversal:");
            let expected = timed_crawl(&sequential, &args.start_node, args.depth).await?;
            println!();
            println!("Parallel BFS Traversal:");
            let actual = timed_crawl(&parallel, &args.start_node, args.depth).await?;
            println!();
            if actual.same_membership(&expected) {
                println!("Per-level membership: identical");
            } else {
                tracing::warn!("parallel and sequential crawls disagree");
                println!("Per-level membership: differs");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version are not failures.
            let code = u8::from(err.use_stderr());
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.verbose);

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
