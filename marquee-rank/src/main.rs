//! marquee-rank - command-line front end
//!
//! `rank` reads a JSON ranking request from a file (or `-` for stdin) and
//! prints the JSON response. `prune-history` removes learning records older
//! than the feedback window.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marquee_common::config::{load_config, ConceptSourceKind, MarqueeConfig};
use marquee_common::logging::{init_tracing, with_bootstrap_logging};
use marquee_rank::analyzers::{default_analyzers, ConceptNetClient, StaticLexicon};
use marquee_rank::cache::{CachedAnalyzer, MemoryCache};
use marquee_rank::gate::QualityThresholdManager;
use marquee_rank::learning::{InMemoryLearningStore, LearningStore, SqliteLearningStore};
use marquee_rank::types::ConceptSource;
use marquee_rank::{Pipeline, PipelineConfig, RankingRequest};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Command-line arguments for marquee-rank
#[derive(Parser, Debug)]
#[command(name = "marquee-rank")]
#[command(about = "Score, gate and rank band/song name candidates")]
#[command(version)]
struct Args {
    /// Configuration file (overrides MARQUEE_CONFIG and the platform default)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the candidates of a JSON request
    Rank {
        /// Request file, or '-' for stdin
        #[arg(short, long, default_value = "-")]
        request: String,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Delete learning records older than the feedback window
    PruneHistory,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = with_bootstrap_logging(|| load_config(args.config.as_deref()))
        .context("Failed to load configuration")?;
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!("Starting marquee-rank v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Rank { request, pretty } => rank(&config, &request, pretty).await,
        Command::PruneHistory => prune_history(&config).await,
    }
}

async fn rank(config: &MarqueeConfig, source: &str, pretty: bool) -> Result<()> {
    let raw = read_request(source)?;
    let request: RankingRequest = serde_json::from_str(&raw).context("Request is not valid JSON")?;

    let pipeline = build_pipeline(config).await?;
    let response = pipeline.rank(&request).await?;

    let output = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);
    Ok(())
}

async fn prune_history(config: &MarqueeConfig) -> Result<()> {
    let Some(path) = &config.learning.database_path else {
        info!("No learning database configured; nothing to prune");
        return Ok(());
    };
    let store = SqliteLearningStore::open(path)
        .await
        .with_context(|| format!("Failed to open learning database {}", path.display()))?;
    let cutoff = marquee_common::time::window_start(
        marquee_common::time::now(),
        config.learning.feedback_window_hours,
    );
    let removed = store.prune(cutoff).await?;
    info!(removed, cutoff = %cutoff, "Pruned learning history");
    Ok(())
}

fn read_request(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read request file {}", source))
    }
}

async fn build_pipeline(config: &MarqueeConfig) -> Result<Pipeline> {
    let concepts: Arc<dyn ConceptSource> = match config.concepts.source {
        ConceptSourceKind::Lexicon => Arc::new(StaticLexicon::new()),
        ConceptSourceKind::ConceptNet => {
            info!(base_url = %config.concepts.base_url, "Using ConceptNet concept source");
            Arc::new(ConceptNetClient::new(&config.concepts)?)
        }
    };

    let mut analyzers = default_analyzers(concepts);
    if config.cache.enabled {
        analyzers = CachedAnalyzer::wrap_all(
            analyzers,
            Arc::new(MemoryCache::new()),
            Duration::from_secs(config.cache.ttl_secs),
        );
    }

    let store: Arc<dyn LearningStore> = match &config.learning.database_path {
        Some(path) => {
            info!(path = %path.display(), "Using SQLite learning store");
            Arc::new(SqliteLearningStore::open(path).await?)
        }
        None => Arc::new(InMemoryLearningStore::new()),
    };
    let gate = QualityThresholdManager::from_settings(&config.gate, &config.learning).with_learning_store(store);

    Ok(Pipeline::new(PipelineConfig::from(&config.analysis), analyzers, gate))
}
