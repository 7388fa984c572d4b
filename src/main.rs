use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use fxtrend::config::Config;
use fxtrend::services::dataset::write_jsonl;
use fxtrend::services::{
    AdvisoryEngine, CurrencyDirectory, DatasetBuilder, FileStore, JsonModelLoader, RateCache,
    RateSeriesLoader, SnapshotService, TrendClassifier,
};
use fxtrend::sources::CbrClient;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fxtrend")]
#[command(about = "Daily exchange rates, trend verdicts and advisories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the currencies the feed publishes
    Currencies {
        /// Reload the list from the feed
        #[arg(long)]
        refresh: bool,
    },

    /// Print the business-day rate history of a currency
    Rates {
        /// Currency code (e.g., USD)
        code: String,

        /// Calendar days to look back
        #[arg(short, long, default_value = "30")]
        days: i64,
    },

    /// Short-horizon statistics for a currency
    Snapshot {
        /// Currency code (e.g., USD)
        code: String,
    },

    /// Trend verdict for the next business day
    Predict {
        /// Currency code (e.g., USD)
        code: String,
    },

    /// Heuristic advisories from recent movement
    Advice {
        /// Currency code (e.g., USD)
        code: String,
    },

    /// Collect a labeled training dataset as JSON lines
    Dataset {
        /// Calendar days of history per currency
        #[arg(long)]
        days_back: Option<i64>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn require_known(directory: &CurrencyDirectory, code: &str) -> anyhow::Result<String> {
    let code = code.to_uppercase();
    if !directory.contains(&code).await {
        bail!("unknown currency {}; see `fxtrend currencies`", code);
    }
    Ok(code)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxtrend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let client = Arc::new(
        CbrClient::with_base_url(
            &config.source_url,
            Duration::from_secs(config.http_timeout_secs),
        )
        .context("failed to build HTTP client")?,
    );
    let store = Arc::new(FileStore::new(&config.cache_dir).context("failed to open cache")?);
    let cache = Arc::new(RateCache::new(client.clone(), store));
    let loader = Arc::new(RateSeriesLoader::new(cache));
    let directory = Arc::new(CurrencyDirectory::new(client));

    info!(
        "Using cache at {} and model at {}",
        config.cache_dir.display(),
        config.model_path.display()
    );

    match cli.command {
        Commands::Currencies { refresh } => {
            let list = if refresh {
                directory.refresh().await
            } else {
                directory.currencies().await
            };
            print_json(&list)?;
        }

        Commands::Rates { code, days } => {
            let code = require_known(&directory, &code).await?;
            let series = loader
                .recent(&code, Local::now().date_naive(), days)
                .await?;
            print_json(&series)?;
        }

        Commands::Snapshot { code } => {
            let code = require_known(&directory, &code).await?;
            let service = SnapshotService::new(loader, config.lookback.snapshot_days);
            let snapshot = service.snapshot(&code).await?;
            if snapshot.is_none() {
                warn!("Not enough history for a {} snapshot", code);
            }
            print_json(&snapshot)?;
        }

        Commands::Predict { code } => {
            let code = require_known(&directory, &code).await?;
            let model = Arc::new(JsonModelLoader::new(&config.model_path));
            let classifier =
                TrendClassifier::new(loader, model, config.lookback.predict_days);
            let verdict = classifier.predict(&code).await?;
            if verdict.is_none() {
                warn!("No trend verdict available for {}", code);
            }
            print_json(&verdict)?;
        }

        Commands::Advice { code } => {
            let code = require_known(&directory, &code).await?;
            let engine = AdvisoryEngine::new(loader, config.lookback.advice_days);
            let report = engine.advise(&code).await?;
            match &report {
                Some(report) => {
                    for line in report.lines() {
                        info!("{}: {}", code, line);
                    }
                }
                None => warn!("Not enough history to advise on {}", code),
            }
            print_json(&report)?;
        }

        Commands::Dataset { days_back, out } => {
            let days_back = days_back.unwrap_or(config.lookback.dataset_days);
            let builder = DatasetBuilder::new(directory, loader, days_back);
            let dataset = builder.build().await?;

            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    write_jsonl(&dataset, BufWriter::new(file))?;
                    info!("Wrote {} samples to {}", dataset.len(), path.display());
                }
                None => write_jsonl(&dataset, io::stdout().lock())?,
            }

            for (code, count) in &dataset.counts {
                info!("{}: {} samples", code, count);
            }
        }
    }

    Ok(())
}
