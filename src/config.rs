use std::env;
use std::path::PathBuf;

/// Default Central Bank of Russia daily feed.
pub const DEFAULT_SOURCE_URL: &str = "https://cbr.ru/scripts/XML_daily.asp";

/// Lookback windows (in calendar days) for the on-demand computations.
#[derive(Debug, Clone)]
pub struct LookbackConfig {
    /// History loaded before building an inference vector (default: 20).
    pub predict_days: i64,
    /// History loaded for advisory heuristics (default: 15).
    pub advice_days: i64,
    /// History loaded for the market snapshot (default: 20).
    pub snapshot_days: i64,
    /// History collected per currency when building a training dataset (default: 1000).
    pub dataset_days: i64,
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            predict_days: 20,
            advice_days: 15,
            snapshot_days: 20,
            dataset_days: 1000,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one cached rate table per date.
    pub cache_dir: PathBuf,
    /// Base URL of the daily rate feed.
    pub source_url: String,
    /// Upstream request timeout in seconds.
    pub http_timeout_secs: u64,
    /// Path of the classifier artifact.
    pub model_path: PathBuf,
    /// Lookback windows.
    pub lookback: LookbackConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = LookbackConfig::default();

        Self {
            cache_dir: env::var("FX_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cache")),
            source_url: env::var("FX_SOURCE_URL")
                .unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string()),
            http_timeout_secs: env::var("FX_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            model_path: env::var("FX_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("model_all.json")),
            lookback: LookbackConfig {
                predict_days: env::var("FX_PREDICT_LOOKBACK_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.predict_days),
                advice_days: env::var("FX_ADVICE_LOOKBACK_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.advice_days),
                snapshot_days: env::var("FX_SNAPSHOT_LOOKBACK_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.snapshot_days),
                dataset_days: env::var("FX_DATASET_DAYS_BACK")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.dataset_days),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
