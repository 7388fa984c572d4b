//! Rule-based advisories from short-term rate movement.

use crate::error::Result;
use crate::services::features::relative_changes;
use crate::services::RateSeriesLoader;
use crate::types::{Advisory, AdvisoryMetrics, AdvisoryReport};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

/// Observations required before any advisory is produced.
pub const MIN_OBSERVATIONS: usize = 5;

/// Changes considered for the volatility figure.
const VOLATILITY_CHANGES: usize = 5;

// Thresholds, in percent.
const HIGH_VOLATILITY_PCT: f64 = 1.5;
const LOW_VOLATILITY_PCT: f64 = 0.4;
const SHARP_MOVE_PCT: f64 = 1.0;
const SUSTAINED_MOVE_PCT: f64 = 3.0;

fn pct_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}

/// Metrics for an ordered rate history, or `None` with fewer than
/// [`MIN_OBSERVATIONS`] rates.
///
/// The 7-day delta compares with the 7th most recent rate and is 0.0 when
/// the history is shorter. Volatility is the root mean square of the last
/// five relative changes, in percent; with only four changes available the
/// sum of squares is still divided by five.
pub fn metrics_from_rates(rates: &[f64]) -> Option<AdvisoryMetrics> {
    let n = rates.len();
    if n < MIN_OBSERVATIONS {
        return None;
    }

    let delta_1d_pct = pct_change(rates[n - 2], rates[n - 1]);
    let delta_7d_pct = if n >= 7 {
        pct_change(rates[n - 7], rates[n - 1])
    } else {
        0.0
    };

    let recent = &rates[n.saturating_sub(VOLATILITY_CHANGES + 1)..];
    let changes = relative_changes(recent);
    let mean_square =
        changes.iter().map(|c| (c * 100.0).powi(2)).sum::<f64>() / VOLATILITY_CHANGES as f64;

    Some(AdvisoryMetrics {
        volatility_pct: mean_square.sqrt(),
        delta_1d_pct,
        delta_7d_pct,
    })
}

/// Evaluate the rules in fixed order: volatility, 1-day move, 7-day move.
///
/// Each rule contributes at most one advisory. When none fires the result is
/// a single [`Advisory::Neutral`].
pub fn advise_metrics(metrics: &AdvisoryMetrics) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if metrics.volatility_pct > HIGH_VOLATILITY_PCT {
        advisories.push(Advisory::HighVolatility);
    } else if metrics.volatility_pct < LOW_VOLATILITY_PCT {
        advisories.push(Advisory::LowVolatility);
    }

    if metrics.delta_1d_pct > SHARP_MOVE_PCT {
        advisories.push(Advisory::SharpRise);
    } else if metrics.delta_1d_pct < -SHARP_MOVE_PCT {
        advisories.push(Advisory::SharpDrop);
    }

    if metrics.delta_7d_pct > SUSTAINED_MOVE_PCT {
        advisories.push(Advisory::SustainedRise);
    } else if metrics.delta_7d_pct < -SUSTAINED_MOVE_PCT {
        advisories.push(Advisory::SustainedDecline);
    }

    if advisories.is_empty() {
        advisories.push(Advisory::Neutral);
    }
    advisories
}

/// Produces advisory reports from recent history.
pub struct AdvisoryEngine {
    loader: Arc<RateSeriesLoader>,
    lookback_days: i64,
}

impl AdvisoryEngine {
    pub fn new(loader: Arc<RateSeriesLoader>, lookback_days: i64) -> Self {
        Self {
            loader,
            lookback_days,
        }
    }

    pub async fn advise(&self, currency: &str) -> Result<Option<AdvisoryReport>> {
        self.advise_as_of(currency, Local::now().date_naive()).await
    }

    /// Advisories from the history ending at `as_of`; `Ok(None)` when too
    /// few observations are available.
    pub async fn advise_as_of(
        &self,
        currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<AdvisoryReport>> {
        let series = self.loader.recent(currency, as_of, self.lookback_days).await?;

        let Some(metrics) = metrics_from_rates(&series.rates()) else {
            debug!(
                "No advisories for {}: {} observations",
                series.currency,
                series.len()
            );
            return Ok(None);
        };

        let advisories = advise_metrics(&metrics);
        info!("{} advisories for {}", advisories.len(), series.currency);

        Ok(Some(AdvisoryReport {
            currency: series.currency,
            metrics,
            advisories,
        }))
    }
}
