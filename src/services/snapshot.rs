//! Short-horizon market statistics for a single currency.

use crate::error::Result;
use crate::services::features::{
    momentum_oscillator, population_std, relative_changes, DEFAULT_MOMENTUM_PERIOD,
};
use crate::services::RateSeriesLoader;
use crate::types::{MarketSnapshot, MomentumStatus, RateSeries, VolatilityLevel};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

/// Observations required for a snapshot.
pub const MIN_OBSERVATIONS: usize = 3;

/// Relative changes included in the volatility figure.
const VOLATILITY_CHANGES: usize = 7;

/// Percent change from the `n`-th most recent rate to the latest; 0.0 when
/// fewer than `n` rates exist. `n = 2` is the previous observation.
fn delta_from_nth_last(rates: &[f64], n: usize) -> f64 {
    if n < 2 || rates.len() < n {
        return 0.0;
    }
    let last = rates[rates.len() - 1];
    let base = rates[rates.len() - n];
    (last - base) / base * 100.0
}

/// Build a snapshot from an ordered series; `None` with fewer than
/// [`MIN_OBSERVATIONS`] points.
pub fn snapshot_from_series(series: &RateSeries) -> Option<MarketSnapshot> {
    if series.len() < MIN_OBSERVATIONS {
        return None;
    }
    let latest = series.latest()?;
    let rates = series.rates();

    let recent = series.tail(VOLATILITY_CHANGES + 1).rates();
    let volatility_7d_pct = population_std(&relative_changes(&recent)) * 100.0;

    let oscillator_input = &rates[rates.len().saturating_sub(DEFAULT_MOMENTUM_PERIOD + 1)..];
    let momentum = momentum_oscillator(oscillator_input, DEFAULT_MOMENTUM_PERIOD);

    Some(MarketSnapshot {
        currency: series.currency.clone(),
        date: latest.date,
        rate: latest.rate,
        delta_1d_pct: delta_from_nth_last(&rates, 2),
        delta_3d_pct: delta_from_nth_last(&rates, 3),
        delta_7d_pct: delta_from_nth_last(&rates, 7),
        volatility_7d_pct,
        volatility_level: VolatilityLevel::from_pct(volatility_7d_pct),
        momentum,
        momentum_status: MomentumStatus::from_value(momentum),
    })
}

/// Loads recent history and summarizes it as a [`MarketSnapshot`].
pub struct SnapshotService {
    loader: Arc<RateSeriesLoader>,
    lookback_days: i64,
}

impl SnapshotService {
    pub fn new(loader: Arc<RateSeriesLoader>, lookback_days: i64) -> Self {
        Self {
            loader,
            lookback_days,
        }
    }

    pub async fn snapshot(&self, currency: &str) -> Result<Option<MarketSnapshot>> {
        self.snapshot_as_of(currency, Local::now().date_naive()).await
    }

    pub async fn snapshot_as_of(
        &self,
        currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<MarketSnapshot>> {
        let series = self.loader.recent(currency, as_of, self.lookback_days).await?;
        let snapshot = snapshot_from_series(&series);
        if snapshot.is_none() {
            debug!(
                "No snapshot for {}: {} observations",
                series.currency,
                series.len()
            );
        }
        Ok(snapshot)
    }
}
