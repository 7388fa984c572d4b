use crate::error::{FxError, Result};
use crate::services::CacheStore;
use crate::sources::RateSource;
use crate::types::{date_key, RateTable};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-date rate table cache in front of an upstream rate source.
///
/// Once a date is stored it is the single source of truth for that date:
/// the upstream is never asked again, even if the stored table lacks the
/// requested currency.
pub struct RateCache {
    source: Arc<dyn RateSource>,
    store: Arc<dyn CacheStore>,
}

impl RateCache {
    /// Create a new rate cache.
    pub fn new(source: Arc<dyn RateSource>, store: Arc<dyn CacheStore>) -> Self {
        Self { source, store }
    }

    /// Read the stored table for a date.
    ///
    /// A document that fails to parse is reported and treated as a miss so
    /// that the caller refetches and overwrites it.
    fn load_cached(&self, date: NaiveDate) -> Result<Option<RateTable>> {
        let key = date_key(date);
        let Some(document) = self.store.get(&key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<RateTable>(&document) {
            Ok(table) if table.is_empty() => {
                debug!("Empty cache entry {}; refetching", key);
                Ok(None)
            }
            Ok(table) => Ok(Some(table)),
            Err(e) => {
                let err = FxError::MalformedCacheEntry {
                    key,
                    reason: e.to_string(),
                };
                warn!("{}; refetching", err);
                Ok(None)
            }
        }
    }

    /// Full rate table for a date, fetching and persisting it on a miss.
    pub async fn table(&self, date: NaiveDate) -> Result<RateTable> {
        if let Some(table) = self.load_cached(date)? {
            return Ok(table);
        }

        debug!("Cache miss for {}, fetching from {}", date, self.source.name());
        let fetched = self.source.fetch_day(date).await.map_err(|e| {
            warn!("Failed to fetch rates for {} from {}: {}", date, self.source.name(), e);
            match e {
                FxError::DataUnavailable(_) => e,
                other => FxError::DataUnavailable(format!(
                    "{} fetch for {} failed: {}",
                    self.source.name(),
                    date,
                    other
                )),
            }
        })?;

        // Empty tables are never stored.
        if fetched.is_empty() {
            return Err(FxError::DataUnavailable(format!(
                "{} returned no usable quotes for {}",
                self.source.name(),
                date
            )));
        }

        let document = serde_json::to_string(&fetched)?;
        self.store.put(&date_key(date), &document)?;

        // Re-read so the first answer goes through the same decode path as
        // every later one.
        Ok(self.load_cached(date)?.unwrap_or(fetched))
    }

    /// Rate for a currency on a date, or the reason it could not be resolved.
    pub async fn lookup(&self, date: NaiveDate, currency: &str) -> Result<f64> {
        let table = self.table(date).await?;
        table.get(currency).ok_or_else(|| {
            FxError::DataUnavailable(format!("no {} quote on {}", currency.to_uppercase(), date))
        })
    }

    /// Rate for a currency on a date.
    ///
    /// Returns `Ok(None)` for every recoverable condition (upstream failure,
    /// currency not quoted). Only storage failures are returned as errors.
    pub async fn get_rate(&self, date: NaiveDate, currency: &str) -> Result<Option<f64>> {
        match self.lookup(date, currency).await {
            Ok(rate) => Ok(Some(rate)),
            Err(e) if e.is_recoverable() => {
                debug!("Rate absent: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
