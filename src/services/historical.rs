//! Business-day rate history built from the per-date cache.

use crate::error::Result;
use crate::services::RateCache;
use crate::types::{is_business_day, RateSeries};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::debug;

/// Builds ordered rate series for a currency over a date range.
pub struct RateSeriesLoader {
    cache: Arc<RateCache>,
}

impl RateSeriesLoader {
    pub fn new(cache: Arc<RateCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    /// Resolved observations from `start` to `end` inclusive.
    ///
    /// Weekends are skipped by calendar rule. Each remaining date is tried
    /// exactly once; dates without a rate are left out, so the result may be
    /// shorter than the number of business days in the range.
    pub async fn get_series(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
    ) -> Result<RateSeries> {
        let mut series = RateSeries::new(currency);
        if start > end {
            return Ok(series);
        }

        let code = series.currency.clone();
        let mut attempted = 0usize;
        for date in start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| is_business_day(*d))
        {
            attempted += 1;
            if let Some(rate) = self.cache.get_rate(date, &code).await? {
                series.push(date, rate);
            }
        }

        debug!(
            "Loaded {} of {} business days for {} ({} to {})",
            series.len(),
            attempted,
            series.currency,
            start,
            end
        );
        Ok(series)
    }

    /// Series covering the last `lookback_days` calendar days up to `as_of`.
    pub async fn recent(
        &self,
        currency: &str,
        as_of: NaiveDate,
        lookback_days: i64,
    ) -> Result<RateSeries> {
        let start = lookback_start(as_of, lookback_days);
        self.get_series(start, as_of, currency).await
    }
}

/// First date of a lookback window ending at `as_of`.
///
/// Negative lookbacks are treated as zero. Windows reaching past the
/// earliest representable date start at [`NaiveDate::MIN`].
pub fn lookback_start(as_of: NaiveDate, lookback_days: i64) -> NaiveDate {
    Duration::try_days(lookback_days.max(0))
        .and_then(|window| as_of.checked_sub_signed(window))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::services::MemoryStore;
    use crate::sources::RateSource;
    use crate::types::{RateTable, RawQuote};
    use async_trait::async_trait;
    use chrono::Datelike;
    use std::sync::Mutex;

    /// Quotes USD at 90 + day-of-month, except on the listed holidays.
    struct CalendarSource {
        holidays: Vec<NaiveDate>,
        requested: Mutex<Vec<NaiveDate>>,
    }

    #[async_trait]
    impl RateSource for CalendarSource {
        fn name(&self) -> &str {
            "calendar"
        }

        async fn fetch_day(&self, date: NaiveDate) -> Result<RateTable> {
            self.requested.lock().unwrap().push(date);
            if self.holidays.contains(&date) {
                return Err(FxError::DataUnavailable("holiday".into()));
            }
            Ok(RateTable::from_quotes(vec![RawQuote {
                code: "USD".into(),
                name: "US Dollar".into(),
                nominal: 1,
                value: 90.0 + date.day() as f64,
            }]))
        }
    }

    fn loader(holidays: Vec<NaiveDate>) -> (RateSeriesLoader, Arc<CalendarSource>) {
        let source = Arc::new(CalendarSource {
            holidays,
            requested: Mutex::new(Vec::new()),
        });
        let cache = RateCache::new(source.clone(), Arc::new(MemoryStore::new()));
        (RateSeriesLoader::new(Arc::new(cache)), source)
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[tokio::test]
    async fn test_series_skips_weekends() {
        let (loader, source) = loader(vec![]);

        // Fri 5th .. Tue 9th
        let series = loader.get_series(d(5), d(9), "usd").await.unwrap();

        let dates: Vec<_> = series.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(5), d(8), d(9)]);
        assert_eq!(series.rates(), vec![95.0, 98.0, 99.0]);
        assert_eq!(source.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_series_tolerates_gaps() {
        let (loader, _) = loader(vec![d(8)]);

        let series = loader.get_series(d(8), d(12), "USD").await.unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.points[0].date, d(9));
    }

    #[tokio::test]
    async fn test_weekend_only_range_is_empty() {
        let (loader, source) = loader(vec![]);

        let series = loader.get_series(d(6), d(7), "USD").await.unwrap();
        assert!(series.is_empty());
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty() {
        let (loader, _) = loader(vec![]);
        let series = loader.get_series(d(12), d(8), "USD").await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_recent_is_inclusive() {
        let (loader, _) = loader(vec![]);
        // Wed 10th back 2 days: Mon 8th .. Wed 10th
        let series = loader.recent("USD", d(10), 2).await.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.latest().unwrap().date, d(10));
    }

    #[test]
    fn test_lookback_start_clamps_huge_window() {
        assert_eq!(lookback_start(d(10), 2), d(8));
        assert_eq!(lookback_start(d(10), -5), d(10));
        assert_eq!(lookback_start(d(10), i64::MAX), NaiveDate::MIN);
        assert_eq!(lookback_start(d(10), 1_000_000_000), NaiveDate::MIN);
    }
}
