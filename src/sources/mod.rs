//! Upstream rate feeds.

pub mod cbr;

pub use cbr::CbrClient;

use crate::error::Result;
use crate::types::RateTable;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Fetches the full rate table published for a date.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Fetch every currency quoted on `date`.
    async fn fetch_day(&self, date: NaiveDate) -> Result<RateTable>;
}

/// Lists the currencies a feed publishes.
#[async_trait]
pub trait CurrencyCatalog: Send + Sync {
    /// Currency code -> human-readable name.
    async fn list_currencies(&self) -> Result<BTreeMap<String, String>>;
}
