//! Central Bank of Russia daily rate feed.
//!
//! `XML_daily.asp` publishes one `ValCurs` document per date with a `Valute`
//! record per currency. Values use a comma decimal separator and refer to
//! `Nominal` units (e.g. 100 JPY).

use crate::config::DEFAULT_SOURCE_URL;
use crate::error::{FxError, Result};
use crate::sources::{CurrencyCatalog, RateSource};
use crate::types::{RateTable, RawQuote};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "Nominal")]
    nominal: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Parse a `ValCurs` document into raw quotes.
///
/// Records with an unparseable nominal or value are skipped rather than
/// failing the whole day.
pub fn parse_daily(xml: &str) -> Result<Vec<RawQuote>> {
    let doc: ValCurs = quick_xml::de::from_str(xml)?;

    let quotes = doc
        .valutes
        .into_iter()
        .filter_map(|v| {
            let nominal = v.nominal.trim().parse::<u32>().ok();
            let value = v.value.trim().replace(',', ".").parse::<f64>().ok();
            match (nominal, value) {
                (Some(nominal), Some(value)) => Some(RawQuote {
                    code: v.char_code.trim().to_uppercase(),
                    name: v.name.trim().to_string(),
                    nominal,
                    value,
                }),
                _ => {
                    debug!("Skipping unparseable quote for {}", v.char_code);
                    None
                }
            }
        })
        .collect();

    Ok(quotes)
}

/// CBR REST client.
#[derive(Clone)]
pub struct CbrClient {
    client: Client,
    base_url: String,
}

impl CbrClient {
    /// Create a client against the public feed.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_SOURCE_URL, timeout)
    }

    /// Create a client against a custom feed URL.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('?').to_string(),
        })
    }

    /// Request URL for a specific date.
    fn day_url(&self, date: NaiveDate) -> String {
        format!("{}?date_req={}", self.base_url, date.format("%d/%m/%Y"))
    }

    async fn get_document(&self, url: &str) -> Result<String> {
        debug!("Fetching CBR document: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("CBR feed error: {}", status);
            return Err(FxError::DataUnavailable(format!(
                "CBR feed returned {}",
                status
            )));
        }

        // reqwest decodes using the charset in Content-Type (windows-1251).
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RateSource for CbrClient {
    fn name(&self) -> &str {
        "cbr"
    }

    async fn fetch_day(&self, date: NaiveDate) -> Result<RateTable> {
        let body = self.get_document(&self.day_url(date)).await?;
        let quotes = parse_daily(&body)?;
        if quotes.is_empty() {
            return Err(FxError::DataUnavailable(format!(
                "CBR published no quotes for {}",
                date
            )));
        }

        let table = RateTable::from_quotes(quotes);
        debug!("CBR returned {} rates for {}", table.len(), date);
        Ok(table)
    }
}

#[async_trait]
impl CurrencyCatalog for CbrClient {
    async fn list_currencies(&self) -> Result<BTreeMap<String, String>> {
        let body = self.get_document(&self.base_url).await?;
        let currencies: BTreeMap<String, String> = parse_daily(&body)?
            .into_iter()
            .map(|q| (q.code, q.name))
            .collect();

        if currencies.is_empty() {
            return Err(FxError::DataUnavailable(
                "CBR currency list is empty".to_string(),
            ));
        }
        Ok(currencies)
    }
}
