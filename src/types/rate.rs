use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single quote as published by the upstream feed, before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    /// Alphabetic currency code (e.g. "USD").
    pub code: String,
    /// Human-readable currency name.
    pub name: String,
    /// Lot size the value refers to.
    pub nominal: u32,
    /// Price of `nominal` units in the reference currency.
    pub value: f64,
}

/// One day's rate table: currency code -> per-unit rate.
///
/// Serialized as a plain JSON object so a cache entry reads as
/// `{"EUR": 99.12, "USD": 92.5}`. Keys are kept sorted which makes the
/// serialized form stable across writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Build a table from raw quotes, dividing each value by its lot size.
    ///
    /// Quotes that would break the positive per-unit invariant are dropped.
    pub fn from_quotes<I>(quotes: I) -> Self
    where
        I: IntoIterator<Item = RawQuote>,
    {
        let rates = quotes
            .into_iter()
            .filter(|q| q.nominal > 0 && q.value.is_finite() && q.value > 0.0)
            .map(|q| (q.code.to_uppercase(), q.value / q.nominal as f64))
            .collect();
        Self { rates }
    }

    /// Rate for a currency code, if quoted on this date.
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.rates.get(&currency.to_uppercase()).copied()
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.rates.contains_key(&currency.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// A resolved observation in a rate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Ordered business-day rate history for one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSeries {
    pub currency: String,
    pub points: Vec<RatePoint>,
}

impl RateSeries {
    pub fn new(currency: &str) -> Self {
        Self {
            currency: currency.to_uppercase(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, date: NaiveDate, rate: f64) {
        self.points.push(RatePoint { date, rate });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rates in date order.
    pub fn rates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.rate).collect()
    }

    /// The most recent observation.
    pub fn latest(&self) -> Option<&RatePoint> {
        self.points.last()
    }

    /// A new series holding at most the last `n` observations.
    pub fn tail(&self, n: usize) -> RateSeries {
        let start = self.points.len().saturating_sub(n);
        RateSeries {
            currency: self.currency.clone(),
            points: self.points[start..].to_vec(),
        }
    }
}

/// Whether a date falls on Monday-Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Cache key for a date (ISO calendar date).
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
