//! Training dataset collection across all published currencies.

use crate::error::Result;
use crate::services::features::{build_training_pairs, DEFAULT_WINDOW};
use crate::services::{CurrencyDirectory, RateSeriesLoader};
use crate::types::{Dataset, LabeledSample};
use chrono::{Local, NaiveDate};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// Currencies with fewer observations contribute no samples.
pub const MIN_OBSERVATIONS: usize = 10;

/// Collects labeled feature vectors for offline training.
pub struct DatasetBuilder {
    directory: Arc<CurrencyDirectory>,
    loader: Arc<RateSeriesLoader>,
    days_back: i64,
}

impl DatasetBuilder {
    pub fn new(
        directory: Arc<CurrencyDirectory>,
        loader: Arc<RateSeriesLoader>,
        days_back: i64,
    ) -> Self {
        Self {
            directory,
            loader,
            days_back,
        }
    }

    pub async fn build(&self) -> Result<Dataset> {
        self.build_as_of(Local::now().date_naive()).await
    }

    /// Walk every currency in the directory, oldest date first, and pool
    /// their training pairs.
    pub async fn build_as_of(&self, as_of: NaiveDate) -> Result<Dataset> {
        let currencies = self.directory.currencies().await;
        info!("Collecting history for {} currencies", currencies.len());

        let mut dataset = Dataset::default();
        for code in currencies.keys() {
            let series = self.loader.recent(code, as_of, self.days_back).await?;

            let pairs = if series.len() < MIN_OBSERVATIONS {
                Vec::new()
            } else {
                build_training_pairs(&series.rates(), DEFAULT_WINDOW)
            };

            if !pairs.is_empty() {
                info!("{}: +{} samples", code, pairs.len());
            }
            dataset.counts.insert(code.clone(), pairs.len());
            dataset
                .samples
                .extend(pairs.into_iter().map(|pair| LabeledSample {
                    currency: code.clone(),
                    features: pair.features.to_array(),
                    label: pair.label,
                }));
        }

        info!("Collected {} samples in total", dataset.len());
        Ok(dataset)
    }
}

/// Write one JSON object per sample, newline separated.
pub fn write_jsonl<W: Write>(dataset: &Dataset, mut out: W) -> Result<()> {
    for sample in &dataset.samples {
        serde_json::to_writer(&mut out, sample)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
