//! Lazily loaded list of currencies published by the feed.

use crate::sources::CurrencyCatalog;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Currencies returned when the catalog cannot be reached.
const FALLBACK_CURRENCIES: &[(&str, &str)] = &[
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("EUR", "Euro"),
    ("GBP", "Pound Sterling"),
    ("JPY", "Japanese Yen"),
    ("USD", "US Dollar"),
];

/// Owned cache of the currency list, loaded on first use.
pub struct CurrencyDirectory {
    catalog: Arc<dyn CurrencyCatalog>,
    loaded: RwLock<Option<BTreeMap<String, String>>>,
}

impl CurrencyDirectory {
    pub fn new(catalog: Arc<dyn CurrencyCatalog>) -> Self {
        Self {
            catalog,
            loaded: RwLock::new(None),
        }
    }

    fn fallback() -> BTreeMap<String, String> {
        FALLBACK_CURRENCIES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect()
    }

    /// Currency code -> name.
    ///
    /// If the catalog fails before anything was loaded, a built-in list is
    /// returned but not kept, so the next call tries the catalog again.
    pub async fn currencies(&self) -> BTreeMap<String, String> {
        if let Some(list) = self.loaded.read().await.as_ref() {
            return list.clone();
        }

        match self.catalog.list_currencies().await {
            Ok(list) => {
                info!("Loaded {} currencies", list.len());
                *self.loaded.write().await = Some(list.clone());
                list
            }
            Err(e) => {
                error!("Failed to load currency list: {}", e);
                Self::fallback()
            }
        }
    }

    /// Reload the list from the catalog. Keeps the previous list on failure.
    pub async fn refresh(&self) -> BTreeMap<String, String> {
        match self.catalog.list_currencies().await {
            Ok(list) => {
                info!("Refreshed currency list: {} currencies", list.len());
                *self.loaded.write().await = Some(list.clone());
                list
            }
            Err(e) => {
                error!("Failed to refresh currency list: {}", e);
                match self.loaded.read().await.as_ref() {
                    Some(list) => list.clone(),
                    None => Self::fallback(),
                }
            }
        }
    }

    /// Case-insensitive membership test.
    pub async fn contains(&self, code: &str) -> bool {
        self.currencies().await.contains_key(&code.to_uppercase())
    }
}
