//! End-to-end tests: on-disk cache, series loading, verdicts and advisories

use async_trait::async_trait;
use chrono::NaiveDate;
use fxtrend::error::{FxError, Result};
use fxtrend::services::{
    AdvisoryEngine, CacheStore, Classifier, FileStore, JsonModelLoader, ModelLoader, RateCache,
    RateSeriesLoader, SnapshotService, TrendClassifier,
};
use fxtrend::sources::RateSource;
use fxtrend::types::{Advisory, FeatureVector, RateTable, RawQuote, TrendKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

/// USD quotes for the business days 2024-03-01 through 2024-03-11.
fn march_quotes() -> BTreeMap<NaiveDate, f64> {
    [
        (date(1), 100.0),
        (date(4), 101.0),
        (date(5), 100.5),
        (date(6), 102.0),
        (date(7), 103.0),
        (date(8), 101.0),
        (date(11), 104.0),
    ]
    .into_iter()
    .collect()
}

struct ScriptedSource {
    quotes: BTreeMap<NaiveDate, f64>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(quotes: BTreeMap<NaiveDate, f64>) -> Self {
        Self {
            quotes,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_day(&self, date: NaiveDate) -> Result<RateTable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = self
            .quotes
            .get(&date)
            .copied()
            .ok_or_else(|| FxError::DataUnavailable(format!("nothing published on {}", date)))?;
        // Published per 10 units to exercise the nominal division.
        Ok(RateTable::from_quotes([RawQuote {
            code: "USD".to_string(),
            name: "US Dollar".to_string(),
            nominal: 10,
            value: value * 10.0,
        }]))
    }
}

struct FixedClassifier {
    class: u8,
    probability: f64,
}

impl Classifier for FixedClassifier {
    fn predict(&self, _: &FeatureVector) -> u8 {
        self.class
    }

    fn predict_probability(&self, _: &FeatureVector) -> [f64; 2] {
        if self.class == 1 {
            [1.0 - self.probability, self.probability]
        } else {
            [self.probability, 1.0 - self.probability]
        }
    }
}

struct FixedLoader(u8, f64);

impl ModelLoader for FixedLoader {
    fn load(&self) -> Result<Box<dyn Classifier>> {
        Ok(Box::new(FixedClassifier {
            class: self.0,
            probability: self.1,
        }))
    }
}

fn temp_cache(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fxtrend_pipeline_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn build(dir: &Path) -> (Arc<ScriptedSource>, Arc<RateSeriesLoader>) {
    let source = Arc::new(ScriptedSource::new(march_quotes()));
    let store = Arc::new(FileStore::new(dir).unwrap());
    let cache = Arc::new(RateCache::new(source.clone(), store));
    (source, Arc::new(RateSeriesLoader::new(cache)))
}

#[tokio::test]
async fn test_get_rate_is_idempotent_and_cached() {
    let dir = temp_cache("idempotent");
    let (source, loader) = build(&dir);

    let first = loader.cache().get_rate(date(5), "USD").await.unwrap();
    let second = loader.cache().get_rate(date(5), "usd").await.unwrap();

    assert_eq!(first, Some(100.5));
    assert_eq!(first, second);
    assert_eq!(source.calls(), 1);
    assert!(dir.join("2024-03-05.json").exists());

    // Quoted date, unquoted currency: absent, no refetch.
    assert_eq!(loader.cache().get_rate(date(5), "EUR").await.unwrap(), None);
    assert_eq!(source.calls(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_stored_dates_are_never_refetched() {
    let dir = temp_cache("authority");
    let (_, loader) = build(&dir);
    loader.get_series(date(1), date(11), "USD").await.unwrap();

    // A second cache over the same directory with an upstream that has nothing.
    let offline = Arc::new(ScriptedSource::new(BTreeMap::new()));
    let cache = RateCache::new(offline.clone(), Arc::new(FileStore::new(&dir).unwrap()));

    assert_eq!(cache.get_rate(date(11), "USD").await.unwrap(), Some(104.0));
    assert_eq!(offline.calls(), 0);

    // Never stored: upstream is tried and the failure reads as absent.
    assert_eq!(cache.get_rate(date(12), "USD").await.unwrap(), None);
    assert_eq!(offline.calls(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_malformed_entry_is_refetched() {
    let dir = temp_cache("malformed");
    let store = FileStore::new(&dir).unwrap();
    store.put("2024-03-04", "{not json").unwrap();

    let (source, loader) = build(&dir);
    assert_eq!(loader.cache().get_rate(date(4), "USD").await.unwrap(), Some(101.0));
    assert_eq!(source.calls(), 1);

    let repaired = store.get("2024-03-04").unwrap().unwrap();
    assert!(repaired.contains("USD"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_weekend_range_is_empty() {
    let dir = temp_cache("weekend");
    let (source, loader) = build(&dir);

    let series = loader.get_series(date(9), date(10), "USD").await.unwrap();
    assert!(series.is_empty());
    assert_eq!(source.calls(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_series_skips_unpublished_dates() {
    let dir = temp_cache("series");
    let (source, loader) = build(&dir);

    let series = loader.recent("USD", date(11), 20).await.unwrap();
    assert_eq!(
        series.rates(),
        vec![100.0, 101.0, 100.5, 102.0, 103.0, 101.0, 104.0]
    );
    // 2024-02-20 through 2024-03-11 has 15 business days; each tried once.
    assert_eq!(source.calls(), 15);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_predict_clear_signal() {
    let dir = temp_cache("predict");
    let (_, loader) = build(&dir);
    let classifier = TrendClassifier::new(loader, Arc::new(FixedLoader(1, 0.75)), 20);

    let verdict = classifier
        .predict_as_of("USD", date(11))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(verdict.kind, TrendKind::Up);
    assert_eq!(verdict.confidence, 75.0);
    assert!(verdict.rationale.starts_with("clear signal ("));
    assert!(verdict.rationale.contains("rose yesterday"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_predict_weak_up_reads_as_down() {
    let dir = temp_cache("predict_weak");
    let (_, loader) = build(&dir);
    let classifier = TrendClassifier::new(loader, Arc::new(FixedLoader(1, 0.35)), 20);

    let verdict = classifier
        .predict_as_of("USD", date(11))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(verdict.kind, TrendKind::Down);
    assert_eq!(verdict.confidence, 30.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_predict_without_enough_history() {
    let dir = temp_cache("predict_short");
    let (_, loader) = build(&dir);
    let classifier = TrendClassifier::new(loader, Arc::new(FixedLoader(1, 0.9)), 20);

    // Six observations up to 2024-03-08.
    assert!(classifier
        .predict_as_of("USD", date(8))
        .await
        .unwrap()
        .is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_predict_without_model() {
    let dir = temp_cache("predict_nomodel");
    let (source, loader) = build(&dir);
    let model = Arc::new(JsonModelLoader::new(dir.join("missing_model.json")));
    let classifier = TrendClassifier::new(loader, model, 20);

    assert!(classifier
        .predict_as_of("USD", date(11))
        .await
        .unwrap()
        .is_none());
    // The model is checked before any history is loaded.
    assert_eq!(source.calls(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_predict_with_json_artifact() {
    let dir = temp_cache("predict_json");
    let (_, loader) = build(&dir);
    let path = dir.join("model_all.json");
    // Strongly positive weight on the previous-day change.
    std::fs::write(&path, r#"{"weights": [200.0, 0.0, 0.0, 0.0], "intercept": 0.0}"#).unwrap();

    let classifier = TrendClassifier::new(loader, Arc::new(JsonModelLoader::new(&path)), 20);
    let verdict = classifier
        .predict_as_of("USD", date(11))
        .await
        .unwrap()
        .unwrap();

    // sigmoid(200 * 3/101) is well above 0.60
    assert_eq!(verdict.kind, TrendKind::Up);
    assert!(verdict.confidence > 99.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_advice_for_volatile_rise() {
    let dir = temp_cache("advice");
    let (_, loader) = build(&dir);
    let engine = AdvisoryEngine::new(loader, 15);

    let report = engine.advise_as_of("USD", date(11)).await.unwrap().unwrap();
    assert_eq!(
        report.advisories,
        vec![
            Advisory::HighVolatility,
            Advisory::SharpRise,
            Advisory::SustainedRise
        ]
    );
    assert!((report.metrics.delta_7d_pct - 4.0).abs() < 1e-9);
    assert_eq!(report.lines().len(), 3);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_advice_needs_five_observations() {
    let dir = temp_cache("advice_short");
    let (_, loader) = build(&dir);
    let engine = AdvisoryEngine::new(loader, 15);

    // Four observations up to 2024-03-06.
    assert!(engine.advise_as_of("USD", date(6)).await.unwrap().is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_snapshot() {
    let dir = temp_cache("snapshot");
    let (_, loader) = build(&dir);
    let service = SnapshotService::new(loader, 20);

    let snap = service.snapshot_as_of("USD", date(11)).await.unwrap().unwrap();
    assert_eq!(snap.date, date(11));
    assert_eq!(snap.rate, 104.0);
    assert!((snap.delta_3d_pct - (104.0 - 103.0) / 103.0 * 100.0).abs() < 1e-9);
    assert!((snap.delta_7d_pct - 4.0).abs() < 1e-9);

    let _ = std::fs::remove_dir_all(&dir);
}
