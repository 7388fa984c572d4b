pub mod advisory;
pub mod cache;
pub mod classifier;
pub mod currencies;
pub mod dataset;
pub mod features;
pub mod file_cache;
pub mod historical;
pub mod rate_cache;
pub mod snapshot;

pub use advisory::AdvisoryEngine;
pub use cache::{CacheStore, MemoryStore};
pub use classifier::{Classifier, JsonModelLoader, LogisticModel, ModelLoader, TrendClassifier};
pub use currencies::CurrencyDirectory;
pub use dataset::DatasetBuilder;
pub use file_cache::FileStore;
pub use historical::RateSeriesLoader;
pub use rate_cache::RateCache;
pub use snapshot::SnapshotService;
