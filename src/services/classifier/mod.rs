//! Trend classifier contract and interpretation.

pub mod logistic;
pub mod trend;

pub use logistic::{LogisticModel, StandardScaler};
pub use trend::{interpret, TrendClassifier};

use crate::error::{FxError, Result};
use crate::types::{FeatureVector, ModelOutput, TrendKind};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// A pre-trained binary classifier over one feature vector.
///
/// Classes are 0 (down) and 1 (up).
pub trait Classifier: Send + Sync {
    /// Predicted class label.
    fn predict(&self, features: &FeatureVector) -> u8;

    /// Calibrated probability per class, indexed by label.
    fn predict_probability(&self, features: &FeatureVector) -> [f64; 2];
}

/// Produces a classifier artifact on demand.
pub trait ModelLoader: Send + Sync {
    /// Load the artifact. Missing or unreadable artifacts are `ModelUnavailable`.
    fn load(&self) -> Result<Box<dyn Classifier>>;
}

/// Loads a [`LogisticModel`] from a JSON file.
pub struct JsonModelLoader {
    path: PathBuf,
}

impl JsonModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelLoader for JsonModelLoader {
    fn load(&self) -> Result<Box<dyn Classifier>> {
        let document = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                FxError::ModelUnavailable(format!("no artifact at {}", self.path.display()))
            } else {
                FxError::ModelUnavailable(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                ))
            }
        })?;

        let model = LogisticModel::from_json(&document)?;
        debug!("Loaded classifier from {}", self.path.display());
        Ok(Box::new(model))
    }
}

/// Query a classifier for its class and the probability of that class.
///
/// Returns `None` if the label is outside {0, 1} or the probability is not
/// a number in [0, 1].
pub fn model_output(classifier: &dyn Classifier, features: &FeatureVector) -> Option<ModelOutput> {
    let label = classifier.predict(features);
    let class = TrendKind::from_class(label)?;
    let raw_confidence = classifier.predict_probability(features)[usize::from(label)];

    if !(0.0..=1.0).contains(&raw_confidence) {
        return None;
    }
    Some(ModelOutput {
        class,
        raw_confidence,
    })
}
