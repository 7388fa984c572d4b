//! Logistic-regression classifier artifact.
//!
//! Stored as JSON:
//!
//! ```json
//! {
//!   "weights": [12.1, 4.3, -8.0, 0.01],
//!   "intercept": -0.2,
//!   "scaler": { "mean": [0, 0, 0.006, 50], "scale": [0.008, 0.004, 0.004, 25] }
//! }
//! ```
//!
//! `scaler` is optional; when present each feature is standardized as
//! `(x - mean) / scale` before the linear step.

use crate::error::{FxError, Result};
use crate::services::classifier::Classifier;
use crate::types::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// Per-feature standardization fitted during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub scale: [f64; FEATURE_COUNT],
}

/// Binary logistic model over the four trend features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: [f64; FEATURE_COUNT],
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
}

impl LogisticModel {
    /// Parse and validate an artifact document.
    pub fn from_json(document: &str) -> Result<Self> {
        let model: LogisticModel = serde_json::from_str(document)
            .map_err(|e| FxError::ModelUnavailable(format!("invalid artifact: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Reject artifacts that would produce non-finite probabilities.
    pub fn validate(&self) -> Result<()> {
        let finite = self.weights.iter().all(|w| w.is_finite()) && self.intercept.is_finite();
        if !finite {
            return Err(FxError::ModelUnavailable(
                "artifact has non-finite coefficients".to_string(),
            ));
        }

        if let Some(scaler) = &self.scaler {
            let ok = scaler.mean.iter().all(|m| m.is_finite())
                && scaler.scale.iter().all(|s| s.is_finite() && *s != 0.0);
            if !ok {
                return Err(FxError::ModelUnavailable(
                    "artifact scaler has zero or non-finite entries".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    /// Probability that the next rate is higher.
    pub fn probability_up(&self, features: &FeatureVector) -> f64 {
        let x = features.to_array();
        let z = (0..FEATURE_COUNT).fold(self.intercept, |acc, i| {
            let xi = match &self.scaler {
                Some(s) => (x[i] - s.mean[i]) / s.scale[i],
                None => x[i],
            };
            acc + self.weights[i] * xi
        });
        Self::sigmoid(z)
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: &FeatureVector) -> u8 {
        u8::from(self.probability_up(features) >= 0.5)
    }

    fn predict_probability(&self, features: &FeatureVector) -> [f64; 2] {
        let p = self.probability_up(features);
        [1.0 - p, p]
    }
}
