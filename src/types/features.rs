use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of features fed to the classifier.
pub const FEATURE_COUNT: usize = 4;

/// Fixed-width feature vector built from a rate history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Relative change yesterday vs. the day before.
    pub delta_prev: f64,
    /// Mean of relative changes over the trailing window.
    pub delta_ma: f64,
    /// Population standard deviation of those relative changes.
    pub volatility: f64,
    /// Momentum oscillator over a short period.
    pub momentum: f64,
}

impl FeatureVector {
    /// Features in classifier order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [self.delta_prev, self.delta_ma, self.volatility, self.momentum]
    }
}

/// A feature vector with its next-day direction label (1 = rose, 0 = otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPair {
    pub features: FeatureVector,
    pub label: u8,
}

/// A training pair tagged with the currency it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub currency: String,
    pub features: [f64; FEATURE_COUNT],
    pub label: u8,
}

/// Labeled samples pooled across currencies, in collection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<LabeledSample>,
    /// Samples contributed per currency, zero for skipped ones.
    pub counts: BTreeMap<String, usize>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
