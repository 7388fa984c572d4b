//! Feature engineering over rate histories.
//!
//! Turns a sequence of daily rates into the four-feature vectors the trend
//! classifier is trained and queried on.

pub mod momentum;

pub use momentum::{momentum_oscillator, DEFAULT_MOMENTUM_PERIOD, NEUTRAL_MOMENTUM};

use crate::types::{FeatureVector, TrainingPair};

/// Trailing window for the change statistics.
pub const DEFAULT_WINDOW: usize = 5;

/// Observations used to build an inference vector.
pub const INFERENCE_OBSERVATIONS: usize = 7;

/// Relative step changes `(r[i] - r[i-1]) / r[i-1]`.
pub fn relative_changes(rates: &[f64]) -> Vec<f64> {
    rates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 with fewer than two values.
pub fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Features for predicting the rate at index `i`, using only `rates[..i]`.
///
/// Requires `1 <= window <= i <= rates.len()`. `i == rates.len()` describes
/// the not-yet-observed next day.
fn features_at(rates: &[f64], i: usize, window: usize) -> FeatureVector {
    let window_rates = &rates[i - window..i];

    let delta_prev = if i >= 2 {
        (rates[i - 1] - rates[i - 2]) / rates[i - 2]
    } else {
        0.0
    };

    let changes = relative_changes(window_rates);

    FeatureVector {
        delta_prev,
        delta_ma: mean(&changes),
        volatility: population_std(&changes),
        momentum: momentum_oscillator(&rates[..i], DEFAULT_MOMENTUM_PERIOD),
    }
}

/// Supervised pairs for every index from `window` to the end of `rates`.
///
/// Label is 1 when the rate at the index exceeds the previous one. Empty
/// when `rates` has fewer than `window + 1` values.
pub fn build_training_pairs(rates: &[f64], window: usize) -> Vec<TrainingPair> {
    if window == 0 || rates.len() < window + 1 {
        return Vec::new();
    }

    (window..rates.len())
        .map(|i| TrainingPair {
            features: features_at(rates, i, window),
            label: u8::from(rates[i] > rates[i - 1]),
        })
        .collect()
}

/// One feature vector describing the day after the most recent observation.
///
/// Only the last [`INFERENCE_OBSERVATIONS`] rates are considered. Returns
/// `None` when fewer than `window + 1` of them are available.
pub fn build_inference_vector(rates: &[f64], window: usize) -> Option<FeatureVector> {
    let recent = &rates[rates.len().saturating_sub(INFERENCE_OBSERVATIONS)..];
    if window == 0 || recent.len() < window + 1 {
        return None;
    }
    Some(features_at(recent, recent.len(), window))
}
