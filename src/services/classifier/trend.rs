use crate::error::{FxError, Result};
use crate::services::classifier::{model_output, ModelLoader};
use crate::services::features::{build_inference_vector, DEFAULT_WINDOW};
use crate::services::RateSeriesLoader;
use crate::types::{FeatureVector, ModelOutput, TrendKind, TrendVerdict};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

/// Observations required before a verdict is attempted.
pub const MIN_OBSERVATIONS: usize = 7;

/// Below this raw confidence the verdict is forced to "down".
const LOW_CONFIDENCE: f64 = 0.40;
/// Above this raw confidence the classifier's class is kept.
const HIGH_CONFIDENCE: f64 = 0.60;

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;
const LOW_VOLATILITY: f64 = 0.004;
const HIGH_VOLATILITY: f64 = 0.012;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Explanatory clauses derived from the features alone.
fn explain(features: &FeatureVector) -> Vec<&'static str> {
    let mut clauses = Vec::new();

    if features.delta_prev > 0.0 {
        clauses.push("rose yesterday");
    } else if features.delta_prev < 0.0 {
        clauses.push("fell yesterday");
    }

    if features.momentum > OVERBOUGHT {
        clauses.push("momentum > 70: overbought");
    } else if features.momentum < OVERSOLD {
        clauses.push("momentum < 30: oversold");
    }

    if features.volatility < LOW_VOLATILITY {
        clauses.push("low volatility");
    } else if features.volatility > HIGH_VOLATILITY {
        clauses.push("high volatility");
    }

    clauses
}

/// Turn a raw classifier answer into a three-bucket verdict.
///
/// - raw < 0.40: "down" whatever the predicted class, confidence `(0.5 - raw) * 200`
/// - raw > 0.60: predicted class, confidence `raw * 100`
/// - otherwise (bounds included): inconclusive, confidence `(0.5 - |raw - 0.5|) * 200`
///
/// Confidence is rounded to one decimal place.
pub fn interpret(output: ModelOutput, features: &FeatureVector) -> TrendVerdict {
    let raw = output.raw_confidence;

    let (kind, confidence, tag) = if raw < LOW_CONFIDENCE {
        (TrendKind::Down, (0.5 - raw) * 200.0, "weak downward signal")
    } else if raw > HIGH_CONFIDENCE {
        (output.class, raw * 100.0, "clear signal")
    } else {
        return TrendVerdict {
            kind: TrendKind::Inconclusive,
            confidence: round1((0.5 - (raw - 0.5).abs()) * 200.0),
            rationale: "conflicting trend/volatility factors".to_string(),
        };
    };

    let clauses = explain(features);
    let detail = if clauses.is_empty() {
        "neutral factors".to_string()
    } else {
        clauses.join(", ")
    };

    TrendVerdict {
        kind,
        confidence: round1(confidence),
        rationale: format!("{} ({})", tag, detail),
    }
}

/// Produces trend verdicts for a currency from recent history and a
/// classifier artifact.
pub struct TrendClassifier {
    loader: Arc<RateSeriesLoader>,
    model: Arc<dyn ModelLoader>,
    lookback_days: i64,
}

impl TrendClassifier {
    pub fn new(loader: Arc<RateSeriesLoader>, model: Arc<dyn ModelLoader>, lookback_days: i64) -> Self {
        Self {
            loader,
            model,
            lookback_days,
        }
    }

    /// Verdict for the next business day after today.
    pub async fn predict(&self, currency: &str) -> Result<Option<TrendVerdict>> {
        self.predict_as_of(currency, Local::now().date_naive()).await
    }

    /// Verdict using history up to and including `as_of`.
    ///
    /// `Ok(None)` means no verdict: the model is unavailable, the history is
    /// too short, or the model answered outside its contract.
    pub async fn predict_as_of(
        &self,
        currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<TrendVerdict>> {
        // Loaded fresh on every call.
        let model = match self.model.load() {
            Ok(model) => model,
            Err(e) => {
                warn!("No verdict for {}: {}", currency, e);
                return Ok(None);
            }
        };

        let series = self.loader.recent(currency, as_of, self.lookback_days).await?;
        if series.len() < MIN_OBSERVATIONS {
            let reason = FxError::InsufficientHistory {
                required: MIN_OBSERVATIONS,
                available: series.len(),
            };
            info!("No verdict for {}: {}", series.currency, reason);
            return Ok(None);
        }

        let Some(features) = build_inference_vector(&series.rates(), DEFAULT_WINDOW) else {
            return Ok(None);
        };

        let Some(output) = model_output(model.as_ref(), &features) else {
            warn!("Classifier answered outside its contract for {}", series.currency);
            return Ok(None);
        };

        let verdict = interpret(output, &features);
        info!(
            "{} verdict: {} ({:.1}%)",
            series.currency, verdict.kind, verdict.confidence
        );
        Ok(Some(verdict))
    }
}
