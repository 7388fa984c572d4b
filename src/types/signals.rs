use serde::{Deserialize, Serialize};

/// Direction of a trend verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendKind {
    Up,
    Down,
    Inconclusive,
}

impl TrendKind {
    /// Map a classifier class label (0 = down, 1 = up).
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(TrendKind::Down),
            1 => Some(TrendKind::Up),
            _ => None,
        }
    }

    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            TrendKind::Up => "up",
            TrendKind::Down => "down",
            TrendKind::Inconclusive => "inconclusive",
        }
    }
}

impl std::fmt::Display for TrendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Interpreted classifier output for one currency.
///
/// Every verdict has the same shape; callers branch on `kind` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendVerdict {
    pub kind: TrendKind,
    /// Display confidence, 0-100, one decimal place.
    pub confidence: f64,
    pub rationale: String,
}

/// Raw classifier answer for a single feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    /// Predicted class.
    pub class: TrendKind,
    /// Calibrated probability of the predicted class.
    pub raw_confidence: f64,
}

/// Heuristic advisory raised independently of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    HighVolatility,
    LowVolatility,
    SharpRise,
    SharpDrop,
    SustainedRise,
    SustainedDecline,
    Neutral,
}

impl Advisory {
    /// Advisory text shown to the reader.
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::HighVolatility => "High volatility: sharp moves are possible.",
            Advisory::LowVolatility => "Low volatility: the market is range-bound.",
            Advisory::SharpRise => "Sharp rise over the day: a pullback is possible.",
            Advisory::SharpDrop => "Sharp drop over the day: a rebound is possible.",
            Advisory::SustainedRise => "Sustained rise over the week: the trend is strong.",
            Advisory::SustainedDecline => "Sustained decline over the week: the trend is weak.",
            Advisory::Neutral => {
                "The market is in a neutral phase. Watch momentum and volatility."
            }
        }
    }
}

/// Metrics the advisory rules are evaluated on, all in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryMetrics {
    pub volatility_pct: f64,
    pub delta_1d_pct: f64,
    pub delta_7d_pct: f64,
}

/// Advisory lines for a currency with the metrics that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryReport {
    pub currency: String,
    pub metrics: AdvisoryMetrics,
    pub advisories: Vec<Advisory>,
}

impl AdvisoryReport {
    /// Advisory messages, one per line, in rule order.
    pub fn lines(&self) -> Vec<&'static str> {
        self.advisories.iter().map(|a| a.message()).collect()
    }
}
