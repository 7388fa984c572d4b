use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coarse bucket for short-term volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

impl VolatilityLevel {
    /// Bucket a volatility figure expressed in percent.
    pub fn from_pct(volatility_pct: f64) -> Self {
        if volatility_pct < 0.5 {
            VolatilityLevel::Low
        } else if volatility_pct < 1.2 {
            VolatilityLevel::Medium
        } else {
            VolatilityLevel::High
        }
    }
}

/// Reading of the momentum oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumStatus {
    Overbought,
    Oversold,
    Neutral,
}

impl MomentumStatus {
    pub fn from_value(value: f64) -> Self {
        if value > 70.0 {
            MomentumStatus::Overbought
        } else if value < 30.0 {
            MomentumStatus::Oversold
        } else {
            MomentumStatus::Neutral
        }
    }
}

/// Short-horizon statistics for one currency as of its latest observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub currency: String,
    /// Date of the latest observation.
    pub date: NaiveDate,
    /// Latest per-unit rate.
    pub rate: f64,
    pub delta_1d_pct: f64,
    pub delta_3d_pct: f64,
    pub delta_7d_pct: f64,
    /// Std of up to the last 7 relative changes, in percent.
    pub volatility_7d_pct: f64,
    pub volatility_level: VolatilityLevel,
    /// Oscillator over the last 6 observations (period 5).
    pub momentum: f64,
    pub momentum_status: MomentumStatus,
}
