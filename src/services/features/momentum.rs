//! Momentum oscillator (RSI-like).

/// Neutral reading returned when there is not enough history.
pub const NEUTRAL_MOMENTUM: f64 = 50.0;

/// Period used by the feature pipeline.
pub const DEFAULT_MOMENTUM_PERIOD: usize = 5;

/// Momentum oscillator over the last `period + 1` rates.
///
/// Compares the average gain with the average loss of the last `period`
/// steps. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// Uses simple averages (no Wilder smoothing). With fewer than
/// `period + 1` rates, or a zero period, returns the neutral 50.0.
pub fn momentum_oscillator(rates: &[f64], period: usize) -> f64 {
    if period == 0 || rates.len() < period + 1 {
        return NEUTRAL_MOMENTUM;
    }

    let window = &rates[rates.len() - (period + 1)..];
    let mut gains = 0.0;
    let mut losses = 0.0;

    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else if change < 0.0 {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }
    if avg_gain == 0.0 {
        return 0.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_is_neutral() {
        assert_eq!(momentum_oscillator(&[], 5), 50.0);
        assert_eq!(momentum_oscillator(&[1.0, 2.0, 3.0, 4.0, 5.0], 5), 50.0);
    }

    #[test]
    fn test_zero_period_is_neutral() {
        assert_eq!(momentum_oscillator(&[1.0, 2.0], 0), 50.0);
    }

    #[test]
    fn test_only_gains() {
        let rates = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(momentum_oscillator(&rates, 5), 100.0);
    }

    #[test]
    fn test_only_losses() {
        let rates = [6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert_eq!(momentum_oscillator(&rates, 5), 0.0);
    }

    #[test]
    fn test_flat_series_reads_as_maximal() {
        // No losses is checked before no gains.
        let rates = [2.0; 6];
        assert_eq!(momentum_oscillator(&rates, 5), 100.0);
    }

    #[test]
    fn test_mixed_changes() {
        // gains 2 + 1 = 3, losses 1 + 1 = 2 -> rs 1.5 -> 60
        let rates = [10.0, 12.0, 11.0, 12.0, 11.0];
        let value = momentum_oscillator(&rates, 4);
        assert!((value - 60.0).abs() < 1e-9, "got {}", value);
    }

    #[test]
    fn test_uses_only_last_window() {
        // A big early drop outside the window must not count.
        let rates = [100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(momentum_oscillator(&rates, 5), 100.0);
    }

    #[test]
    fn test_value_range() {
        let rates = [1.0, 1.3, 0.9, 1.7, 1.2, 1.25, 0.8, 1.9];
        for period in 1..rates.len() {
            let v = momentum_oscillator(&rates, period);
            assert!((0.0..=100.0).contains(&v), "period {} gave {}", period, v);
        }
    }
}
