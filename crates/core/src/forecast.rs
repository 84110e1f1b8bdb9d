//! Moving-average volume projections.
//!
//! This is explicitly a heuristic, not a statistical model: each forecast
//! step averages the trailing three known-or-forecast values, applies a
//! fixed +5% growth multiplier, and rounds to the nearest integer. The
//! rounded value feeds the next step's trailing window.
//!
//! Confidence starts at 0.85 and drops by 0.10 per additional step ahead.
//! No floor is applied; from the ninth step onward confidence goes negative
//! (see the test documenting this).

use serde::Serialize;

/// Trailing window size for the moving average.
const WINDOW: usize = 3;

/// Fixed growth multiplier applied to each step.
const GROWTH_FACTOR: f64 = 1.05;

/// Confidence of the first forecast step.
const BASE_CONFIDENCE: f64 = 0.85;

/// Confidence decrease per additional step ahead.
const CONFIDENCE_STEP: f64 = 0.10;

/// A single forecast step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// How many periods ahead this step is (1-based).
    pub period: usize,
    /// Projected volume, rounded to the nearest integer.
    pub value: f64,
    /// Heuristic confidence; decreases with horizon, unclamped.
    pub confidence: f64,
}

/// Projects `periods` steps forward from a chronological volume history.
///
/// The window uses as many values as exist when the history is shorter than
/// three entries. An empty history produces an empty forecast; callers
/// should treat that as a validation failure. `periods` comes from request
/// input, so callers must bound it; nothing here pre-allocates from it.
#[must_use]
pub fn moving_average_forecast(history: &[f64], periods: usize) -> Vec<ForecastPoint> {
    if history.is_empty() {
        return Vec::new();
    }

    let mut series: Vec<f64> = history.to_vec();
    let mut forecast = Vec::new();

    for step in 1..=periods {
        let window = &series[series.len().saturating_sub(WINDOW)..];
        #[allow(clippy::cast_precision_loss)]
        let average = window.iter().sum::<f64>() / window.len() as f64;
        let value = (average * GROWTH_FACTOR).round();

        #[allow(clippy::cast_precision_loss)]
        let confidence = BASE_CONFIDENCE - CONFIDENCE_STEP * (step - 1) as f64;

        series.push(value);
        forecast.push(ForecastPoint {
            period: step,
            value,
            confidence,
        });
    }

    forecast
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_two_step_forecast() {
        let forecast = moving_average_forecast(&[100.0, 110.0, 120.0], 2);
        assert_eq!(forecast.len(), 2);

        // Step 1: mean(100, 110, 120) = 110, * 1.05 = 115.5, rounds to 116.
        assert_eq!(forecast[0].period, 1);
        assert_close(forecast[0].value, 116.0);
        assert_close(forecast[0].confidence, 0.85);

        // Step 2 trails (110, 120, 116): mean = 115.33.., * 1.05 = 121.1,
        // rounds to 121.
        assert_eq!(forecast[1].period, 2);
        assert_close(forecast[1].value, 121.0);
        assert_close(forecast[1].confidence, 0.75);
    }

    #[test]
    fn test_short_history_uses_available_values() {
        let forecast = moving_average_forecast(&[200.0], 1);
        // mean(200) * 1.05 = 210.
        assert_close(forecast[0].value, 210.0);

        let forecast = moving_average_forecast(&[100.0, 200.0], 1);
        // mean(100, 200) * 1.05 = 157.5, rounds to 158.
        assert_close(forecast[0].value, 158.0);
    }

    #[test]
    fn test_empty_history_yields_empty_forecast() {
        assert!(moving_average_forecast(&[], 5).is_empty());
    }

    #[test]
    fn test_confidence_goes_negative_at_far_horizons() {
        // Documented behavior: no clamp. Step 9 hits 0.85 - 0.8 = 0.05,
        // step 10 goes to -0.05.
        let forecast = moving_average_forecast(&[100.0, 100.0, 100.0], 10);
        assert_close(forecast[8].confidence, 0.05);
        assert_close(forecast[9].confidence, -0.05);
    }

    #[test]
    fn test_forecast_length_matches_requested_periods() {
        let forecast = moving_average_forecast(&[10.0, 20.0, 30.0], 6);
        assert_eq!(forecast.len(), 6);
        for (i, point) in forecast.iter().enumerate() {
            assert_eq!(point.period, i + 1);
        }
    }
}
