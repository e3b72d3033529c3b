// =============================================================================
// Threshold Labels - per-row Buy / Sell / Hold from the RSI level alone
// =============================================================================
//
// Coarser than the crossover detector: a row is Buy whenever RSI < 30 and Sell
// whenever RSI > 70, regardless of MACD. Undefined RSI is Hold.

use crate::indicators::rsi::{OVERBOUGHT, OVERSOLD};
use crate::indicators::IndicatorSeries;
use crate::types::ThresholdLabel;

/// Label a single RSI reading.
pub fn threshold_label(rsi: Option<f64>) -> ThresholdLabel {
    match rsi {
        Some(v) if v < OVERSOLD => ThresholdLabel::Buy,
        Some(v) if v > OVERBOUGHT => ThresholdLabel::Sell,
        _ => ThresholdLabel::Hold,
    }
}

/// Label every row of `series`.
pub fn label_series(series: &IndicatorSeries) -> Vec<ThresholdLabel> {
    series.rows().iter().map(|r| threshold_label(r.rsi)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_by_level() {
        assert_eq!(threshold_label(Some(12.0)), ThresholdLabel::Buy);
        assert_eq!(threshold_label(Some(85.0)), ThresholdLabel::Sell);
        assert_eq!(threshold_label(Some(50.0)), ThresholdLabel::Hold);
    }

    #[test]
    fn boundaries_are_hold() {
        assert_eq!(threshold_label(Some(30.0)), ThresholdLabel::Hold);
        assert_eq!(threshold_label(Some(70.0)), ThresholdLabel::Hold);
    }

    #[test]
    fn undefined_is_hold() {
        assert_eq!(threshold_label(None), ThresholdLabel::Hold);
    }

    #[test]
    fn empty_series_has_no_labels() {
        assert!(label_series(&IndicatorSeries::default()).is_empty());
    }
}
