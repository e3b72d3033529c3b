// =============================================================================
// Exponentially Weighted Moving Average (EWMA)
// =============================================================================
//
// Recursive, non-adjusted form:
//
//   alpha  = 2 / (span + 1)          (span convention)
//   EWMA_0 = x_0
//   EWMA_t = alpha * x_t + (1 - alpha) * EWMA_{t-1}
//
// The first observation seeds the series, so the output has exactly one value
// per input and is defined from the first sample onward. Over a series with
// gaps a missing input repeats the previous output.
// =============================================================================

/// Smoothing factor for a given span.
///
/// Returns `None` for `span == 0`, which has no meaningful decay.
pub fn span_alpha(span: usize) -> Option<f64> {
    if span == 0 {
        return None;
    }
    Some(2.0 / (span as f64 + 1.0))
}

/// EWMA of `values` with the span convention. Empty when `values` is empty or
/// `span == 0`.
pub fn calculate_ewma(values: &[f64], span: usize) -> Vec<f64> {
    match span_alpha(span) {
        Some(alpha) => ewma_with_alpha(values, alpha),
        None => Vec::new(),
    }
}

/// EWMA of `values` with an explicit smoothing factor in `(0, 1]`.
pub fn ewma_with_alpha(values: &[f64], alpha: f64) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(values.len());
    result.push(first);

    let mut prev = first;
    for &x in rest {
        let next = alpha * x + (1.0 - alpha) * prev;
        result.push(next);
        prev = next;
    }

    result
}

/// Span-convention EWMA over values that may be missing.
///
/// Output stays missing until the first observed value seeds it; afterwards a
/// missing input carries the previous output forward. Empty for `span == 0`.
pub fn ewma_over_gaps(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let Some(alpha) = span_alpha(span) else {
        return Vec::new();
    };

    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|&x| {
            prev = match (prev, x) {
                (None, x) => x,
                (Some(p), Some(x)) => Some(alpha * x + (1.0 - alpha) * p),
                (Some(p), None) => Some(p),
            };
            prev
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ewma_empty_input() {
        assert!(calculate_ewma(&[], 5).is_empty());
    }

    #[test]
    fn ewma_span_zero() {
        assert!(calculate_ewma(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ewma_seeds_with_first_value() {
        let ewma = calculate_ewma(&[7.0], 12);
        assert_eq!(ewma, vec![7.0]);
    }

    #[test]
    fn ewma_known_values() {
        // span 3 => alpha 0.5
        let ewma = calculate_ewma(&[2.0, 4.0, 8.0, 0.0], 3);
        let expected = [2.0, 3.0, 5.5, 2.75];
        assert_eq!(ewma.len(), expected.len());
        for (a, b) in ewma.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ewma_of_constant_is_constant() {
        let ewma = calculate_ewma(&[100.0; 50], 26);
        assert!(ewma.iter().all(|&v| (v - 100.0).abs() < 1e-12));
    }

    #[test]
    fn span_one_tracks_input() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(calculate_ewma(&values, 1), values.to_vec());
    }

    #[test]
    fn gaps_carry_previous_value() {
        // span 3 => alpha 0.5
        let ewma = ewma_over_gaps(&[None, Some(2.0), None, Some(8.0)], 3);
        assert_eq!(ewma, vec![None, Some(2.0), Some(2.0), Some(5.0)]);
    }

    #[test]
    fn gapless_input_matches_plain_ewma() {
        let values = [2.0, 4.0, 8.0, 0.0];
        let observed: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        let plain: Vec<Option<f64>> = calculate_ewma(&values, 3).into_iter().map(Some).collect();
        assert_eq!(ewma_over_gaps(&observed, 3), plain);
    }
}
