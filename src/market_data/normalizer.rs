// =============================================================================
// Series Normalizer - join raw streams into one timestamped series
// =============================================================================
//
// The market-data API returns price, volume and market cap as three separate
// `[epoch_ms, value]` arrays that do not always line up. Only timestamps present
// in all three survive; the first occurrence of a repeated timestamp wins.
// =============================================================================

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::resample::{resample, ResamplePolicy};
use super::series::{volume_percent_mc, NormalizedRow, NormalizedSeries, RawMarketChart, RawPoint};
use crate::error::{AnalysisError, Result};

/// Join the three raw streams, derive the volume/market-cap ratio and apply
/// the resample policy.
///
/// # Errors
/// [`AnalysisError::DataGap`] when no timestamp is shared by all three
/// streams.
pub fn normalize(
    prices: &[RawPoint],
    volumes: &[RawPoint],
    market_caps: &[RawPoint],
    policy: &ResamplePolicy,
) -> Result<NormalizedSeries> {
    let rows = join_streams(prices, volumes, market_caps);
    if rows.is_empty() {
        debug!(
            prices = prices.len(),
            volumes = volumes.len(),
            market_caps = market_caps.len(),
            "join produced no rows"
        );
        return Err(AnalysisError::DataGap);
    }

    debug!(rows = rows.len(), "raw streams joined");
    let joined = NormalizedSeries::from_sorted(rows);
    Ok(resample(&joined, policy))
}

/// [`normalize`] over a fetched market chart.
pub fn normalize_chart(chart: &RawMarketChart, policy: &ResamplePolicy) -> Result<NormalizedSeries> {
    normalize(&chart.prices, &chart.total_volumes, &chart.market_caps, policy)
}

fn first_by_timestamp(points: &[RawPoint]) -> HashMap<i64, f64> {
    let mut map = HashMap::with_capacity(points.len());
    for p in points {
        map.entry(p.epoch_ms).or_insert(p.value);
    }
    map
}

fn join_streams(
    prices: &[RawPoint],
    volumes: &[RawPoint],
    market_caps: &[RawPoint],
) -> Vec<NormalizedRow> {
    let volumes = first_by_timestamp(volumes);
    let market_caps = first_by_timestamp(market_caps);

    let mut seen = HashSet::with_capacity(prices.len());
    let mut rows = Vec::with_capacity(prices.len().min(volumes.len()).min(market_caps.len()));

    for p in prices {
        if !seen.insert(p.epoch_ms) {
            continue;
        }
        let (Some(&volume), Some(&market_cap)) =
            (volumes.get(&p.epoch_ms), market_caps.get(&p.epoch_ms))
        else {
            continue;
        };
        let Some(timestamp) = DateTime::<Utc>::from_timestamp_millis(p.epoch_ms) else {
            debug!(epoch_ms = p.epoch_ms, "timestamp out of range, row dropped");
            continue;
        };

        rows.push(NormalizedRow {
            timestamp,
            price: Some(p.value),
            volume,
            market_cap: Some(market_cap),
            volume_percent_mc: volume_percent_mc(volume, market_cap),
        });
    }

    rows.sort_by_key(|r| r.timestamp);
    rows
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Aggregation;

    const HOUR_MS: i64 = 3_600_000;
    const T0: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

    fn stream(ts: &[i64], value: impl Fn(usize) -> f64) -> Vec<RawPoint> {
        ts.iter()
            .enumerate()
            .map(|(i, &t)| RawPoint::new(t, value(i)))
            .collect()
    }

    fn policy() -> ResamplePolicy {
        ResamplePolicy::new(1000, Aggregation::Mean, 30)
    }

    // ---- join ------------------------------------------------------------

    #[test]
    fn join_keeps_only_shared_timestamps() {
        let prices = stream(&[T0, T0 + HOUR_MS, T0 + 2 * HOUR_MS, T0 + 3 * HOUR_MS], |i| 100.0 + i as f64);
        let volumes = stream(&[T0, T0 + 2 * HOUR_MS, T0 + 3 * HOUR_MS], |_| 50.0);
        let caps = stream(&[T0, T0 + HOUR_MS, T0 + 3 * HOUR_MS], |_| 1000.0);

        let series = normalize(&prices, &volumes, &caps, &policy()).unwrap();
        assert!(series.len() <= prices.len().min(volumes.len()).min(caps.len()));

        let kept: Vec<i64> = series.rows().iter().map(|r| r.timestamp.timestamp_millis()).collect();
        assert_eq!(kept, vec![T0, T0 + 3 * HOUR_MS]);
        for t in kept {
            assert!(prices.iter().any(|p| p.epoch_ms == t));
            assert!(volumes.iter().any(|p| p.epoch_ms == t));
            assert!(caps.iter().any(|p| p.epoch_ms == t));
        }
    }

    #[test]
    fn join_orders_and_dedups() {
        let prices = vec![
            RawPoint::new(T0 + HOUR_MS, 2.0),
            RawPoint::new(T0, 1.0),
            RawPoint::new(T0, 9.0),
        ];
        let volumes = stream(&[T0, T0 + HOUR_MS], |_| 1.0);
        let caps = stream(&[T0, T0 + HOUR_MS], |_| 10.0);

        let series = normalize(&prices, &volumes, &caps, &policy()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.prices(), vec![Some(1.0), Some(2.0)]);
        assert!(series.rows().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn empty_intersection_is_data_gap() {
        let prices = stream(&[T0], |_| 1.0);
        let volumes = stream(&[T0 + HOUR_MS], |_| 1.0);
        let caps = stream(&[T0], |_| 1.0);
        assert_eq!(normalize(&prices, &volumes, &caps, &policy()), Err(AnalysisError::DataGap));
        assert_eq!(normalize(&[], &[], &[], &policy()), Err(AnalysisError::DataGap));
    }

    // ---- ratio -----------------------------------------------------------

    #[test]
    fn ratio_matches_definition() {
        let ts = [T0, T0 + HOUR_MS, T0 + 2 * HOUR_MS];
        let prices = stream(&ts, |_| 1.0);
        let volumes = stream(&ts, |i| 10.0 * (i + 1) as f64);
        let caps = stream(&ts, |i| if i == 1 { 0.0 } else { 400.0 });

        let series = normalize(&prices, &volumes, &caps, &policy()).unwrap();
        for row in series.rows() {
            let cap = row.market_cap.unwrap();
            if cap == 0.0 {
                assert!(row.volume_percent_mc.is_none());
            } else {
                let expected = row.volume / cap * 100.0;
                assert!((row.volume_percent_mc.unwrap() - expected).abs() < 1e-9);
            }
        }
    }

    // ---- resample through normalize -------------------------------------

    #[test]
    fn dense_long_range_is_daily() {
        let ts: Vec<i64> = (0..24 * 50).map(|i| T0 + i as i64 * HOUR_MS).collect();
        let prices = stream(&ts, |i| i as f64);
        let volumes = stream(&ts, |_| 1.0);
        let caps = stream(&ts, |_| 1.0);

        let series = normalize(&prices, &volumes, &caps, &ResamplePolicy::new(1000, Aggregation::Mean, 50)).unwrap();
        assert_eq!(series.len(), 50);
    }

    #[test]
    fn renormalizing_below_threshold_is_noop() {
        let ts: Vec<i64> = (0..200).map(|i| T0 + i as i64 * HOUR_MS).collect();
        let prices = stream(&ts, |i| 100.0 + (i as f64).sin());
        let volumes = stream(&ts, |i| 5.0 + i as f64);
        let caps = stream(&ts, |i| if i % 17 == 0 { 0.0 } else { 1e6 });

        let first = normalize(&prices, &volumes, &caps, &policy()).unwrap();

        let back = |f: fn(&NormalizedRow) -> f64| -> Vec<RawPoint> {
            first
                .rows()
                .iter()
                .map(|r| RawPoint::new(r.timestamp.timestamp_millis(), f(r)))
                .collect()
        };
        let second = normalize(
            &back(|r| r.price.unwrap()),
            &back(|r| r.volume),
            &back(|r| r.market_cap.unwrap()),
            &policy(),
        )
        .unwrap();

        assert_eq!(first, second);
    }
}
