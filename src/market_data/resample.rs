// =============================================================================
// Resampling - density control for long or fine-grained ranges
// =============================================================================
//
// Two policies, chosen by the requested range once the row count exceeds the
// threshold:
//
//   range_days > 7   -> one bar per UTC calendar day (aggregated)
//   range_days <= 7  -> keep every k-th row, k = rows / threshold + 1
//
// Daily bars cover every calendar day between the first and last sample. A
// day without samples keeps zero volume and a missing price, market cap and
// ratio. Series at or below the threshold pass through untouched.
// =============================================================================

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::series::{NormalizedRow, NormalizedSeries};
use crate::types::Aggregation;

/// Ranges longer than this many days are aggregated rather than strided.
pub const STRIDE_MAX_RANGE_DAYS: u32 = 7;

/// How a normalized series is thinned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResamplePolicy {
    /// Maximum row count kept as-is.
    pub threshold: usize,
    /// Aggregation set for daily bars.
    pub aggregation: Aggregation,
    /// Length of the requested range in days.
    pub range_days: u32,
}

impl ResamplePolicy {
    pub fn new(threshold: usize, aggregation: Aggregation, range_days: u32) -> Self {
        Self {
            threshold,
            aggregation,
            range_days,
        }
    }
}

/// Apply `policy` to `series`, returning a new series.
pub fn resample(series: &NormalizedSeries, policy: &ResamplePolicy) -> NormalizedSeries {
    let rows = series.rows();
    if rows.len() <= policy.threshold {
        return series.clone();
    }

    if policy.range_days > STRIDE_MAX_RANGE_DAYS {
        let daily = aggregate_daily(rows, policy.aggregation);
        debug!(
            rows_in = rows.len(),
            rows_out = daily.len(),
            aggregation = ?policy.aggregation,
            "resampled to daily bars"
        );
        NormalizedSeries::from_sorted(daily)
    } else {
        // A zero threshold keeps only the first row.
        let k = match policy.threshold {
            0 => rows.len(),
            t => rows.len() / t + 1,
        };
        let strided: Vec<NormalizedRow> = rows.iter().step_by(k).cloned().collect();
        debug!(rows_in = rows.len(), rows_out = strided.len(), stride = k, "resampled by stride");
        NormalizedSeries::from_sorted(strided)
    }
}

// ---------------------------------------------------------------------------
// Daily aggregation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DayBucket {
    price_sum: f64,
    price_count: usize,
    price_last: Option<f64>,
    volume_sum: f64,
    market_cap_sum: f64,
    market_cap_count: usize,
    market_cap_last: Option<f64>,
    pct_sum: f64,
    pct_count: usize,
}

impl DayBucket {
    fn push(&mut self, row: &NormalizedRow) {
        if let Some(price) = row.price {
            self.price_sum += price;
            self.price_count += 1;
            self.price_last = Some(price);
        }
        self.volume_sum += row.volume;
        if let Some(cap) = row.market_cap {
            self.market_cap_sum += cap;
            self.market_cap_count += 1;
            self.market_cap_last = Some(cap);
        }
        if let Some(pct) = row.volume_percent_mc {
            self.pct_sum += pct;
            self.pct_count += 1;
        }
    }

    /// An empty bucket yields zero volume and missing everything else.
    fn finish(&self, day: NaiveDate, aggregation: Aggregation) -> NormalizedRow {
        let (price, market_cap) = match aggregation {
            Aggregation::Mean => (
                mean(self.price_sum, self.price_count),
                mean(self.market_cap_sum, self.market_cap_count),
            ),
            Aggregation::Last => (self.price_last, self.market_cap_last),
        };

        NormalizedRow {
            timestamp: day.and_time(NaiveTime::MIN).and_utc(),
            price,
            volume: self.volume_sum,
            market_cap,
            volume_percent_mc: mean(self.pct_sum, self.pct_count),
        }
    }
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Collapse rows into one bar per UTC calendar day from the first sampled day
/// to the last, including days without samples.
fn aggregate_daily(rows: &[NormalizedRow], aggregation: Aggregation) -> Vec<NormalizedRow> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    for row in rows {
        buckets
            .entry(row.timestamp.date_naive())
            .or_default()
            .push(row);
    }

    let (Some((&first, _)), Some((&last, _))) = (buckets.first_key_value(), buckets.last_key_value())
    else {
        return Vec::new();
    };

    let empty = DayBucket::default();
    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| buckets.get(&day).unwrap_or(&empty).finish(day, aggregation))
        .collect()
}
