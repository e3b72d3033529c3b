// =============================================================================
// Price change and capital-flow proxies
// =============================================================================
//
//   price_change_t = (price_t / price_{t-1} - 1) * 100
//   inflow_t       = volume_t * price_change_t    when price_change_t > 0
//   outflow_t      = volume_t * |price_change_t|  when price_change_t < 0
//
// The first row has no previous price; a zero or missing previous price, or a
// missing current one, also leaves the change undefined. Undefined changes
// contribute no flow.

/// Period-over-period percentage change, one entry per price.
pub fn calculate_price_change(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return result;
    }

    result.push(None);
    for w in prices.windows(2) {
        let change = match (w[0], w[1]) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some((cur / prev - 1.0) * 100.0),
            _ => None,
        };
        result.push(change.filter(|c| c.is_finite()));
    }
    result
}

/// `(inflow, outflow)` for one row.
pub fn flow(volume: f64, price_change: Option<f64>) -> (f64, f64) {
    match price_change {
        Some(pc) if pc > 0.0 => (volume * pc, 0.0),
        Some(pc) if pc < 0.0 => (0.0, volume * pc.abs()),
        _ => (0.0, 0.0),
    }
}
