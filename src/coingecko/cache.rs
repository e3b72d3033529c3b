// =============================================================================
// Response Cache - TTL reuse of fetched market data
// =============================================================================
//
// The analysis core is a pure function of the raw streams, so reusing a fetch
// for the TTL window gives callers identical results without hitting the API
// again. Expired entries are replaced on the next fetch.
// =============================================================================

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use super::client::{CoinGeckoClient, CoinSnapshot, FetchError};
use crate::market_data::RawMarketChart;

// ---------------------------------------------------------------------------
// TtlCache
// ---------------------------------------------------------------------------

/// Thread-safe map whose entries expire `ttl` after insertion.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, (Instant, Arc<V>)>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return the cached value if it is still fresh.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let map = self.entries.read();
        map.get(key)
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, v)| Arc::clone(v))
    }

    /// Store `value`, replacing any previous entry for `key`.
    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries
            .write()
            .insert(key, (Instant::now(), Arc::clone(&value)));
        value
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.write().retain(|_, (at, _)| at.elapsed() < ttl);
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// ---------------------------------------------------------------------------
// CachedCoinGecko
// ---------------------------------------------------------------------------

/// CoinGecko client fronted by per-endpoint TTL caches.
pub struct CachedCoinGecko {
    client: CoinGeckoClient,
    charts: TtlCache<(String, u32), RawMarketChart>,
    snapshots: TtlCache<String, CoinSnapshot>,
}

impl CachedCoinGecko {
    pub fn new(client: CoinGeckoClient, ttl: Duration) -> Self {
        Self {
            client,
            charts: TtlCache::new(ttl),
            snapshots: TtlCache::new(ttl),
        }
    }

    /// Market chart for `(coin_id, days)`, fetched at most once per TTL.
    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<Arc<RawMarketChart>, FetchError> {
        let key = (coin_id.to_string(), days);
        if let Some(hit) = self.charts.get(&key) {
            debug!(coin_id, days, "market chart cache hit");
            return Ok(hit);
        }

        let chart = self.client.market_chart(coin_id, days).await?;
        self.charts.purge_expired();
        Ok(self.charts.insert(key, chart))
    }

    /// Coin snapshot for `coin_id`, fetched at most once per TTL.
    pub async fn coin_snapshot(&self, coin_id: &str) -> Result<Arc<CoinSnapshot>, FetchError> {
        let key = coin_id.to_string();
        if let Some(hit) = self.snapshots.get(&key) {
            debug!(coin_id, "coin snapshot cache hit");
            return Ok(hit);
        }

        let snapshot = self.client.coin_snapshot(coin_id).await?;
        self.snapshots.purge_expired();
        Ok(self.snapshots.insert(key, snapshot))
    }

    /// Pre-populate the chart cache, e.g. with data fetched elsewhere.
    pub fn seed_market_chart(&self, coin_id: &str, days: u32, chart: RawMarketChart) {
        self.charts.insert((coin_id.to_string(), days), chart);
    }

    /// Pre-populate the snapshot cache.
    pub fn seed_coin_snapshot(&self, coin_id: &str, snapshot: CoinSnapshot) {
        self.snapshots.insert(coin_id.to_string(), snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::RawPoint;

    #[test]
    fn fresh_entry_is_returned() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(300));
        cache.insert("bitcoin", 7);
        assert_eq!(cache.get(&"bitcoin").as_deref(), Some(&7));
        assert!(cache.get(&"ethereum").is_none());
    }

    #[test]
    fn zero_ttl_never_hits() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::ZERO);
        cache.insert("bitcoin", 7);
        assert!(cache.get(&"bitcoin").is_none());
        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_replaces() {
        let cache: TtlCache<u8, &str> = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, "old");
        cache.insert(1, "new");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1).as_deref(), Some(&"new"));
    }

    #[tokio::test]
    async fn seeded_chart_is_served_without_fetch() {
        // Unroutable base URL: any real fetch would fail.
        let client = CoinGeckoClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let source = CachedCoinGecko::new(client, Duration::from_secs(300));
        let chart = RawMarketChart {
            prices: vec![RawPoint::new(1, 1.0)],
            ..RawMarketChart::default()
        };
        source.seed_market_chart("bitcoin", 30, chart.clone());

        let got = source.market_chart("bitcoin", 30).await.unwrap();
        assert_eq!(*got, chart);
        assert!(source.market_chart("bitcoin", 31).await.is_err());
    }
}
