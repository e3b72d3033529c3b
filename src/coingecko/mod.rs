// =============================================================================
// CoinGecko market-data collaborator
// =============================================================================

pub mod cache;
pub mod client;

pub use cache::{CachedCoinGecko, TtlCache};
pub use client::{CoinGeckoClient, CoinSnapshot, FetchError};
