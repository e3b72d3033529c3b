// =============================================================================
// Coin Registry - display name <-> market-data id table
// =============================================================================
//
// Built once from configuration and never mutated. Display names and ids are
// both unique keys; a repeated entry is rejected at construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoinTableError;

/// One selectable coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinEntry {
    /// Human-facing name, e.g. "Bitcoin".
    pub display_name: String,
    /// Market-data API id, e.g. "bitcoin".
    pub id: String,
}

impl CoinEntry {
    pub fn new(display_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            id: id.into(),
        }
    }
}

/// Default selection offered when configuration does not override it.
pub fn default_coins() -> Vec<CoinEntry> {
    vec![
        CoinEntry::new("Bitcoin", "bitcoin"),
        CoinEntry::new("Ethereum", "ethereum"),
        CoinEntry::new("BNB", "binancecoin"),
        CoinEntry::new("Solana", "solana"),
        CoinEntry::new("XRP", "ripple"),
    ]
}

/// Immutable, ordered coin table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CoinRegistry {
    entries: Vec<CoinEntry>,
}

impl CoinRegistry {
    /// Build a registry, rejecting duplicate display names (case-insensitive)
    /// and duplicate ids.
    pub fn new(entries: Vec<CoinEntry>) -> Result<Self, CoinTableError> {
        let mut names = HashSet::with_capacity(entries.len());
        let mut ids = HashSet::with_capacity(entries.len());

        for entry in &entries {
            if !names.insert(entry.display_name.to_lowercase()) {
                return Err(CoinTableError::Duplicate(entry.display_name.clone()));
            }
            if !ids.insert(entry.id.as_str()) {
                return Err(CoinTableError::Duplicate(entry.id.clone()));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CoinEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find by API id (exact) or display name (case-insensitive).
    pub fn resolve(&self, key: &str) -> Option<&CoinEntry> {
        self.entries
            .iter()
            .find(|e| e.id == key)
            .or_else(|| self.entries.iter().find(|e| e.display_name.eq_ignore_ascii_case(key)))
    }
}

impl Default for CoinRegistry {
    fn default() -> Self {
        Self {
            entries: default_coins(),
        }
    }
}
