// =============================================================================
// Core error types
// =============================================================================
//
// Only conditions the caller must branch on are errors. Division-by-zero cases
// inside the indicator math are defined values (missing ratio, RSI 100, zero
// volume ratio) and never surface here.

use thiserror::Error;

/// Errors produced by the analysis core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The three raw streams share no timestamp. Callers treat this as
    /// "no data for this range", not as a failure.
    #[error("no overlapping samples across price, volume and market cap streams")]
    DataGap,
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Rejections raised while building the coin table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoinTableError {
    /// A display name (case-insensitive) or id appears twice.
    #[error("duplicate coin entry: {0}")]
    Duplicate(String),
}
