//! Error types for normality testing and chart construction.
//!
//! Three layers, leaves first: [`QuantileError`] for the inverse normal CDF,
//! [`NormalityError`] for the Shapiro-Wilk test, and [`SpcError`] for a
//! full chart build.

use thiserror::Error;

use crate::spc::ChartKind;

/// Invalid input to [`normal_quantile`](crate::special::normal_quantile).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuantileError {
    #[error("probability must lie in (0, 1), got {0}")]
    InvalidProbability(f64),

    #[error("standard deviation must be non-negative, got {0}")]
    NegativeSigma(f64),
}

/// Reasons the Shapiro-Wilk W statistic could not be computed.
///
/// The classifier treats every variant as "not bell-shaped".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalityError {
    #[error("sample too small: {0} values, need at least 3")]
    TooSmall(usize),

    #[error("sample too large: {0} values, at most 5000 supported")]
    TooLarge(usize),

    #[error("sample contains NaN or infinite values")]
    NonFinite,

    #[error("degenerate sample: all values effectively equal")]
    Degenerate,

    #[error("xx - xi too large: range-scaled sample is not ordered")]
    Unsorted,
}

/// Errors that abort a chart build. No partial chart is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpcError {
    #[error("no data to chart")]
    EmptyData,

    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },

    #[error("group size must be set when a chart type is forced")]
    MissingGroupSize,

    #[error("unknown chart type: {0}")]
    UnknownChartType(String),

    #[error("unsupported subgroup size: {0}")]
    UnsupportedSubgroupSize(usize),

    #[error("too few values for a subgroup of size {group_size}: {len}")]
    InsufficientData { len: usize, group_size: usize },

    #[error("no control limit computation for {0} charts")]
    NotComputed(ChartKind),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for SpcError {
    fn from(err: serde_json::Error) -> Self {
        SpcError::InvalidConfig(err.to_string())
    }
}
