//! Control chart factor table.
//!
//! Constants for X-bar-R charts at the subgroup sizes the classifier can
//! produce. Values are the two-decimal figures used on paper SPC forms
//! (d2 keeps three decimals). Row `n = 1` holds the individuals-chart
//! constants, i.e. the n = 2 moving-range figures with E2 in the A2 column.
//!
//! Sizes 6, 8, 9 and anything above 10 are not tabulated; asking for them
//! is an error rather than a silent NaN.
//!
//! # Reference
//!
//! ASTM E2587 — Standard Practice for Use of Control Charts in Statistical
//! Process Control, Table 1.

use serde::Serialize;

use crate::error::SpcError;

/// Constants for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartFactors {
    /// Subgroup size these constants apply to.
    pub n: usize,
    /// X-bar limit factor: `CL ± A2 * R-bar`.
    pub a2: f64,
    /// Mean of the relative range: `sigma-hat = R-bar / d2`.
    pub d2: f64,
    /// R chart lower limit factor: `LCL = D3 * R-bar`.
    pub d3: f64,
    /// R chart upper limit factor: `UCL = D4 * R-bar`.
    pub d4: f64,
}

const fn row(n: usize, a2: f64, d2: f64, d3: f64, d4: f64) -> ChartFactors {
    ChartFactors { n, a2, d2, d3, d4 }
}

const TABLE: [ChartFactors; 7] = [
    row(1, 2.66, 1.128, 0.0, 3.27),
    row(2, 1.88, 1.128, 0.0, 3.27),
    row(3, 1.02, 1.693, 0.0, 2.58),
    row(4, 0.73, 2.059, 0.0, 2.28),
    row(5, 0.58, 2.326, 0.0, 2.11),
    row(7, 0.42, 2.704, 0.08, 1.92),
    row(10, 0.31, 3.078, 0.22, 1.78),
];

/// Subgroup sizes with tabulated constants.
pub const SUPPORTED_SIZES: [usize; 7] = [1, 2, 3, 4, 5, 7, 10];

/// Look up all constants for subgroup size `n`.
///
/// # Errors
///
/// [`SpcError::UnsupportedSubgroupSize`] if `n` is not in [`SUPPORTED_SIZES`].
///
/// # Examples
///
/// ```
/// use u_spc::spc::chart_factors;
///
/// let f = chart_factors(3).unwrap();
/// assert_eq!(f.a2, 1.02);
/// assert!(chart_factors(6).is_err());
/// ```
pub fn chart_factors(n: usize) -> Result<ChartFactors, SpcError> {
    TABLE
        .iter()
        .find(|f| f.n == n)
        .copied()
        .ok_or(SpcError::UnsupportedSubgroupSize(n))
}

/// Estimate the process standard deviation from the average range.
pub fn sigma_estimate(r_bar: f64, n: usize) -> Result<f64, SpcError> {
    Ok(r_bar / chart_factors(n)?.d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_supported_sizes() {
        let sizes: Vec<usize> = TABLE.iter().map(|f| f.n).collect();
        assert_eq!(sizes, SUPPORTED_SIZES);
    }

    #[test]
    fn n3_factors() {
        let f = chart_factors(3).unwrap();
        assert_eq!(f.a2, 1.02);
        assert_eq!(f.d3, 0.0);
        assert_eq!(f.d4, 2.58);
    }

    #[test]
    fn gaps_are_errors() {
        for n in [0, 6, 8, 9, 11, 25] {
            assert_eq!(chart_factors(n), Err(SpcError::UnsupportedSubgroupSize(n)));
        }
    }

    #[test]
    fn d3_below_d4_everywhere() {
        for f in &TABLE {
            assert!(f.d3 < f.d4, "n={}", f.n);
            assert!(f.a2 > 0.0 && f.d2 > 0.0);
        }
    }

    #[test]
    fn a2_decreases_with_n() {
        for pair in TABLE[1..].windows(2) {
            assert!(pair[0].a2 > pair[1].a2);
        }
    }

    #[test]
    fn sigma_from_r_bar() {
        let s = sigma_estimate(2.326, 5).unwrap();
        assert!((s - 1.0).abs() < 1e-12);
        assert!(sigma_estimate(1.0, 6).is_err());
    }
}
