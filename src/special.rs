//! Inverse of the normal cumulative distribution function.
//!
//! # Algorithm
//!
//! Wichura's PPND16 rational approximation (Algorithm AS 241), accurate to
//! about 1 part in 10^16. Three regimes:
//!
//! - central: `|p - 0.5| <= 0.425`, rational polynomial in `r = 0.180625 - q²`
//! - moderate tail: `r = sqrt(-ln(min(p, 1-p))) <= 5`
//! - extreme tail: `r > 5`
//!
//! # Reference
//!
//! Wichura, M.J. (1988). "Algorithm AS 241: The Percentage Points of the
//! Normal Distribution", *Applied Statistics* 37(3), pp. 477-484.

use crate::error::QuantileError;

const SPLIT_CENTRAL: f64 = 0.425;
const SPLIT_TAIL: f64 = 5.0;
const CONST_CENTRAL: f64 = 0.180625;
const CONST_MODERATE: f64 = 1.6;

// Central region numerator / denominator, lowest order first.
const A: [f64; 8] = [
    3.387_132_872_796_366_608,
    133.141_667_891_784_377_45,
    1_971.590_950_306_551_442_7,
    13_731.693_765_509_461_125,
    45_921.953_931_549_871_457,
    67_265.770_927_008_700_853,
    33_430.575_583_588_128_105,
    2_509.080_928_730_122_672_7,
];
const B: [f64; 8] = [
    1.0,
    42.313_330_701_600_911_252,
    687.187_007_492_057_908_3,
    5_394.196_021_424_751_107_7,
    21_213.794_301_586_595_867,
    39_307.895_800_092_710_61,
    28_729.085_735_721_942_674,
    5_226.495_278_852_545_925,
];

// Moderate tail.
const C: [f64; 8] = [
    1.423_437_110_749_683_577_34,
    4.630_337_846_156_545_295_9,
    5.769_497_221_460_691_405_5,
    3.647_848_324_763_204_605_04,
    1.270_458_252_452_368_382_58,
    0.241_780_725_177_450_611_77,
    0.022_723_844_989_269_184_583_3,
    7.745_450_142_783_414_076_4e-4,
];
const D: [f64; 8] = [
    1.0,
    2.053_191_626_637_758_821_87,
    1.676_384_830_183_803_849_4,
    0.689_767_334_985_100_004_55,
    0.148_103_976_427_480_074_59,
    0.015_198_666_563_616_457_196_6,
    5.475_938_084_995_344_946e-4,
    1.050_750_071_644_416_843_24e-9,
];

// Extreme tail.
const E: [f64; 8] = [
    6.657_904_643_501_103_777_2,
    5.463_784_911_164_114_369_9,
    1.784_826_539_917_291_335_8,
    0.296_560_571_828_504_891_23,
    0.026_532_189_526_576_123_093,
    0.001_242_660_947_388_078_438_6,
    2.711_555_568_743_487_578_15e-5,
    2.010_334_399_292_288_132_65e-7,
];
const F: [f64; 8] = [
    1.0,
    0.599_832_206_555_887_937_69,
    0.136_929_880_922_735_805_31,
    0.014_875_361_290_850_614_852_5,
    7.868_691_311_456_132_591e-4,
    1.846_318_317_510_054_681_8e-5,
    1.421_511_758_316_445_888_7e-7,
    2.044_263_103_389_939_785_64e-15,
];

/// Value `x` such that `P(X <= x) = p` for `X ~ Normal(mu, sigma)`.
///
/// `sigma == 0` returns `mu`.
///
/// # Errors
///
/// - [`QuantileError::InvalidProbability`] unless `0 < p < 1`
/// - [`QuantileError::NegativeSigma`] if `sigma < 0`
///
/// # Examples
///
/// ```
/// use u_spc::special::normal_quantile;
///
/// let z = normal_quantile(0.975, 0.0, 1.0).unwrap();
/// assert!((z - 1.959963984540054).abs() < 1e-12);
///
/// let x = normal_quantile(0.5, 10.0, 2.0).unwrap();
/// assert!((x - 10.0).abs() < 1e-12);
/// ```
pub fn normal_quantile(p: f64, mu: f64, sigma: f64) -> Result<f64, QuantileError> {
    if !(p > 0.0 && p < 1.0) {
        return Err(QuantileError::InvalidProbability(p));
    }
    if sigma.is_nan() || sigma < 0.0 {
        return Err(QuantileError::NegativeSigma(sigma));
    }
    if sigma == 0.0 {
        return Ok(mu);
    }
    Ok(mu + sigma * inverse_normal_cdf(p))
}

/// Standard normal quantile. Callers guarantee `0 < p < 1`.
pub(crate) fn inverse_normal_cdf(p: f64) -> f64 {
    let q = p - 0.5;
    if q.abs() <= SPLIT_CENTRAL {
        let r = CONST_CENTRAL - q * q;
        return q * horner(&A, r) / horner(&B, r);
    }

    let tail = if q < 0.0 { p } else { 1.0 - p };
    let r = (-tail.ln()).sqrt();
    let val = if r <= SPLIT_TAIL {
        let r = r - CONST_MODERATE;
        horner(&C, r) / horner(&D, r)
    } else {
        let r = r - SPLIT_TAIL;
        horner(&E, r) / horner(&F, r)
    };

    if q < 0.0 {
        -val
    } else {
        val
    }
}

/// Evaluates `c[0] + c[1]*x + ... + c[k]*x^k`.
fn horner(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn quantile_is_monotone(a in 1e-9_f64..0.5, b in 1e-9_f64..0.5) {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assume!(lo < hi);
            prop_assert!(inverse_normal_cdf(lo) <= inverse_normal_cdf(hi));
            prop_assert!(inverse_normal_cdf(1.0 - hi) <= inverse_normal_cdf(1.0 - lo));
        }
    }
}
