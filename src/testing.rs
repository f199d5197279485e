//! Normality testing.
//!
//! The Shapiro-Wilk W statistic decides whether raw measurements (or
//! subgroup means) are bell-shaped, which drives chart selection in
//! [`spc::classify`](crate::spc::classify).
//!
//! # Examples
//!
//! ```
//! use u_spc::testing::{is_bell_shaped, shapiro_wilk_w};
//!
//! let data = [-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5];
//! let w = shapiro_wilk_w(&data).unwrap();
//! assert!(w > 0.9);
//! assert!(is_bell_shaped(&data));
//! ```

use crate::error::NormalityError;
use crate::special::inverse_normal_cdf;

/// Minimum W for a sample to count as bell-shaped.
///
/// Critical value at alpha = 0.05 for a fixed reference sample size, stored
/// as the single-precision literal the charting tool has always used. It is
/// not re-derived per sample size.
pub const BELL_SHAPED_W_THRESHOLD: f64 = 0.787_999_987_602_233_9;

const MIN_SAMPLE: usize = 3;
const MAX_SAMPLE: usize = 5000;

/// Below this, the sample range counts as zero.
const SMALL: f64 = 1e-19;

// Royston polynomial coefficients (AS R94)
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];

/// Shapiro-Wilk W statistic: H₀: data is normally distributed.
///
/// # Algorithm
///
/// Royston (1995), Algorithm AS R94:
/// 1. Sort a private copy of the sample.
/// 2. Approximate the coefficients `a` from Blom scores
///    `m_i = Φ⁻¹((i - 0.375) / (n + 0.25))`, with polynomial corrections to the
///    one (n ≤ 5) or two (n > 5) outermost coefficients.
/// 3. Scale the sample by its range and compute W as the squared correlation
///    between the scaled order statistics and the antisymmetric coefficient
///    vector, evaluated as `1 - (ssa·ssx - sax²) / (ssa·ssx)` to keep
///    precision when W is close to 1.
///
/// Only W is reported; no p-value is derived.
///
/// # Errors
///
/// - [`NormalityError::TooSmall`] for fewer than 3 values
/// - [`NormalityError::TooLarge`] for more than 5000 values
/// - [`NormalityError::NonFinite`] if any value is NaN or infinite
/// - [`NormalityError::Degenerate`] if all values are effectively equal
/// - [`NormalityError::Unsorted`] if the range-scaled order check fails
///
/// # References
///
/// - Shapiro & Wilk (1965). "An analysis of variance test for normality".
///   Biometrika, 52(3–4), 591–611.
/// - Royston (1995). "Remark AS R94: A remark on Algorithm AS 181".
///   Applied Statistics, 44(4), 547–551.
pub fn shapiro_wilk_w(data: &[f64]) -> Result<f64, NormalityError> {
    let n = data.len();
    if n < MIN_SAMPLE {
        return Err(NormalityError::TooSmall(n));
    }
    if n > MAX_SAMPLE {
        return Err(NormalityError::TooLarge(n));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(NormalityError::NonFinite);
    }

    let mut x = data.to_vec();
    x.sort_by(f64::total_cmp);

    let a = sw_coefficients(n);

    let range = x[n - 1] - x[0];
    if range < SMALL {
        return Err(NormalityError::Degenerate);
    }

    let scaled: Vec<f64> = x.iter().map(|&v| v / range).collect();
    if scaled.windows(2).any(|w| w[0] - w[1] > SMALL) {
        return Err(NormalityError::Unsorted);
    }

    Ok(sw_statistic(&scaled, &a))
}

/// `true` when W is at least [`BELL_SHAPED_W_THRESHOLD`].
///
/// Samples the test cannot judge (too small, too large, degenerate) count
/// as not bell-shaped.
pub fn is_bell_shaped(data: &[f64]) -> bool {
    match shapiro_wilk_w(data) {
        Ok(w) => {
            log::trace!("shapiro-wilk W = {w:.6} for n = {}", data.len());
            w >= BELL_SHAPED_W_THRESHOLD
        }
        Err(err) => {
            log::warn!("normality inconclusive, not bell-shaped: {err}");
            false
        }
    }
}

// Evaluate polynomial: c[0] + c[1]*x + c[2]*x^2 + ... (Horner's method)
fn sw_poly(c: &[f64], x: f64) -> f64 {
    let mut result = c[c.len() - 1];
    for i in (0..c.len() - 1).rev() {
        result = result * x + c[i];
    }
    result
}

// Upper-half coefficients a[0..n/2], largest first. Requires n >= 3.
fn sw_coefficients(n: usize) -> Vec<f64> {
    let nn2 = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an25 = n as f64 + 0.25;
    let m: Vec<f64> = (0..nn2)
        .map(|i| inverse_normal_cdf((i as f64 + 1.0 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let mut a = m.clone();
    let a1 = sw_poly(&SW_C1, rsn) - m[0] / ssumm2;
    let (fac, first_plain) = if n > 5 {
        let a2 = -m[1] / ssumm2 + sw_poly(&SW_C2, rsn);
        let num = summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1];
        let den = 1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2;
        let fac = (num / den).sqrt();
        a[1] = a2;
        (fac, 2)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (fac, 1)
    };
    a[0] = a1;
    for ai in a.iter_mut().skip(first_plain) {
        *ai /= -fac;
    }
    a
}

// W from range-scaled sorted data and the upper-half coefficients
fn sw_statistic(x: &[f64], a: &[f64]) -> f64 {
    let n = x.len();
    let nf = n as f64;

    // Full antisymmetric coefficient vector: -a on the low half, +a mirrored
    // on the high half, zero at the median of an odd sample.
    let coef = |i: usize| -> f64 {
        let j = n - 1 - i;
        match i.cmp(&j) {
            std::cmp::Ordering::Less => -a[i],
            std::cmp::Ordering::Greater => a[j],
            std::cmp::Ordering::Equal => 0.0,
        }
    };

    let sa = (0..n).map(coef).sum::<f64>() / nf;
    let sx = x.iter().sum::<f64>() / nf;

    let mut ssa = 0.0;
    let mut ssx = 0.0;
    let mut sax = 0.0;
    for (i, &xi) in x.iter().enumerate() {
        let asa = coef(i) - sa;
        let xsx = xi - sx;
        ssa += asa * asa;
        ssx += xsx * xsx;
        sax += asa * xsx;
    }

    // w1 = 1 - W, computed directly to avoid rounding when W is close to 1
    let ssassx = (ssa * ssx).sqrt();
    let w1 = (ssassx - sax) * (ssassx + sax) / (ssa * ssx);
    1.0 - w1
}
