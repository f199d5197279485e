//! Variables control limits: X-bar-R and moving X-bar / moving R.
//!
//! Both charts reduce subgroups to means and ranges and place limits with
//! the Shewhart range method. They differ only in how subgroups are formed:
//! fixed partitions for X-bar-R, sliding windows for the moving chart.
//!
//! # Algorithm
//!
//! 1. Partition the data and compute each subgroup's mean (X-bar) and range (R).
//! 2. Center lines: X-double-bar = mean of the means, R-bar = mean of the ranges.
//! 3. X-bar limits: CL ± A2 * R-bar.
//! 4. R limits: UCL = D4 * R-bar, LCL = D3 * R-bar.
//!
//! Any center line or limit may be overridden by the caller; derived limits
//! use the overridden center lines.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 6: Control Charts for Variables.
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Shewhart, W.A. (1931). *Economic Control of Quality of Manufactured Product*.

use u_numflow::stats;

use super::chart::{SeriesData, SeriesTag};
use super::engine::validate;
use super::factors::chart_factors;
use super::grouping::{fixed_subgroups, means, moving_subgroups, ranges};
use super::options::{LimitOverrides, RuleSet};
use super::rules::detect;
use crate::error::SpcError;

/// Means and ranges series of one variables chart.
pub type VariablesSeries = (SeriesData, SeriesData);

/// X-bar-R chart over fixed, non-overlapping subgroups.
///
/// A trailing partial subgroup is ignored.
///
/// # Errors
///
/// - [`SpcError::EmptyData`] for empty `values`
/// - [`SpcError::NonFinite`] for a NaN or infinite value
/// - [`SpcError::UnsupportedSubgroupSize`] if `group_size` has no factors
/// - [`SpcError::InsufficientData`] if not even one subgroup can be formed
///
/// # Examples
///
/// ```
/// use u_spc::spc::{compute_xbar_r, LimitOverrides, RuleSet};
///
/// let data = [25.0, 26.0, 24.5, 25.2, 24.8, 25.1, 25.1, 25.0, 24.7];
/// let (xbar, r) = compute_xbar_r(&data, 3, &LimitOverrides::default(), RuleSet::ALL).unwrap();
/// assert_eq!(xbar.n, 3);
/// assert!(xbar.upper_limits[0] > xbar.center_line);
/// assert!(r.lower_limits[0] >= 0.0);
/// ```
pub fn compute_xbar_r(
    values: &[f64],
    group_size: usize,
    overrides: &LimitOverrides,
    rules: RuleSet,
) -> Result<VariablesSeries, SpcError> {
    validate(values)?;
    let subgroups = fixed_subgroups(values, group_size);
    compute_series(
        &subgroups,
        values.len(),
        group_size,
        overrides,
        rules,
        (SeriesTag::XBar, SeriesTag::R),
    )
}

/// Moving X-bar / moving R chart over sliding windows of `group_size`.
///
/// # Errors
///
/// Same as [`compute_xbar_r`].
pub fn compute_moving_xbar_r(
    values: &[f64],
    group_size: usize,
    overrides: &LimitOverrides,
    rules: RuleSet,
) -> Result<VariablesSeries, SpcError> {
    validate(values)?;
    let subgroups = moving_subgroups(values, group_size);
    compute_series(
        &subgroups,
        values.len(),
        group_size,
        overrides,
        rules,
        (SeriesTag::MovingX, SeriesTag::MovingR),
    )
}

fn compute_series(
    subgroups: &[&[f64]],
    len: usize,
    group_size: usize,
    overrides: &LimitOverrides,
    rules: RuleSet,
    (x_tag, r_tag): (SeriesTag, SeriesTag),
) -> Result<VariablesSeries, SpcError> {
    let factors = chart_factors(group_size)?;
    let insufficient = SpcError::InsufficientData { len, group_size };
    if subgroups.is_empty() {
        return Err(insufficient);
    }

    let xbar_values = means(subgroups);
    let r_values = ranges(subgroups);

    let x_cl = match overrides.x_cl {
        Some(cl) => cl,
        None => stats::mean(&xbar_values).ok_or_else(|| insufficient.clone())?,
    };
    let r_cl = match overrides.r_cl {
        Some(cl) => cl,
        None => stats::mean(&r_values).ok_or(insufficient)?,
    };

    let x_ucl = overrides.x_ucl.unwrap_or(x_cl + factors.a2 * r_cl);
    let x_lcl = overrides.x_lcl.unwrap_or(x_cl - factors.a2 * r_cl);
    let r_ucl = overrides.r_ucl.unwrap_or(factors.d4 * r_cl);
    let r_lcl = overrides.r_lcl.unwrap_or(factors.d3 * r_cl);

    log::debug!(
        "{x_tag}: CL={x_cl} UCL={x_ucl} LCL={x_lcl} (n={group_size}, {} subgroups)",
        subgroups.len()
    );
    log::debug!("{r_tag}: CL={r_cl} UCL={r_ucl} LCL={r_lcl}");

    Ok((
        build_series(xbar_values, x_tag, x_cl, x_ucl, x_lcl, rules),
        build_series(r_values, r_tag, r_cl, r_ucl, r_lcl, rules),
    ))
}

/// Broadcast limits, compute display bounds and run the exception rules.
fn build_series(
    values: Vec<f64>,
    tag: SeriesTag,
    center_line: f64,
    ucl: f64,
    lcl: f64,
    rules: RuleSet,
) -> SeriesData {
    let n = values.len();
    let upper_limits = vec![ucl; n];
    let lower_limits = vec![lcl; n];

    let bounds = values.iter().chain(&upper_limits).chain(&lower_limits);
    let min = bounds.clone().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = bounds.fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let exceptions = detect(&values, center_line, &upper_limits, &lower_limits, rules);

    SeriesData {
        values,
        n,
        min,
        max,
        tag,
        center_line,
        upper_limits,
        lower_limits,
        exceptions,
    }
}
