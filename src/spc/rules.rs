//! Run rules for detecting special-cause signals on a statistic series.
//!
//! Four independent rules; each contributes `(index, kind)` pairs and the
//! union is sorted by index with exact duplicates removed.
//!
//! 1. Point beyond its upper or lower control limit.
//! 2. 8 consecutive points on one side of the center line.
//! 3. Too many or too few runs about the center line.
//! 4. 6 consecutive points steadily increasing or decreasing.
//!
//! # References
//!
//! - Swed, F.S. & Eisenhart, C. (1943). "Tables for Testing Randomness of
//!   Grouping in a Sequence of Alternatives", *Annals of Mathematical
//!   Statistics* 14(1), pp. 66-87.
//! - Western Electric (1956). *Statistical Quality Control Handbook*.
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use super::chart::{Exception, ExceptionKind};
use super::options::RuleSet;

/// Points on one side of the center line that make a run signal.
pub const RUN_LENGTH: usize = 8;

/// Consecutive strictly monotone points that make a trend signal.
pub const TREND_LENGTH: usize = 6;

/// Run the enabled rules over `values` and return the sorted exceptions.
///
/// `upper_limits` and `lower_limits` are per-point and must be as long as
/// `values`. A point equal to the center line counts as above it.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{detect, ExceptionKind, RuleSet};
///
/// let values = [1.0, 2.0, 9.0, 1.5];
/// let ucl = [5.0; 4];
/// let lcl = [0.0; 4];
/// let rules = RuleSet { run_count: false, ..RuleSet::ALL };
/// let found = detect(&values, 2.0, &ucl, &lcl, rules);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].index, 2);
/// assert_eq!(found[0].kind, ExceptionKind::OutOfLimits);
/// ```
pub fn detect(
    values: &[f64],
    center_line: f64,
    upper_limits: &[f64],
    lower_limits: &[f64],
    rules: RuleSet,
) -> Vec<Exception> {
    let mut found = Vec::new();
    if rules.out_of_limits {
        found.extend(check_rule1(values, upper_limits, lower_limits));
    }
    if rules.run_on_one_side {
        found.extend(check_rule2(values, center_line));
    }
    if rules.run_count {
        found.extend(check_rule3(values, center_line));
    }
    if rules.trend {
        found.extend(check_rule4(values));
    }
    found.sort();
    found.dedup();
    log::trace!("{} exceptions over {} points", found.len(), values.len());
    found
}

/// Rule 1: point beyond its control limits.
fn check_rule1(values: &[f64], upper: &[f64], lower: &[f64]) -> Vec<Exception> {
    let mut violations = Vec::new();
    for (index, ((&v, &ucl), &lcl)) in values.iter().zip(upper).zip(lower).enumerate() {
        if v > ucl || v < lcl {
            violations.push(Exception {
                index,
                kind: ExceptionKind::OutOfLimits,
            });
        }
    }
    violations
}

/// Rule 2: 8 consecutive points on the same side of the center line.
///
/// Flags the point completing the run, once per run.
fn check_rule2(values: &[f64], cl: f64) -> Vec<Exception> {
    let mut violations = Vec::new();
    let mut side: Option<bool> = None;
    let mut run_length = 0_usize;

    for (index, &v) in values.iter().enumerate() {
        let above = v >= cl;
        if side == Some(above) {
            run_length += 1;
        } else {
            side = Some(above);
            run_length = 1;
        }
        if run_length == RUN_LENGTH {
            violations.push(Exception {
                index,
                kind: ExceptionKind::RunOnOneSide,
            });
        }
    }
    violations
}

/// Upper run-count bound for `n` points.
///
/// Linear fit to the 95% Swed-Eisenhart critical values.
pub fn runs_upper_bound(n: usize) -> f64 {
    0.6209 * n as f64 + 3.0801
}

/// Lower run-count bound for `n` points.
pub fn runs_lower_bound(n: usize) -> f64 {
    0.3791 * n as f64 + 2.5679
}

/// Number of runs about the center line: side changes plus the trailing run.
pub fn count_runs(values: &[f64], cl: f64) -> usize {
    if values.is_empty() {
        return 0;
    }
    let changes = values
        .windows(2)
        .filter(|w| (w[0] >= cl) != (w[1] >= cl))
        .count();
    changes + 1
}

/// Rule 3: runs about the center line outside the random-sequence band.
///
/// A single flag on the last point of the series.
fn check_rule3(values: &[f64], cl: f64) -> Vec<Exception> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let runs = count_runs(values, cl) as f64;
    let kind = if runs >= runs_upper_bound(n) {
        ExceptionKind::TooManyRuns
    } else if runs <= runs_lower_bound(n) {
        ExceptionKind::TooFewRuns
    } else {
        return Vec::new();
    };
    vec![Exception { index: n - 1, kind }]
}

/// Rule 4: 6 consecutive points strictly increasing or decreasing.
///
/// Equal neighbours leave both counters unchanged. After a flag both
/// counters restart from the flagged point, so one long trend is not
/// reported at every point.
fn check_rule4(values: &[f64]) -> Vec<Exception> {
    let mut violations = Vec::new();
    let mut up = 1_usize;
    let mut down = 1_usize;

    for (index, w) in values.windows(2).enumerate() {
        let index = index + 1;
        if w[1] > w[0] {
            up += 1;
            down = 1;
        } else if w[1] < w[0] {
            down += 1;
            up = 1;
        }

        let kind = if up >= TREND_LENGTH {
            ExceptionKind::TrendUp
        } else if down >= TREND_LENGTH {
            ExceptionKind::TrendDown
        } else {
            continue;
        };
        violations.push(Exception { index, kind });
        up = 1;
        down = 1;
    }
    violations
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn detect_sorted_unique_in_range(
            values in proptest::collection::vec(-10.0_f64..10.0, 0..=60),
            cl in -2.0_f64..2.0,
            width in 0.5_f64..8.0,
        ) {
            let ucl = vec![cl + width; values.len()];
            let lcl = vec![cl - width; values.len()];
            let found = detect(&values, cl, &ucl, &lcl, RuleSet::ALL);
            for pair in found.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for e in &found {
                prop_assert!(e.index < values.len());
            }
        }

        #[test]
        fn run_count_bounded(values in proptest::collection::vec(-10.0_f64..10.0, 1..=60)) {
            let runs = count_runs(&values, 0.0);
            prop_assert!(runs >= 1 && runs <= values.len());
        }
    }
}
