//! Statistical Process Control (SPC) chart engine.
//!
//! Turns a raw measurement sequence into chart data: which chart applies,
//! the subgroup statistics, center lines and control limits, and the points
//! that signal special-cause variation.
//!
//! # Pipeline
//!
//! 1. [`classify`] — normality test and slowly-evolving scan pick a [`ChartKind`]
//! 2. [`fixed_subgroups`] / [`moving_subgroups`] — partition the data
//! 3. [`compute_xbar_r`] / [`compute_moving_xbar_r`] — center lines and limits
//!    from the [`chart_factors`] table
//! 4. [`detect`] — four run rules over each series
//!
//! [`build_chart`] runs all four steps and returns a [`ChartDataModel`].
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

mod chart;
mod classify;
mod engine;
mod factors;
mod grouping;
mod options;
mod rules;
mod variables;

pub use chart::{ChartDataModel, Exception, ExceptionKind, SeriesData, SeriesTag};
pub use classify::{
    classify, is_slowly_evolving, scan_evolution, ChartKind, ClassificationDecision, Evolution,
    BELL_SHAPED_SIZES, MIN_SUBGROUPS, MOVING_GROUP_SIZE, SKEWED_SIZES,
};
pub use engine::{build_chart, build_for_decision, Sample};
pub use factors::{chart_factors, sigma_estimate, ChartFactors, SUPPORTED_SIZES};
pub use grouping::{fixed_subgroups, means, moving_subgroups, ranges};
pub use options::{ChartOptions, LimitOverrides, RuleSet};
pub use rules::{count_runs, detect, runs_lower_bound, runs_upper_bound, RUN_LENGTH, TREND_LENGTH};
pub use variables::{compute_moving_xbar_r, compute_xbar_r, VariablesSeries};
