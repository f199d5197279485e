//! Chart selection.
//!
//! Picks a chart family for a sample with a fixed decision tree:
//!
//! ```text
//! forced chart type?            -> that chart (group size required)
//! count data?                   -> c / u / np / p
//! bell-shaped?
//!   slowly evolving on n=2..3?  -> individuals / moving range
//!   else                        -> X-bar-R at the first n whose means are bell-shaped
//! not bell-shaped:
//!   slowly evolving on n=3..5?  -> moving X-bar / moving R, n = 4
//!   else                        -> X-bar-R at the first n whose means are bell-shaped
//! ```
//!
//! "Slowly evolving" is a Central Limit Theorem check: if subgroup means of
//! a small size already look normal, subgrouping works; if no candidate
//! size gets there (or there is too little data to tell), the process is
//! treated as slowly evolving.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use super::grouping::{fixed_subgroups, means};
use super::options::ChartOptions;
use crate::error::SpcError;
use crate::testing::is_bell_shaped;

/// Subgroup sizes tried when the data are bell-shaped.
pub const BELL_SHAPED_SIZES: RangeInclusive<usize> = 2..=3;

/// Subgroup sizes tried when the data are not bell-shaped.
pub const SKEWED_SIZES: RangeInclusive<usize> = 3..=5;

/// Subgroup size of the moving X-bar / moving R chart.
pub const MOVING_GROUP_SIZE: usize = 4;

/// Subgroups needed per candidate size before the means are tested.
pub const MIN_SUBGROUPS: usize = 20;

/// Chart families the engine can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    /// Fixed-subgroup means and ranges.
    #[serde(rename = "xBarR")]
    XBarR,
    /// Moving-subgroup means and ranges.
    #[serde(rename = "mXBarR")]
    MovingXBarR,
    /// Individuals and moving range.
    #[serde(rename = "iMR")]
    IndividualsMovingRange,
    /// Proportion defective, variable sample size.
    #[serde(rename = "p")]
    P,
    /// Count defective, constant sample size.
    #[serde(rename = "np")]
    NP,
    /// Defect count, constant area of opportunity.
    #[serde(rename = "c")]
    C,
    /// Defects per unit, variable area of opportunity.
    #[serde(rename = "u")]
    U,
}

impl ChartKind {
    /// Canonical chart-type string, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::XBarR => "xBarR",
            ChartKind::MovingXBarR => "mXBarR",
            ChartKind::IndividualsMovingRange => "iMR",
            ChartKind::P => "p",
            ChartKind::NP => "np",
            ChartKind::C => "c",
            ChartKind::U => "u",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = SpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xBarR" | "xBar" => Ok(ChartKind::XBarR),
            "mXBarR" | "mXBar" => Ok(ChartKind::MovingXBarR),
            "iMR" => Ok(ChartKind::IndividualsMovingRange),
            "p" => Ok(ChartKind::P),
            "np" => Ok(ChartKind::NP),
            "c" => Ok(ChartKind::C),
            "u" => Ok(ChartKind::U),
            other => Err(SpcError::UnknownChartType(other.to_string())),
        }
    }
}

/// Outcome of [`classify`]: the chart family and the fields it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationDecision {
    XBarR { group_size: usize },
    MovingXBarR { group_size: usize },
    IndividualsMovingRange,
    P,
    NP,
    C,
    U,
}

impl ClassificationDecision {
    pub fn kind(&self) -> ChartKind {
        match self {
            ClassificationDecision::XBarR { .. } => ChartKind::XBarR,
            ClassificationDecision::MovingXBarR { .. } => ChartKind::MovingXBarR,
            ClassificationDecision::IndividualsMovingRange => ChartKind::IndividualsMovingRange,
            ClassificationDecision::P => ChartKind::P,
            ClassificationDecision::NP => ChartKind::NP,
            ClassificationDecision::C => ChartKind::C,
            ClassificationDecision::U => ChartKind::U,
        }
    }

    /// Subgroup size for the subgrouped variables charts.
    pub fn group_size(&self) -> Option<usize> {
        match *self {
            ClassificationDecision::XBarR { group_size }
            | ClassificationDecision::MovingXBarR { group_size } => Some(group_size),
            _ => None,
        }
    }

    fn forced(kind: ChartKind, group_size: usize) -> Self {
        match kind {
            ChartKind::XBarR => ClassificationDecision::XBarR { group_size },
            ChartKind::MovingXBarR => ClassificationDecision::MovingXBarR { group_size },
            ChartKind::IndividualsMovingRange => ClassificationDecision::IndividualsMovingRange,
            ChartKind::P => ClassificationDecision::P,
            ChartKind::NP => ClassificationDecision::NP,
            ChartKind::C => ClassificationDecision::C,
            ChartKind::U => ClassificationDecision::U,
        }
    }
}

/// Result of the slowly-evolving scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evolution {
    /// No candidate subgroup size produced bell-shaped means.
    SlowlyEvolving,
    /// Means of subgroups of this size are bell-shaped.
    Settled { group_size: usize },
}

/// Scan candidate subgroup sizes in increasing order.
///
/// For each size `i`: fewer than `20 * i` values ends the scan as
/// [`Evolution::SlowlyEvolving`]; otherwise the means of fixed subgroups of
/// size `i` are tested and the first bell-shaped one settles the process.
///
/// # Examples
///
/// ```
/// use u_spc::spc::{scan_evolution, Evolution};
///
/// // 30 values cannot support 20 subgroups of 2
/// let short: Vec<f64> = (0..30).map(f64::from).collect();
/// assert_eq!(scan_evolution(&short, 2..=3), Evolution::SlowlyEvolving);
/// ```
pub fn scan_evolution(values: &[f64], sizes: RangeInclusive<usize>) -> Evolution {
    for size in sizes {
        if values.len() < size * MIN_SUBGROUPS {
            log::debug!(
                "{} values too few for subgroups of {size}; slowly evolving",
                values.len()
            );
            return Evolution::SlowlyEvolving;
        }
        let subgroup_means = means(&fixed_subgroups(values, size));
        if is_bell_shaped(&subgroup_means) {
            return Evolution::Settled { group_size: size };
        }
    }
    Evolution::SlowlyEvolving
}

/// Slowly-evolving test honoring `force_slowly_evolving`.
pub fn is_slowly_evolving(
    values: &[f64],
    sizes: RangeInclusive<usize>,
    options: &ChartOptions,
) -> bool {
    evolution(values, sizes, options) == Evolution::SlowlyEvolving
}

/// [`scan_evolution`], short-circuited by `force_slowly_evolving`.
fn evolution(
    values: &[f64],
    sizes: RangeInclusive<usize>,
    options: &ChartOptions,
) -> Evolution {
    if options.force_slowly_evolving {
        log::debug!("slowly evolving forced by options");
        return Evolution::SlowlyEvolving;
    }
    scan_evolution(values, sizes)
}

/// Decide which chart applies to `values`.
///
/// A caller-supplied `group_size` replaces the size the scan would choose
/// for X-bar-R and moving X-bar-R charts.
///
/// # Errors
///
/// - [`SpcError::EmptyData`] for an empty sample
/// - [`SpcError::MissingGroupSize`] when a chart type is forced without a group size
/// - [`SpcError::UnknownChartType`] when the forced chart type is not recognised
pub fn classify(
    values: &[f64],
    options: &ChartOptions,
) -> Result<ClassificationDecision, SpcError> {
    if values.is_empty() {
        return Err(SpcError::EmptyData);
    }

    if let Some(chart) = options.chart_type.as_deref() {
        let group_size = options.group_size.ok_or(SpcError::MissingGroupSize)?;
        let kind: ChartKind = chart.parse()?;
        log::debug!("chart type forced to {kind} with group size {group_size}");
        return Ok(ClassificationDecision::forced(kind, group_size));
    }

    if options.is_count_data {
        let decision = match (options.is_defect_count, options.is_constant_opportunity) {
            (true, true) => ClassificationDecision::C,
            (true, false) => ClassificationDecision::U,
            (false, true) => ClassificationDecision::NP,
            (false, false) => ClassificationDecision::P,
        };
        log::debug!("count data routed to {} chart", decision.kind());
        return Ok(decision);
    }

    let bell_shaped = is_bell_shaped(values);
    let (sizes, fallback) = if bell_shaped {
        (BELL_SHAPED_SIZES, ClassificationDecision::IndividualsMovingRange)
    } else {
        (
            SKEWED_SIZES,
            ClassificationDecision::MovingXBarR {
                group_size: options.group_size.unwrap_or(MOVING_GROUP_SIZE),
            },
        )
    };

    let evolution = evolution(values, sizes, options);

    let decision = match evolution {
        Evolution::SlowlyEvolving => fallback,
        Evolution::Settled { group_size } => ClassificationDecision::XBarR {
            group_size: options.group_size.unwrap_or(group_size),
        },
    };
    log::debug!(
        "bell_shaped={bell_shaped} evolution={evolution:?} -> {} (group size {:?})",
        decision.kind(),
        decision.group_size()
    );
    Ok(decision)
}
