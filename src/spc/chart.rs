//! Chart data model handed to the rendering layer.
//!
//! A [`ChartDataModel`] holds two [`SeriesData`] (subgroup means and
//! subgroup ranges), each with its center line, per-point limit arrays and
//! the special-cause [`Exception`]s found on it. A model is built in one
//! pass and never patched afterwards: new data or new overrides mean a new
//! model.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::classify::ChartKind;

/// Which statistic a series plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeriesTag {
    /// Means of fixed subgroups.
    #[serde(rename = "xBar")]
    XBar,
    /// Ranges of fixed subgroups.
    #[serde(rename = "R")]
    R,
    /// Means of moving subgroups.
    #[serde(rename = "mX")]
    MovingX,
    /// Ranges of moving subgroups.
    #[serde(rename = "mR")]
    MovingR,
}

impl fmt::Display for SeriesTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeriesTag::XBar => "xBar",
            SeriesTag::R => "R",
            SeriesTag::MovingX => "mX",
            SeriesTag::MovingR => "mR",
        })
    }
}

/// Signal types reported by the exception rules.
///
/// Ordering follows rule number, so a sorted exception list keeps rule
/// order within one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExceptionKind {
    /// Point above its upper or below its lower control limit (rule 1).
    OutOfLimits,
    /// 8 consecutive points on one side of the center line (rule 2).
    RunOnOneSide,
    /// More runs about the center line than a random series produces (rule 3).
    TooManyRuns,
    /// Fewer runs about the center line than a random series produces (rule 3).
    TooFewRuns,
    /// 6 consecutive strictly increasing points (rule 4).
    TrendUp,
    /// 6 consecutive strictly decreasing points (rule 4).
    TrendDown,
}

impl ExceptionKind {
    /// Human-readable reason shown next to the flagged point.
    pub fn reason(self) -> &'static str {
        match self {
            ExceptionKind::OutOfLimits => "point outside control limits",
            ExceptionKind::RunOnOneSide => "8 consecutive points on one side of the center line",
            ExceptionKind::TooManyRuns => "number of runs about the center line too high",
            ExceptionKind::TooFewRuns => "number of runs about the center line too low",
            ExceptionKind::TrendUp => "6 consecutive points increasing",
            ExceptionKind::TrendDown => "6 consecutive points decreasing",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// A flagged point: index into its series plus the rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Exception {
    /// Zero-based index into the series values.
    pub index: usize,
    /// Rule that flagged the point.
    pub kind: ExceptionKind,
}

impl Exception {
    pub fn reason(&self) -> &'static str {
        self.kind.reason()
    }
}

impl Serialize for Exception {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Exception", 3)?;
        s.serialize_field("index", &self.index)?;
        s.serialize_field("rule", &self.kind)?;
        s.serialize_field("reason", self.kind.reason())?;
        s.end()
    }
}

/// One plotted statistic series with its limits and signals.
///
/// # Invariants
///
/// - `values`, `upper_limits` and `lower_limits` have length `n`
/// - `min`/`max` bound every value and every limit
/// - `exceptions` is sorted by index with no duplicate (index, kind) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub values: Vec<f64>,
    pub n: usize,
    /// Lower display bound.
    pub min: f64,
    /// Upper display bound.
    pub max: f64,
    #[serde(rename = "chartType")]
    pub tag: SeriesTag,
    pub center_line: f64,
    pub upper_limits: Vec<f64>,
    pub lower_limits: Vec<f64>,
    pub exceptions: Vec<Exception>,
}

impl SeriesData {
    /// `true` if no rule flagged any point.
    pub fn is_in_control(&self) -> bool {
        self.exceptions.is_empty()
    }

    /// Exceptions recorded at `index`.
    pub fn exceptions_at(&self, index: usize) -> impl Iterator<Item = &Exception> {
        self.exceptions.iter().filter(move |e| e.index == index)
    }
}

/// Complete result of one chart build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataModel {
    /// Chart family the series were computed for.
    pub kind: ChartKind,
    /// Subgroup size used for grouping and factor lookup.
    pub group_size: usize,
    /// Sample keys in input order, when the sample was keyed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    /// Subgroup means.
    pub means: SeriesData,
    /// Subgroup ranges.
    pub ranges: SeriesData,
}

impl ChartDataModel {
    /// `true` if neither series carries an exception.
    pub fn is_in_control(&self) -> bool {
        self.means.is_in_control() && self.ranges.is_in_control()
    }

    /// All exceptions from both series, tagged with their series.
    pub fn exceptions(&self) -> Vec<(SeriesTag, Exception)> {
        self.means
            .exceptions
            .iter()
            .map(|&e| (self.means.tag, e))
            .chain(self.ranges.exceptions.iter().map(|&e| (self.ranges.tag, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(exceptions: Vec<Exception>) -> SeriesData {
        SeriesData {
            values: vec![1.0, 2.0],
            n: 2,
            min: 0.0,
            max: 3.0,
            tag: SeriesTag::XBar,
            center_line: 1.5,
            upper_limits: vec![3.0, 3.0],
            lower_limits: vec![0.0, 0.0],
            exceptions,
        }
    }

    #[test]
    fn series_tags_display() {
        assert_eq!(SeriesTag::XBar.to_string(), "xBar");
        assert_eq!(SeriesTag::R.to_string(), "R");
        assert_eq!(SeriesTag::MovingX.to_string(), "mX");
        assert_eq!(SeriesTag::MovingR.to_string(), "mR");
    }

    #[test]
    fn exception_order_is_index_then_rule() {
        let mut list = vec![
            Exception {
                index: 3,
                kind: ExceptionKind::TrendUp,
            },
            Exception {
                index: 1,
                kind: ExceptionKind::RunOnOneSide,
            },
            Exception {
                index: 3,
                kind: ExceptionKind::OutOfLimits,
            },
        ];
        list.sort();
        assert_eq!(list[0].index, 1);
        assert_eq!(list[1].kind, ExceptionKind::OutOfLimits);
        assert_eq!(list[2].kind, ExceptionKind::TrendUp);
    }

    #[test]
    fn in_control_and_lookup() {
        let clean = series(Vec::new());
        assert!(clean.is_in_control());

        let flagged = series(vec![
            Exception {
                index: 1,
                kind: ExceptionKind::OutOfLimits,
            },
            Exception {
                index: 1,
                kind: ExceptionKind::TooFewRuns,
            },
        ]);
        assert!(!flagged.is_in_control());
        assert_eq!(flagged.exceptions_at(1).count(), 2);
        assert_eq!(flagged.exceptions_at(0).count(), 0);
    }

    #[test]
    fn model_exceptions_are_tagged() {
        let mut ranges = series(vec![Exception {
            index: 0,
            kind: ExceptionKind::OutOfLimits,
        }]);
        ranges.tag = SeriesTag::R;
        let model = ChartDataModel {
            kind: ChartKind::XBarR,
            group_size: 3,
            keys: None,
            means: series(Vec::new()),
            ranges,
        };
        assert!(!model.is_in_control());
        let all = model.exceptions();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, SeriesTag::R);
    }

    #[test]
    fn exception_serializes_reason() {
        let e = Exception {
            index: 4,
            kind: ExceptionKind::TrendDown,
        };
        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["index"], 4);
        assert_eq!(json["rule"], "trendDown");
        assert_eq!(json["reason"], "6 consecutive points decreasing");
    }
}
