//! Chart build configuration.
//!
//! [`ChartOptions`] is the record a surrounding application hands to
//! [`build_chart`](super::build_chart). Keys follow the camelCase names the
//! charting front end already uses, so a JSON options object can be passed
//! through unchanged:
//!
//! ```
//! use u_spc::spc::ChartOptions;
//!
//! let opts = ChartOptions::from_json(r#"{ "groupSize": 5, "xUCL": 12.5 }"#).unwrap();
//! assert_eq!(opts.group_size, Some(5));
//! assert_eq!(opts.limits().x_ucl, Some(12.5));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SpcError;

/// Recognised chart options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartOptions {
    /// Data are counts (defects or defectives), not measurements.
    pub is_count_data: bool,
    /// Counts are defects rather than defective units. Only read with `is_count_data`.
    pub is_defect_count: bool,
    /// Area of opportunity is constant. Only read with `is_count_data`.
    pub is_constant_opportunity: bool,
    /// Skip the normality-driven heuristic and treat the process as slowly evolving.
    pub force_slowly_evolving: bool,
    /// Forced chart type, e.g. `"xBarR"`. Requires `group_size`.
    /// Read from `chartType`, or from the older `chart` key.
    #[serde(rename = "chartType", alias = "chart")]
    pub chart_type: Option<String>,
    /// Subgroup size override.
    pub group_size: Option<usize>,
    // Limit overrides, read through `limits()`.
    #[serde(rename = "xCL")]
    pub x_cl: Option<f64>,
    #[serde(rename = "xUCL")]
    pub x_ucl: Option<f64>,
    #[serde(rename = "xLCL")]
    pub x_lcl: Option<f64>,
    #[serde(rename = "rCL")]
    pub r_cl: Option<f64>,
    #[serde(rename = "rUCL")]
    pub r_ucl: Option<f64>,
    #[serde(rename = "rLCL")]
    pub r_lcl: Option<f64>,
    /// Exception rules to run.
    pub rules: RuleSet,
}

impl ChartOptions {
    /// Parse options from a JSON object.
    ///
    /// # Errors
    ///
    /// [`SpcError::InvalidConfig`] for malformed JSON, unknown keys or
    /// mistyped values.
    pub fn from_json(json: &str) -> Result<Self, SpcError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The six center line / limit overrides as one record.
    pub fn limits(&self) -> LimitOverrides {
        LimitOverrides {
            x_cl: self.x_cl,
            x_ucl: self.x_ucl,
            x_lcl: self.x_lcl,
            r_cl: self.r_cl,
            r_ucl: self.r_ucl,
            r_lcl: self.r_lcl,
        }
    }
}

/// Caller-supplied center lines and control limits.
///
/// Any `Some` value replaces the computed one; the rest are derived from the
/// data as usual.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimitOverrides {
    pub x_cl: Option<f64>,
    pub x_ucl: Option<f64>,
    pub x_lcl: Option<f64>,
    pub r_cl: Option<f64>,
    pub r_ucl: Option<f64>,
    pub r_lcl: Option<f64>,
}

/// Which exception rules run. All four are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSet {
    /// Rule 1: point beyond a control limit.
    pub out_of_limits: bool,
    /// Rule 2: 8 consecutive points on one side of the center line.
    pub run_on_one_side: bool,
    /// Rule 3: too many or too few runs about the center line.
    pub run_count: bool,
    /// Rule 4: 6 consecutive points steadily increasing or decreasing.
    pub trend: bool,
}

impl RuleSet {
    /// Every rule enabled.
    pub const ALL: RuleSet = RuleSet {
        out_of_limits: true,
        run_on_one_side: true,
        run_count: true,
        trend: true,
    };

    /// Every rule disabled.
    pub const NONE: RuleSet = RuleSet {
        out_of_limits: false,
        run_on_one_side: false,
        run_count: false,
        trend: false,
    };
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::ALL
    }
}
