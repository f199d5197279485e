//! # u-spc
//!
//! Statistical process control chart engine: decides which control chart a
//! measurement sequence calls for, computes its center lines and control
//! limits, and flags special-cause signals.
//!
//! The engine operates on raw `f64` data and produces a plain data model;
//! drawing the chart is left to the caller.
//!
//! ## Modules
//!
//! - [`spc`] — Chart selection, subgrouping, X̄-R / moving X̄-R limits, run rules
//! - [`testing`] — Shapiro-Wilk W normality statistic
//! - [`special`] — Inverse normal CDF (AS 241)
//! - [`error`] — Error types
//!
//! ## Design Philosophy
//!
//! - **Rebuild, don't patch**: every build recomputes the whole chart from its inputs
//! - **Explicit failures**: invalid configuration is an error, never a NaN limit
//! - **Research-backed**: algorithms reference the statistical literature
//!
//! ## Example
//!
//! ```
//! use u_spc::spc::{build_chart, ChartOptions, Sample};
//!
//! let data = vec![10.0, 12.0, 9.0, 11.0, 13.0, 10.0, 12.0, 11.0, 9.0, 14.0, 10.0, 12.0];
//! let opts = ChartOptions::from_json(r#"{ "chartType": "xBarR", "groupSize": 3 }"#).unwrap();
//! let model = build_chart(&Sample::new(data).unwrap(), &opts).unwrap();
//! assert_eq!(model.means.n, 4);
//! ```

pub mod error;
pub mod spc;
pub mod special;
pub mod testing;

pub use error::{NormalityError, QuantileError, SpcError};
