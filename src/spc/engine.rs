//! End-to-end chart build: validate → classify → group → limits → detect.
//!
//! Every call recomputes everything from the sample and options; the same
//! inputs always give an identical [`ChartDataModel`].
//!
//! # Examples
//!
//! ```
//! use u_spc::spc::{build_chart, ChartKind, ChartOptions, Sample};
//!
//! let sample = Sample::new(vec![10.0, 12.0, 9.0, 11.0, 13.0, 10.0, 12.0, 11.0, 9.0]).unwrap();
//! let opts = ChartOptions {
//!     chart_type: Some("xBarR".into()),
//!     group_size: Some(3),
//!     ..Default::default()
//! };
//! let model = build_chart(&sample, &opts).unwrap();
//! assert_eq!(model.kind, ChartKind::XBarR);
//! assert_eq!(model.means.n, 3);
//! ```

use super::chart::ChartDataModel;
use super::classify::{classify, ClassificationDecision};
use super::options::ChartOptions;
use super::variables::{compute_moving_xbar_r, compute_xbar_r};
use crate::error::SpcError;

/// Validated measurement sequence, optionally keyed.
///
/// # Invariants
///
/// - at least one value
/// - every value is finite
/// - when keyed, `keys.len() == values.len()`
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    keys: Option<Vec<String>>,
}

impl Sample {
    /// Build an unkeyed sample.
    ///
    /// # Errors
    ///
    /// [`SpcError::EmptyData`] or [`SpcError::NonFinite`].
    pub fn new(values: Vec<f64>) -> Result<Self, SpcError> {
        validate(&values)?;
        Ok(Self { values, keys: None })
    }

    /// Build a keyed sample. Key order is preserved; keys do not take part
    /// in any computation.
    pub fn keyed<K, I>(entries: I) -> Result<Self, SpcError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let (keys, values): (Vec<String>, Vec<f64>) =
            entries.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        validate(&values)?;
        Ok(Self {
            values,
            keys: Some(keys),
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; an empty sample cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reject empty input and report the first non-finite value.
pub(super) fn validate(values: &[f64]) -> Result<(), SpcError> {
    if values.is_empty() {
        return Err(SpcError::EmptyData);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(SpcError::NonFinite { index });
    }
    Ok(())
}

/// Classify the sample and compute the chart it calls for.
///
/// # Errors
///
/// - classification errors from [`classify`]
/// - [`SpcError::NotComputed`] when the chosen chart is individuals/moving
///   range or an attributes chart, which have no limit computation here
/// - limit computation errors from [`compute_xbar_r`] / [`compute_moving_xbar_r`]
pub fn build_chart(sample: &Sample, options: &ChartOptions) -> Result<ChartDataModel, SpcError> {
    let decision = classify(sample.values(), options)?;
    build_for_decision(sample, decision, options)
}

/// Compute the chart for an already-made decision.
pub fn build_for_decision(
    sample: &Sample,
    decision: ClassificationDecision,
    options: &ChartOptions,
) -> Result<ChartDataModel, SpcError> {
    let overrides = options.limits();
    let (group_size, (means, ranges)) = match decision {
        ClassificationDecision::XBarR { group_size } => (
            group_size,
            compute_xbar_r(sample.values(), group_size, &overrides, options.rules)?,
        ),
        ClassificationDecision::MovingXBarR { group_size } => (
            group_size,
            compute_moving_xbar_r(sample.values(), group_size, &overrides, options.rules)?,
        ),
        other => return Err(SpcError::NotComputed(other.kind())),
    };

    log::debug!(
        "built {} chart: {} means exceptions, {} ranges exceptions",
        decision.kind(),
        means.exceptions.len(),
        ranges.exceptions.len()
    );

    Ok(ChartDataModel {
        kind: decision.kind(),
        group_size,
        keys: sample.keys.clone(),
        means,
        ranges,
    })
}
