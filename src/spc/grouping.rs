//! Subgroup partitioning and per-subgroup reductions.
//!
//! Subgroups borrow from the caller's data; nothing is copied until the
//! mean/range reductions.

use u_numflow::stats;

/// Partition `values` into contiguous, non-overlapping subgroups of exactly
/// `size` elements.
///
/// A trailing partial subgroup is dropped, not padded: 11 values with
/// `size = 3` yield 3 subgroups and the last 2 values are ignored.
/// `size = 0` yields no subgroups.
///
/// # Examples
///
/// ```
/// use u_spc::spc::fixed_subgroups;
///
/// let groups = fixed_subgroups(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
/// assert_eq!(groups, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
/// ```
pub fn fixed_subgroups(values: &[f64], size: usize) -> Vec<&[f64]> {
    if size == 0 {
        return Vec::new();
    }
    values.chunks_exact(size).collect()
}

/// Sliding windows of `size` elements with stride 1.
///
/// Produces `len - size + 1` windows, or none when `values` is shorter than
/// `size` (or `size = 0`). Neighbouring windows share `size - 1` elements.
///
/// # Examples
///
/// ```
/// use u_spc::spc::moving_subgroups;
///
/// let groups = moving_subgroups(&[1.0, 2.0, 3.0, 4.0], 3);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[1], &[2.0, 3.0, 4.0][..]);
/// ```
pub fn moving_subgroups(values: &[f64], size: usize) -> Vec<&[f64]> {
    if size == 0 {
        return Vec::new();
    }
    values.windows(size).collect()
}

/// Arithmetic mean of each subgroup.
pub fn means(subgroups: &[&[f64]]) -> Vec<f64> {
    subgroups.iter().filter_map(|g| stats::mean(g)).collect()
}

/// Range (`max - min`) of each subgroup.
pub fn ranges(subgroups: &[&[f64]]) -> Vec<f64> {
    subgroups.iter().filter_map(|g| subgroup_range(g)).collect()
}

/// Compute the range (max - min) of a subgroup, `None` if empty.
fn subgroup_range(subgroup: &[f64]) -> Option<f64> {
    let max_val = stats::max(subgroup)?;
    let min_val = stats::min(subgroup)?;
    Some(max_val - min_val)
}
