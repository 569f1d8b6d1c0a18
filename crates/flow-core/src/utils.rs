//! Small numeric helpers shared across the workspace

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
///
/// # Examples
///
/// ```rust
/// use flow_core::utils::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Mean of the values at `bin` across a set of per-sample value slices
///
/// Slices shorter than `bin + 1` are skipped.
pub fn mean_at(samples: &[&[f64]], bin: usize) -> f64 {
    let values: Vec<f64> = samples.iter().filter_map(|s| s.get(bin).copied()).collect();
    mean(&values)
}
