//! One-call helpers for the common resampling setups

use crate::statistics::ResamplingStatistics;
use crate::types::StatMethod;
use flow_core::Result;
use flow_histogram::Estimator;

/// Bootstrap errors with `n_resamples` draws and an optional fixed seed
///
/// # Example
/// ```rust
/// use flow_histogram::{Axis, Estimator};
/// use flow_resampling::{bootstrap_errors, DEFAULT_RESAMPLES};
///
/// let axis = Axis::uniform(1, 0.0, 1.0).unwrap();
/// let nominal = Estimator::from_values("v22", axis.clone(), vec![0.06]).unwrap();
/// let replicas: Vec<_> = [0.058, 0.061, 0.063]
///     .iter()
///     .map(|&v| Estimator::from_values("v22", axis.clone(), vec![v]).unwrap())
///     .collect();
///
/// let result = bootstrap_errors(&nominal, &replicas, DEFAULT_RESAMPLES, Some(1)).unwrap();
/// assert!(result.error(0) > 0.0);
/// ```
pub fn bootstrap_errors(
    nominal: &Estimator,
    replicas: &[Estimator],
    n_resamples: usize,
    seed: Option<u64>,
) -> Result<Estimator> {
    let mut stats = ResamplingStatistics::new().with_resamples(n_resamples);
    if let Some(seed) = seed {
        stats = stats.with_seed(seed);
    }
    stats.estimate(nominal, replicas, StatMethod::Bootstrap)
}

/// Jackknife errors
pub fn jackknife_errors(nominal: &Estimator, replicas: &[Estimator]) -> Result<Estimator> {
    ResamplingStatistics::new().estimate(nominal, replicas, StatMethod::Jackknife)
}

/// Errors from the spread of the replicas
pub fn variance_of_samples_errors(
    nominal: &Estimator,
    replicas: &[Estimator],
) -> Result<Estimator> {
    ResamplingStatistics::new().estimate(nominal, replicas, StatMethod::VarianceOfSamples)
}
