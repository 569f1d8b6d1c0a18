//! Resampling statistics for binned estimators
//!
//! This crate turns an ensemble of independent sub-sample estimates into an
//! uncertainty on the nominal estimate, with one of three methods:
//!
//! - **Bootstrap**: resample the replicas with replacement (the default)
//! - **Jackknife**: leave one replica out at a time
//! - **Variance of samples**: spread of the replicas themselves
//!
//! # Example
//!
//! ```rust
//! use flow_histogram::{Axis, Estimator};
//! use flow_resampling::{ResamplingStatistics, StatMethod};
//!
//! let axis = Axis::uniform(1, 0.0, 1.0).unwrap();
//! let nominal = Estimator::from_values("cv22pt", axis.clone(), vec![0.02]).unwrap();
//! let replicas: Vec<Estimator> = [0.018, 0.021, 0.02, 0.023]
//!     .iter()
//!     .map(|&v| Estimator::from_values("cv22pt", axis.clone(), vec![v]).unwrap())
//!     .collect();
//!
//! let stats = ResamplingStatistics::new().with_resamples(500).with_seed(42);
//! let result = stats.estimate(&nominal, &replicas, StatMethod::Bootstrap).unwrap();
//! assert_eq!(result.value(0), 0.02);
//! assert!(result.error(0) > 0.0);
//! ```

pub mod api;
mod statistics;
mod types;

pub use api::{bootstrap_errors, jackknife_errors, variance_of_samples_errors};
pub use statistics::{apply_stat_errors, ResamplingStatistics};
pub use types::{
    ResamplingConfig, StatMethod, DEFAULT_RESAMPLES, FAST_RESAMPLES, HIGH_PRECISION_RESAMPLES,
};
