//! Binned estimators and profiles for flow cumulant analysis
//!
//! This crate provides the binned primitives that every raw correlator and
//! every derived cumulant is expressed in:
//!
//! - **[`Axis`]**: bin edges over one external variable (multiplicity, centrality)
//! - **[`Estimator`]**: one value and one uncertainty per bin, value-like
//! - **[`Profile`]**: per-bin weighted running mean and spread, rebinnable
//! - **[`EstimatorOps`]**: bin-wise algebra with error propagation
//!
//! Two binned quantities are compatible only if their bin edges are identical;
//! every binary operation checks this and reports a binning mismatch naming
//! both operands otherwise.
//!
//! # Examples
//!
//! ## Estimator algebra
//!
//! ```rust
//! use flow_histogram::{Axis, Estimator, EstimatorOps};
//!
//! let axis = Axis::uniform(5, 0.0, 50.0).unwrap();
//! let c22 = Estimator::constant("ChGap22", axis.clone(), 0.1);
//! let mpt = Estimator::constant("mpt", axis, 0.3);
//!
//! let product = c22.multiply(&mpt).unwrap();
//! assert!((product.value(0) - 0.03).abs() < 1e-12);
//!
//! // operands are untouched and can be reused
//! assert_eq!(c22.value(0), 0.1);
//! ```
//!
//! ## Profiles
//!
//! ```rust
//! use flow_histogram::{Axis, Profile};
//!
//! let axis = Axis::uniform(2, 0.0, 10.0).unwrap();
//! let mut profile = Profile::new("ChGap22", axis);
//! profile.fill(2.5, 0.04, 120.0);
//! profile.fill(3.0, 0.06, 80.0);
//!
//! let estimator = profile.to_estimator();
//! assert!((estimator.value(0) - 0.048).abs() < 1e-12);
//! ```

pub mod ops;
pub mod profile;
pub mod traits;
pub mod types;

// Re-export main types and traits
pub use ops::EstimatorOps;
pub use profile::{BinStats, Profile};
pub use traits::Binned;
pub use types::{Axis, Estimator};

pub use flow_core::Result;
