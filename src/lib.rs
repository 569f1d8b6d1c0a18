//! # flow-stats
//!
//! Flow cumulants, flow-pt covariant cumulants and their resampling errors,
//! derived from pre-aggregated correlator estimators.
//!
//! The workspace is split by concern:
//!
//! - [`flow_core`]: error taxonomy and sample indices
//! - [`flow_histogram`]: binned estimators, profiles and bin-wise algebra
//! - [`flow_store`]: lookup contracts and in-memory correlator stores
//! - [`flow_cumulant`]: the cumulant engine and its observable table
//! - [`flow_resampling`]: bootstrap, jackknife and variance-of-samples errors
//!
//! [`FlowAnalysis`] ties the engine and the resampling step together.
//!
//! # Example
//!
//! ```rust
//! use flow_stats::prelude::*;
//!
//! let axis = Axis::uniform(1, 0.0, 100.0).unwrap();
//! let mut correlators = CorrelatorContainer::new(axis.clone(), 4);
//! let key = CorrelatorKey::new("ChGap", 2, 2).unwrap();
//! for (replica, value) in [0.0024, 0.0026, 0.0025, 0.0025].into_iter().enumerate() {
//!     correlators.fill(&key, 50.0, value, 1.0, replica).unwrap();
//! }
//! let flow_pt = FlowPtContainer::new(axis, 4);
//!
//! let engine = CumulantEngine::new(correlators, flow_pt);
//! let analysis = FlowAnalysis::new(engine, ResamplingStatistics::new(), None);
//! let c22 = analysis.observable(Observable::C22, StatMethod::Jackknife).unwrap();
//! assert!((c22.value(0) - 0.0025).abs() < 1e-12);
//! assert!(c22.error(0) > 0.0);
//! ```

pub mod analysis;

pub use analysis::FlowAnalysis;

// Re-export member crates
pub use flow_core;
pub use flow_cumulant;
pub use flow_histogram;
pub use flow_resampling;
pub use flow_store;

pub use flow_core::{Error, Result, SampleIndex};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::FlowAnalysis;
    pub use flow_core::{Error, Result, SampleIndex};
    pub use flow_cumulant::{CumulantEngine, EngineConfig, Observable};
    pub use flow_histogram::{Axis, Binned, Estimator, EstimatorOps, Profile};
    pub use flow_resampling::{ResamplingConfig, ResamplingStatistics, StatMethod};
    pub use flow_store::{
        CorrelatorContainer, CorrelatorKey, FlowPtContainer, FlowPtStore, MomentKey,
        RawCorrelatorStore, ResampledProfile,
    };
}
