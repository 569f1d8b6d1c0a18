//! Flow cumulants and flow-pt covariant cumulants
//!
//! [`CumulantEngine`] combines raw correlators from a [`RawCorrelatorStore`]
//! with joint flow-pt moments from a [`FlowPtStore`] into connected cumulants,
//! for the nominal sample or any single sub-sample. [`Observable`] names the
//! closed set of quantities the engine can evaluate.
//!
//! # Example
//!
//! ```rust
//! use flow_core::SampleIndex;
//! use flow_cumulant::{CumulantEngine, Observable};
//! use flow_histogram::Axis;
//! use flow_store::{CorrelatorContainer, CorrelatorKey, FlowPtContainer, MomentKey};
//!
//! let axis = Axis::uniform(1, 0.0, 100.0).unwrap();
//! let mut correlators = CorrelatorContainer::new(axis.clone(), 1);
//! let mut flow_pt = FlowPtContainer::new(axis, 1).with_central_moments(true);
//!
//! let c22 = CorrelatorKey::new("ChGap", 2, 2).unwrap();
//! correlators.fill(&c22, 50.0, 0.1, 1.0, 0).unwrap();
//! flow_pt.fill_mean_pt(50.0, 0.3, 1.0, 0).unwrap();
//! let m0 = MomentKey::new("ChGap", 2, 2, 1).with_mpt(0);
//! flow_pt.fill_moment(&m0, 50.0, 0.05, 1.0, 0).unwrap();
//!
//! let engine = CumulantEngine::new(correlators, flow_pt);
//! let cv22 = engine.calculate(Observable::Cv22Pt, SampleIndex::Nominal).unwrap();
//! assert!((cv22.value(0) - 0.02).abs() < 1e-12);
//! ```

pub mod config;
pub mod engine;
pub mod observable;

pub use config::EngineConfig;
pub use engine::{
    CumulantEngine, PartialCumulant, CV24_PT2_MISSING_TERMS, CV4_CM2_SQUARED_MULTIPLICITY,
};
pub use observable::{Observable, ObservableFn};

pub use flow_store::{FlowPtStore, RawCorrelatorStore};
