//! Store contracts for raw correlators and joint flow-pt moments
//!
//! The cumulant engine never computes correlators itself. It reads them from
//! two collaborators:
//!
//! - **[`RawCorrelatorStore`]**: multi-particle angular correlators versus an
//!   external binning variable, with sub-sample views and `v_n{k}` retrieval
//! - **[`FlowPtStore`]**: joint moments of flow and Δpt addressed by
//!   [`MomentKey`], the mean pt and the central moments of Δpt
//!
//! Both contracts come with in-memory implementations ([`CorrelatorContainer`]
//! and [`FlowPtContainer`]) built on [`ResampledProfile`].
//!
//! # Example
//!
//! ```rust
//! use flow_core::SampleIndex;
//! use flow_histogram::Axis;
//! use flow_store::{CorrelatorContainer, CorrelatorKey, RawCorrelatorStore};
//!
//! let axis = Axis::uniform(1, 0.0, 100.0).unwrap();
//! let mut store = CorrelatorContainer::new(axis, 2);
//! let key = CorrelatorKey::new("ChGap", 2, 2).unwrap();
//! store.fill(&key, 42.0, 0.0025, 1.0, 0).unwrap();
//!
//! let v22 = store.flow_coefficient(2, 2, "ChGap").unwrap();
//! assert!((v22.value(0) - 0.05).abs() < 1e-12);
//!
//! let sub = store.sub_sample(0).unwrap();
//! assert_eq!(sub.view(), SampleIndex::Replica(0));
//! ```

pub mod correlator;
pub mod flow_pt;
pub mod key;
pub mod resampled;

pub use correlator::{CorrelatorContainer, RawCorrelatorStore};
pub use flow_pt::{FlowPtContainer, FlowPtStore};
pub use key::{check_order, CorrelatorKey, MomentKey, SUPPORTED_ORDERS};
pub use resampled::ResampledProfile;
