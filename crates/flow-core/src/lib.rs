//! Core types for flow cumulant analysis
//!
//! This crate provides the pieces every other flow-stats crate builds on:
//!
//! - **Error taxonomy**: [`Error`] and the [`Result`] alias used throughout
//! - **Sample indices**: [`SampleIndex`] distinguishes the nominal estimate
//!   from the independent sub-samples used for resampling
//! - **Numeric helpers**: small slice utilities in [`utils`]
//!
//! # Example
//!
//! ```rust
//! use flow_core::{Error, SampleIndex};
//!
//! let nominal = SampleIndex::try_from(-1i64).unwrap();
//! assert!(nominal.is_nominal());
//!
//! let err = Error::lookup("ChGap22pt1_Mpt0", SampleIndex::Replica(2));
//! assert!(matches!(err.root_cause(), Error::LookupFailure { .. }));
//! ```

pub mod error;
pub mod sample;
pub mod utils;

pub use error::{Error, Result};
pub use sample::SampleIndex;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::{Result, SampleIndex};
}
