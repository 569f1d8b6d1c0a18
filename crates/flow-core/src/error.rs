//! Error types for flow cumulant analysis
//!
//! Provides a unified error type for all flow-stats crates.

use crate::SampleIndex;
use thiserror::Error;

/// Core error type for cumulant and resampling operations
#[derive(Error, Debug)]
pub enum Error {
    /// A named raw quantity is absent from a store
    #[error("Lookup failure: no estimator named '{key}' for sample {sample}")]
    LookupFailure { key: String, sample: SampleIndex },

    /// Two estimators with incompatible binnings were combined
    #[error("Binning mismatch between '{left}' and '{right}'")]
    BinningMismatch { left: String, right: String },

    /// Particle-count order outside the supported set
    #[error("Unsupported correlator order {order}: expected one of 2, 4, 6, 8")]
    UnsupportedOrder { order: u8 },

    /// Too few replicas for the requested statistics method
    #[error("Insufficient samples for {method}: expected at least {required}, got {actual}")]
    InsufficientSamples {
        method: &'static str,
        required: usize,
        actual: usize,
    },

    /// The observable has no complete moment-to-cumulant expansion
    #[error("Incomplete formula for {operation}: missing terms {missing:?}")]
    IncompleteFormula {
        operation: &'static str,
        missing: &'static [&'static str],
    },

    /// The observable needs central moments of Δpt but the store has none
    #[error("{operation} requires central-moment decomposition, which the store does not provide")]
    CentralMomentsUnavailable { operation: &'static str },

    /// Failure while evaluating a named observable
    #[error("{operation} failed for sample {sample}: {source}")]
    Observable {
        operation: &'static str,
        sample: SampleIndex,
        #[source]
        source: Box<Error>,
    },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a lookup failure for a named quantity
    pub fn lookup(key: impl Into<String>, sample: SampleIndex) -> Self {
        Self::LookupFailure {
            key: key.into(),
            sample,
        }
    }

    /// Create a binning mismatch naming both operands
    pub fn binning_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::BinningMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Attach observable context to an error
    pub fn in_observable(self, operation: &'static str, sample: SampleIndex) -> Self {
        Self::Observable {
            operation,
            sample,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping observable context wrappers
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Observable { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::lookup("ChGap22pt1_Mpt0", SampleIndex::Replica(3));
        assert_eq!(
            err.to_string(),
            "Lookup failure: no estimator named 'ChGap22pt1_Mpt0' for sample 3"
        );

        let err = Error::binning_mismatch("ChGap22", "mpt");
        assert_eq!(err.to_string(), "Binning mismatch between 'ChGap22' and 'mpt'");

        let err = Error::UnsupportedOrder { order: 3 };
        assert_eq!(
            err.to_string(),
            "Unsupported correlator order 3: expected one of 2, 4, 6, 8"
        );

        let err = Error::InsufficientSamples {
            method: "jackknife",
            required: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient samples for jackknife: expected at least 2, got 1"
        );
    }

    #[test]
    fn test_root_cause_unwraps_context() {
        let err = Error::lookup("ChGap24pt1", SampleIndex::Nominal)
            .in_observable("cv24_pt", SampleIndex::Nominal)
            .in_observable("outer", SampleIndex::Nominal);

        assert!(matches!(err.root_cause(), Error::LookupFailure { .. }));
        assert!(err.to_string().starts_with("outer failed for sample -1"));
    }

    #[test]
    fn test_root_cause_of_plain_error_is_itself() {
        let err = Error::InvalidInput("empty".to_string());
        assert!(matches!(err.root_cause(), Error::InvalidInput(_)));
    }
}
