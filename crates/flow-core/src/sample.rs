//! Sample indices for nominal and resampling-replica estimates

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which statistical sample an estimator is drawn from
///
/// The raw integer convention is `-1` for the nominal (full statistics)
/// estimate and `0..N` for the independent equal-size sub-samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SampleIndex {
    /// Full-statistics estimate
    Nominal,
    /// One independent sub-sample
    Replica(usize),
}

impl SampleIndex {
    /// Whether this is the nominal estimate
    pub fn is_nominal(&self) -> bool {
        matches!(self, Self::Nominal)
    }

    /// Replica number, if any
    pub fn replica(&self) -> Option<usize> {
        match self {
            Self::Nominal => None,
            Self::Replica(i) => Some(*i),
        }
    }

    /// Raw integer form (`-1` for nominal)
    pub fn as_raw(&self) -> i64 {
        match self {
            Self::Nominal => -1,
            Self::Replica(i) => *i as i64,
        }
    }

    /// Iterate over the first `n` replica indices
    pub fn replicas(n: usize) -> impl Iterator<Item = SampleIndex> {
        (0..n).map(SampleIndex::Replica)
    }
}

impl TryFrom<i64> for SampleIndex {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        match raw {
            -1 => Ok(Self::Nominal),
            i if i >= 0 => Ok(Self::Replica(i as usize)),
            other => Err(Error::InvalidInput(format!(
                "Sample index {other} is neither -1 (nominal) nor a replica index"
            ))),
        }
    }
}

impl From<usize> for SampleIndex {
    fn from(replica: usize) -> Self {
        Self::Replica(replica)
    }
}

impl fmt::Display for SampleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}
