//! Configuration types for resampling statistics

use flow_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 1000;

/// Fast number of resamples for quick estimates
pub const FAST_RESAMPLES: usize = 200;

/// High-precision number of resamples
pub const HIGH_PRECISION_RESAMPLES: usize = 10000;

/// How the per-bin error is derived from the sub-sample ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatMethod {
    /// Resample the replicas with replacement and take the spread of the means
    #[default]
    Bootstrap,
    /// Leave one replica out at a time and take the spread of the means
    Jackknife,
    /// Take the spread of the replicas themselves
    VarianceOfSamples,
}

impl StatMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Jackknife => "jackknife",
            Self::VarianceOfSamples => "variance of samples",
        }
    }

    /// Smallest ensemble the method is defined for
    pub fn min_samples(&self) -> usize {
        match self {
            Self::Bootstrap => 1,
            Self::Jackknife | Self::VarianceOfSamples => 2,
        }
    }
}

impl fmt::Display for StatMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "bootstrap" => Ok(Self::Bootstrap),
            "jackknife" => Ok(Self::Jackknife),
            "variance of samples" | "variance" => Ok(Self::VarianceOfSamples),
            _ => Err(Error::InvalidInput(format!("Unknown statistics method '{s}'"))),
        }
    }
}

/// Serializable settings for [`ResamplingStatistics`](crate::ResamplingStatistics)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResamplingConfig {
    /// Number of bootstrap resamples
    pub n_resamples: usize,
    /// Seed for the bootstrap draws; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for ResamplingConfig {
    fn default() -> Self {
        Self {
            n_resamples: DEFAULT_RESAMPLES,
            seed: None,
        }
    }
}
