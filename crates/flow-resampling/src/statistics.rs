//! Turning an ensemble of sub-sample estimates into per-bin errors
//!
//! The nominal estimate keeps its central values. Only its uncertainties are
//! replaced, by the standard error of a per-bin *stat profile* filled from the
//! replicas:
//!
//! - **variance of samples**: every replica's bin content
//! - **jackknife**: for each held-out replica, the mean of the others
//! - **bootstrap**: for each resample, the mean of `N` replicas drawn with
//!   replacement

use crate::types::{ResamplingConfig, StatMethod, DEFAULT_RESAMPLES};
use flow_core::utils::mean_at;
use flow_core::{Error, Result};
use flow_histogram::{Binned, Estimator, Profile};
use rand::prelude::*;
use tracing::{debug, instrument, warn};

/// Resampling statistics engine
#[derive(Debug, Clone)]
pub struct ResamplingStatistics {
    n_resamples: usize,
    seed: Option<u64>,
}

impl Default for ResamplingStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl ResamplingStatistics {
    /// Create an engine with the default number of resamples and no seed
    pub fn new() -> Self {
        Self {
            n_resamples: DEFAULT_RESAMPLES,
            seed: None,
        }
    }

    /// Create an engine from serializable settings
    ///
    /// Fails when `n_resamples` is zero.
    pub fn from_config(config: &ResamplingConfig) -> Result<Self> {
        if config.n_resamples == 0 {
            return Err(Error::InvalidParameter(
                "Number of resamples must be positive".to_string(),
            ));
        }
        Ok(Self {
            n_resamples: config.n_resamples,
            seed: config.seed,
        })
    }

    /// Set the number of bootstrap resamples
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        assert!(n_resamples > 0, "Number of resamples must be positive");
        self.n_resamples = n_resamples;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Attach resampling errors to the nominal estimate
    ///
    /// Fails when the replicas do not share one binning or when there are too
    /// few of them for `method`. If the replicas' binning differs from the
    /// nominal's, a warning is logged and the nominal is returned unchanged.
    #[instrument(skip(self, nominal, replicas, method), fields(n_replicas = replicas.len(), method = %method))]
    pub fn estimate(
        &self,
        nominal: &Estimator,
        replicas: &[Estimator],
        method: StatMethod,
    ) -> Result<Estimator> {
        let profile = self.stat_profile(replicas, method)?;
        apply_stat_errors(nominal, &profile)
    }

    /// Build the per-bin stat profile for `method`
    pub fn stat_profile(&self, replicas: &[Estimator], method: StatMethod) -> Result<Profile> {
        validate(replicas, method)?;
        let profile = match method {
            StatMethod::Bootstrap => self.bootstrap_profile(replicas),
            StatMethod::Jackknife => jackknife_profile(replicas),
            StatMethod::VarianceOfSamples => variance_profile(replicas),
        };
        Ok(profile)
    }

    fn bootstrap_profile(&self, replicas: &[Estimator]) -> Profile {
        let n = replicas.len();
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(
            "Drawing {} bootstrap resamples of {} replicas with seed {}",
            self.n_resamples, n, seed
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let values: Vec<&[f64]> = replicas.iter().map(|r| r.values()).collect();
        let mut profile = empty_profile(replicas);
        let mut draw: Vec<&[f64]> = Vec::with_capacity(n);
        for _ in 0..self.n_resamples {
            draw.clear();
            draw.extend((0..n).map(|_| values[rng.gen_range(0..n)]));
            for bin in 0..profile.len() {
                profile.fill_bin(bin, mean_at(&draw, bin));
            }
        }
        profile
    }
}

/// Every replica must share the first replica's binning, and there must be
/// enough of them for the method
fn validate(replicas: &[Estimator], method: StatMethod) -> Result<()> {
    if replicas.len() < method.min_samples() {
        return Err(Error::InsufficientSamples {
            method: method.name(),
            required: method.min_samples(),
            actual: replicas.len(),
        });
    }
    if let Some((first, rest)) = replicas.split_first() {
        for replica in rest {
            first.ensure_compatible(replica)?;
        }
    }
    Ok(())
}

fn empty_profile(replicas: &[Estimator]) -> Profile {
    let first = &replicas[0];
    Profile::new(format!("{} stat", first.name()), first.axis().clone())
}

fn variance_profile(replicas: &[Estimator]) -> Profile {
    let mut profile = empty_profile(replicas);
    for replica in replicas {
        for (bin, &value) in replica.values().iter().enumerate() {
            profile.fill_bin(bin, value);
        }
    }
    profile
}

fn jackknife_profile(replicas: &[Estimator]) -> Profile {
    let mut profile = empty_profile(replicas);
    for held_out in 0..replicas.len() {
        let others: Vec<&[f64]> = replicas
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != held_out)
            .map(|(_, r)| r.values())
            .collect();
        for bin in 0..profile.len() {
            profile.fill_bin(bin, mean_at(&others, bin));
        }
    }
    profile
}

/// Replace the nominal errors by the stat profile's errors of the mean
///
/// Bins whose nominal content is exactly zero keep their error. A stat profile
/// on a different binning is skipped with a warning.
pub fn apply_stat_errors(nominal: &Estimator, stat: &Profile) -> Result<Estimator> {
    if !nominal.is_compatible(stat) {
        warn!(
            "Binning of '{}' ({}) differs from its stat profile ({}), errors not applied",
            nominal.name(),
            nominal.axis(),
            stat.axis()
        );
        return Ok(nominal.clone());
    }

    let errors = (0..nominal.len())
        .map(|bin| {
            if nominal.value(bin) == 0.0 {
                nominal.error(bin)
            } else {
                stat.bin_error(bin)
            }
        })
        .collect();
    nominal.clone().with_errors(errors)
}
