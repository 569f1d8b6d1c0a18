//! Profiles: per-bin running mean and spread of a filled quantity
//!
//! A profile is the accumulator behind every raw correlator and every
//! resampling statistic. Each bin keeps weighted Welford moments so that the
//! spread of identical fills is exactly zero and bins can be merged without
//! revisiting the fills.

use crate::traits::Binned;
use crate::types::{Axis, Estimator};
use flow_core::{Error, Result};

/// Weighted running moments of one bin
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BinStats {
    /// Number of fills
    pub entries: u64,
    /// Sum of weights
    pub sum_w: f64,
    /// Sum of squared weights
    pub sum_w2: f64,
    /// Weighted mean of the filled values
    pub mean: f64,
    /// Weighted sum of squared deviations from the mean
    pub m2: f64,
}

impl BinStats {
    /// Add one weighted value
    pub fn fill(&mut self, y: f64, w: f64) {
        self.entries += 1;
        if w == 0.0 {
            return;
        }
        self.sum_w += w;
        self.sum_w2 += w * w;
        let delta = y - self.mean;
        self.mean += delta * w / self.sum_w;
        self.m2 += w * delta * (y - self.mean);
    }

    /// Combine with another bin's moments
    pub fn merge(&self, other: &BinStats) -> BinStats {
        let sum_w = self.sum_w + other.sum_w;
        if sum_w == 0.0 {
            return BinStats::default();
        }
        let delta = other.mean - self.mean;
        BinStats {
            entries: self.entries + other.entries,
            sum_w,
            sum_w2: self.sum_w2 + other.sum_w2,
            mean: self.mean + delta * other.sum_w / sum_w,
            m2: self.m2 + other.m2 + delta * delta * self.sum_w * other.sum_w / sum_w,
        }
    }

    /// Weighted population spread of the filled values
    pub fn rms(&self) -> f64 {
        if self.sum_w <= 0.0 {
            return 0.0;
        }
        (self.m2 / self.sum_w).max(0.0).sqrt()
    }

    /// Effective number of entries, `(Σw)² / Σw²`
    pub fn effective_entries(&self) -> f64 {
        if self.sum_w2 <= 0.0 {
            return 0.0;
        }
        self.sum_w * self.sum_w / self.sum_w2
    }

    /// Standard error of the mean
    pub fn error_of_mean(&self) -> f64 {
        let n_eff = self.effective_entries();
        if n_eff <= 0.0 {
            return 0.0;
        }
        self.rms() / n_eff.sqrt()
    }
}

/// A profile over one axis
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    name: String,
    axis: Axis,
    bins: Vec<BinStats>,
}

impl Profile {
    /// Create an empty profile
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        let bins = vec![BinStats::default(); axis.n_bins()];
        Self {
            name: name.into(),
            axis,
            bins,
        }
    }

    /// Fill value `y` with weight `w` at position `x`
    ///
    /// Returns `false` when `x` falls outside the axis and nothing was filled.
    pub fn fill(&mut self, x: f64, y: f64, w: f64) -> bool {
        match self.axis.find_bin(x) {
            Some(bin) => {
                self.bins[bin].fill(y, w);
                true
            }
            None => false,
        }
    }

    /// Fill value `y` with unit weight directly into `bin`
    pub fn fill_bin(&mut self, bin: usize, y: f64) {
        self.bins[bin].fill(y, 1.0);
    }

    /// Moments of one bin
    pub fn bin(&self, bin: usize) -> &BinStats {
        &self.bins[bin]
    }

    /// Mean of one bin
    pub fn bin_mean(&self, bin: usize) -> f64 {
        self.bins[bin].mean
    }

    /// Weighted spread of the entries in one bin
    pub fn bin_rms(&self, bin: usize) -> f64 {
        self.bins[bin].rms()
    }

    /// Standard error of the mean of one bin
    pub fn bin_error(&self, bin: usize) -> f64 {
        self.bins[bin].error_of_mean()
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Check if the profile has no bins
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total number of fills
    pub fn entries(&self) -> u64 {
        self.bins.iter().map(|b| b.entries).sum()
    }

    /// Merge another profile's fills into a copy of this one
    pub fn merged(&self, other: &Profile) -> Result<Profile> {
        self.ensure_compatible(other)?;
        let bins = self
            .bins
            .iter()
            .zip(&other.bins)
            .map(|(a, b)| a.merge(b))
            .collect();
        Ok(Profile {
            name: self.name.clone(),
            axis: self.axis.clone(),
            bins,
        })
    }

    /// Rebin onto a coarser axis whose edges are a subset of this axis' edges
    pub fn rebin(&self, target: &Axis) -> Result<Profile> {
        if target == &self.axis {
            return Ok(self.clone());
        }
        let mapping = self.axis.projection_onto(target).ok_or_else(|| {
            Error::binning_mismatch(self.name.clone(), format!("rebin target {target}"))
        })?;
        let mut bins = vec![BinStats::default(); target.n_bins()];
        for (fine, &coarse) in mapping.iter().enumerate() {
            bins[coarse] = bins[coarse].merge(&self.bins[fine]);
        }
        Ok(Profile {
            name: self.name.clone(),
            axis: target.clone(),
            bins,
        })
    }

    /// Project to an estimator: bin means with their standard errors
    pub fn to_estimator(&self) -> Estimator {
        let values = self.bins.iter().map(|b| b.mean).collect();
        let errors = self.bins.iter().map(|b| b.error_of_mean()).collect();
        Estimator::from_parts(self.name.clone(), self.axis.clone(), values, errors)
    }
}

impl Binned for Profile {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis(&self) -> &Axis {
        &self.axis
    }
}
