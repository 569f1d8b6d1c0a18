//! One raw quantity tracked over the nominal sample and its sub-samples

use flow_core::{Error, Result, SampleIndex};
use flow_histogram::{Axis, Binned, Estimator, Profile};

/// A nominal profile plus `N` independent sub-sample profiles on one axis
///
/// Online filling assigns each event to exactly one random sub-sample, so a
/// fill always lands in the nominal profile and in one replica.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledProfile {
    nominal: Profile,
    replicas: Vec<Profile>,
}

impl ResampledProfile {
    /// Create an empty profile with `n_replicas` sub-samples
    pub fn new(name: impl Into<String>, axis: Axis, n_replicas: usize) -> Self {
        let name = name.into();
        let replicas = (0..n_replicas)
            .map(|_| Profile::new(name.clone(), axis.clone()))
            .collect();
        Self {
            nominal: Profile::new(name, axis),
            replicas,
        }
    }

    /// Assemble from already filled profiles
    pub fn from_profiles(nominal: Profile, replicas: Vec<Profile>) -> Result<Self> {
        for replica in &replicas {
            nominal.ensure_compatible(replica)?;
        }
        Ok(Self { nominal, replicas })
    }

    /// Number of sub-samples
    pub fn n_replicas(&self) -> usize {
        self.replicas.len()
    }

    /// Fill the nominal profile and sub-sample `replica`
    ///
    /// Returns `Ok(false)` when `x` is outside the axis.
    pub fn fill(&mut self, x: f64, y: f64, w: f64, replica: usize) -> Result<bool> {
        let n = self.replicas.len();
        let sub = self.replicas.get_mut(replica).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "Sub-sample {replica} out of range for '{}' with {n} sub-samples",
                self.nominal.name()
            ))
        })?;
        let filled = sub.fill(x, y, w);
        self.nominal.fill(x, y, w);
        Ok(filled)
    }

    /// Profile behind one sample index
    pub fn profile(&self, sample: SampleIndex) -> Result<&Profile> {
        match sample {
            SampleIndex::Nominal => Ok(&self.nominal),
            SampleIndex::Replica(i) => self
                .replicas
                .get(i)
                .ok_or_else(|| Error::lookup(self.nominal.name(), sample)),
        }
    }

    /// Project one sample to an estimator
    pub fn get(&self, sample: SampleIndex) -> Result<Estimator> {
        Ok(self.profile(sample)?.to_estimator())
    }

    /// Replace the nominal content by sub-sample `replica`
    pub fn override_nominal_with(&mut self, replica: usize) -> Result<()> {
        let sub = self.profile(SampleIndex::Replica(replica))?.clone();
        self.nominal = sub;
        Ok(())
    }

    /// Rebin the nominal and every sub-sample onto a coarser axis
    pub fn rebinned(&self, target: &Axis) -> Result<Self> {
        Ok(Self {
            nominal: self.nominal.rebin(target)?,
            replicas: self
                .replicas
                .iter()
                .map(|p| p.rebin(target))
                .collect::<Result<_>>()?,
        })
    }
}

impl Binned for ResampledProfile {
    fn name(&self) -> &str {
        self.nominal.name()
    }

    fn axis(&self) -> &Axis {
        self.nominal.axis()
    }
}
