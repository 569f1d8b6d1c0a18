//! Joint flow and transverse-momentum moment stores

use crate::key::MomentKey;
use crate::resampled::ResampledProfile;
use flow_core::{Error, Result, SampleIndex};
use flow_histogram::{Axis, Binned, Estimator};
use std::collections::{BTreeMap, HashMap};

/// Lookup contract for pre-tabulated joint moments of flow and Δpt
pub trait FlowPtStore: Send + Sync {
    /// Whether the joint moments come with a central-moment decomposition
    /// (the `_Mpt{j}` terms plus central moments of Δpt)
    fn uses_central_moments(&self) -> bool;

    /// One named joint moment for one sample
    fn joint_moment(&self, key: &MomentKey, sample: SampleIndex) -> Result<Estimator>;

    /// Mean transverse momentum (the order-1 pt correlation)
    fn mean_pt(&self, sample: SampleIndex) -> Result<Estimator>;

    /// Raw `k`-th central moment of Δpt, `k >= 2`
    fn central_moment(&self, sample: SampleIndex, k: u8) -> Result<Estimator>;
}

/// In-memory flow-pt store
#[derive(Debug, Clone)]
pub struct FlowPtContainer {
    axis: Axis,
    n_samples: usize,
    central_moments_enabled: bool,
    moments: HashMap<MomentKey, ResampledProfile>,
    mean_pt: Option<ResampledProfile>,
    central_moments: BTreeMap<u8, ResampledProfile>,
    multi_rebin: Option<Axis>,
}

impl FlowPtContainer {
    /// Create an empty store with `n_samples` sub-samples on `axis`
    pub fn new(axis: Axis, n_samples: usize) -> Self {
        Self {
            axis,
            n_samples,
            central_moments_enabled: false,
            moments: HashMap::new(),
            mean_pt: None,
            central_moments: BTreeMap::new(),
            multi_rebin: None,
        }
    }

    /// Declare whether the central-moment decomposition is available
    pub fn with_central_moments(mut self, enabled: bool) -> Self {
        self.central_moments_enabled = enabled;
        self
    }

    /// Rebin every projection onto `edges`
    pub fn with_multi_rebin(mut self, edges: Vec<f64>) -> Result<Self> {
        let target = Axis::from_edges(edges)?;
        if self.axis.projection_onto(&target).is_none() {
            return Err(Error::binning_mismatch(
                format!("flow-pt store {}", self.axis),
                format!("multi-rebin {target}"),
            ));
        }
        self.multi_rebin = Some(target);
        Ok(self)
    }

    /// Number of sub-samples
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    fn check(&self, name: &str, profile: &ResampledProfile) -> Result<()> {
        if profile.axis() != &self.axis {
            return Err(Error::binning_mismatch(name, "flow-pt store axis"));
        }
        if profile.n_replicas() != self.n_samples {
            return Err(Error::InvalidInput(format!(
                "'{name}' has {} sub-samples, store expects {}",
                profile.n_replicas(),
                self.n_samples
            )));
        }
        Ok(())
    }

    /// Add a filled joint-moment profile
    pub fn insert_moment(&mut self, key: MomentKey, profile: ResampledProfile) -> Result<()> {
        self.check(&key.to_string(), &profile)?;
        self.moments.insert(key, profile);
        Ok(())
    }

    /// Add the filled mean-pt profile
    pub fn insert_mean_pt(&mut self, profile: ResampledProfile) -> Result<()> {
        self.check("mpt", &profile)?;
        self.mean_pt = Some(profile);
        Ok(())
    }

    /// Add the filled `k`-th central moment profile
    pub fn insert_central_moment(&mut self, k: u8, profile: ResampledProfile) -> Result<()> {
        self.check(&format!("cm{k}"), &profile)?;
        self.central_moments.insert(k, profile);
        Ok(())
    }

    /// Fill one event's joint-moment value
    pub fn fill_moment(
        &mut self,
        key: &MomentKey,
        x: f64,
        value: f64,
        weight: f64,
        replica: usize,
    ) -> Result<bool> {
        let (axis, n) = (&self.axis, self.n_samples);
        self.moments
            .entry(key.clone())
            .or_insert_with(|| ResampledProfile::new(key.to_string(), axis.clone(), n))
            .fill(x, value, weight, replica)
    }

    /// Fill one event's mean pt
    pub fn fill_mean_pt(&mut self, x: f64, value: f64, weight: f64, replica: usize) -> Result<bool> {
        let (axis, n) = (&self.axis, self.n_samples);
        self.mean_pt
            .get_or_insert_with(|| ResampledProfile::new("mpt", axis.clone(), n))
            .fill(x, value, weight, replica)
    }

    /// Fill one event's `k`-th central moment term
    pub fn fill_central_moment(
        &mut self,
        k: u8,
        x: f64,
        value: f64,
        weight: f64,
        replica: usize,
    ) -> Result<bool> {
        let (axis, n) = (&self.axis, self.n_samples);
        self.central_moments
            .entry(k)
            .or_insert_with(|| ResampledProfile::new(format!("cm{k}"), axis.clone(), n))
            .fill(x, value, weight, replica)
    }

    fn project(&self, profile: &ResampledProfile, sample: SampleIndex) -> Result<Estimator> {
        let selected = profile.profile(sample)?;
        match &self.multi_rebin {
            Some(target) => Ok(selected.rebin(target)?.to_estimator()),
            None => Ok(selected.to_estimator()),
        }
    }
}

impl FlowPtStore for FlowPtContainer {
    fn uses_central_moments(&self) -> bool {
        self.central_moments_enabled
    }

    fn joint_moment(&self, key: &MomentKey, sample: SampleIndex) -> Result<Estimator> {
        let profile = self
            .moments
            .get(key)
            .ok_or_else(|| Error::lookup(key.to_string(), sample))?;
        self.project(profile, sample)
    }

    fn mean_pt(&self, sample: SampleIndex) -> Result<Estimator> {
        let profile = self
            .mean_pt
            .as_ref()
            .ok_or_else(|| Error::lookup("mpt", sample))?;
        self.project(profile, sample)
    }

    fn central_moment(&self, sample: SampleIndex, k: u8) -> Result<Estimator> {
        if k < 2 {
            return Err(Error::InvalidParameter(format!(
                "Central moments start at order 2, got {k}"
            )));
        }
        let profile = self
            .central_moments
            .get(&k)
            .ok_or_else(|| Error::lookup(format!("cm{k}"), sample))?;
        self.project(profile, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn store() -> FlowPtContainer {
        let axis = Axis::uniform(2, 0.0, 2.0).unwrap();
        let mut store = FlowPtContainer::new(axis, 2).with_central_moments(true);
        let key = MomentKey::new("ChGap", 2, 2, 1).with_mpt(0);
        store.fill_moment(&key, 0.5, 0.02, 1.0, 0).unwrap();
        store.fill_moment(&key, 0.5, 0.04, 1.0, 1).unwrap();
        store.fill_mean_pt(0.5, 0.3, 1.0, 0).unwrap();
        store.fill_mean_pt(1.5, 0.5, 1.0, 1).unwrap();
        store.fill_central_moment(2, 0.5, 0.01, 1.0, 1).unwrap();
        store
    }

    #[test]
    fn test_joint_moment_per_sample() {
        let store = store();
        let key = MomentKey::new("ChGap", 2, 2, 1).with_mpt(0);
        let nominal = store.joint_moment(&key, SampleIndex::Nominal).unwrap();
        assert_relative_eq!(nominal.value(0), 0.03, epsilon = 1e-12);
        let second = store.joint_moment(&key, SampleIndex::Replica(1)).unwrap();
        assert_eq!(second.value(0), 0.04);
        assert_eq!(nominal.name(), "ChGap22pt1_Mpt0");
    }

    #[test]
    fn test_missing_key_is_lookup_failure() {
        let store = store();
        let key = MomentKey::new("ChGap", 2, 2, 1);
        match store.joint_moment(&key, SampleIndex::Replica(0)) {
            Err(Error::LookupFailure { key, sample }) => {
                assert_eq!(key, "ChGap22pt1");
                assert_eq!(sample, SampleIndex::Replica(0));
            }
            other => panic!("expected lookup failure, got {other:?}"),
        }
        assert!(matches!(
            store.central_moment(SampleIndex::Nominal, 3),
            Err(Error::LookupFailure { .. })
        ));
    }

    #[test]
    fn test_mean_pt_and_central_moments() {
        let store = store();
        let mpt = store.mean_pt(SampleIndex::Nominal).unwrap();
        assert_eq!(mpt.values(), &[0.3, 0.5]);
        let cm2 = store.central_moment(SampleIndex::Replica(1), 2).unwrap();
        assert_eq!(cm2.value(0), 0.01);
        assert!(matches!(
            store.central_moment(SampleIndex::Nominal, 1),
            Err(Error::InvalidParameter(_))
        ));
        assert!(store.uses_central_moments());
    }

    #[test]
    fn test_multi_rebin() {
        let store = store().with_multi_rebin(vec![0.0, 2.0]).unwrap();
        let mpt = store.mean_pt(SampleIndex::Nominal).unwrap();
        assert_eq!(mpt.len(), 1);
        assert_relative_eq!(mpt.value(0), 0.4, epsilon = 1e-12);

        let first = store.mean_pt(SampleIndex::Replica(0)).unwrap();
        let second = store.mean_pt(SampleIndex::Replica(1)).unwrap();
        assert_eq!(first.len(), 1);
        assert_relative_eq!(first.value(0), 0.3, epsilon = 1e-12);
        assert_relative_eq!(second.value(0), 0.5, epsilon = 1e-12);
        assert!(matches!(
            store.mean_pt(SampleIndex::Replica(5)),
            Err(Error::LookupFailure { .. })
        ));
    }

    #[test]
    fn test_insert_checks_axis_and_replicas() {
        let mut store = store();
        let other_axis = Axis::uniform(3, 0.0, 3.0).unwrap();
        let key = MomentKey::new("ChGap", 2, 2, 2).with_mpt(0);
        let wrong_axis = ResampledProfile::new(key.to_string(), other_axis, 2);
        assert!(matches!(
            store.insert_moment(key.clone(), wrong_axis),
            Err(Error::BinningMismatch { .. })
        ));
        let wrong_count = ResampledProfile::new(key.to_string(), Axis::uniform(2, 0.0, 2.0).unwrap(), 5);
        assert!(matches!(
            store.insert_moment(key, wrong_count),
            Err(Error::InvalidInput(_))
        ));
    }
}
