//! Multi-particle correlator stores

use crate::key::{check_order, CorrelatorKey};
use crate::resampled::ResampledProfile;
use flow_core::{Error, Result, SampleIndex};
use flow_histogram::{Axis, Binned, Estimator, EstimatorOps};
use std::collections::HashMap;
use tracing::debug;

/// Lookup contract for multi-particle angular correlators
///
/// A store always presents one *view*: the nominal sample, or a sub-sample
/// produced by [`sub_sample`](RawCorrelatorStore::sub_sample). Lookups read
/// the current view only, so one derived quantity can never mix samples.
pub trait RawCorrelatorStore: Clone + Send + Sync {
    /// Owned copy restricted to sub-sample `replica`, rebinned to the store's
    /// multi-rebin edges
    fn sub_sample(&self, replica: usize) -> Result<Self>;

    /// Plain `order`-particle correlator of harmonic `harmonic`
    fn correlator(&self, order: u8, harmonic: u8, label: &str) -> Result<Estimator>;

    /// Number of independent sub-samples
    fn n_samples(&self) -> usize;

    /// Multi-particle cumulant `c_n{k}` built from the correlators
    fn cumulant(&self, harmonic: u8, order: u8, label: &str) -> Result<Estimator> {
        check_order(order)?;
        let c2 = self.correlator(2, harmonic, label)?;
        let cumulant = match order {
            2 => c2,
            4 => {
                let c4 = self.correlator(4, harmonic, label)?;
                c4.add_scaled(&c2.powi(2), -2.0)?
            }
            6 => {
                let c4 = self.correlator(4, harmonic, label)?;
                let c6 = self.correlator(6, harmonic, label)?;
                c6.add_scaled(&c4.multiply(&c2)?, -9.0)?
                    .add_scaled(&c2.powi(3), 12.0)?
            }
            _ => {
                let c4 = self.correlator(4, harmonic, label)?;
                let c6 = self.correlator(6, harmonic, label)?;
                let c8 = self.correlator(8, harmonic, label)?;
                c8.add_scaled(&c6.multiply(&c2)?, -16.0)?
                    .add_scaled(&c4.powi(2), -18.0)?
                    .add_scaled(&c4.multiply(&c2.powi(2))?, 144.0)?
                    .add_scaled(&c2.powi(4), -144.0)?
            }
        };
        Ok(cumulant.with_name(format!("c{harmonic}{{{order}}}")))
    }

    /// Normalized flow coefficient `v_n{k}`
    ///
    /// Bins whose root argument is negative carry no real flow and are
    /// reported as zero. Errors are zero; uncertainties come from resampling.
    fn flow_coefficient(&self, harmonic: u8, order: u8, label: &str) -> Result<Estimator> {
        let cumulant = self.cumulant(harmonic, order, label)?;
        let (sign, norm, root) = match order {
            2 => (1.0, 1.0, 2.0),
            4 => (-1.0, 1.0, 4.0),
            6 => (1.0, 4.0, 6.0),
            _ => (-1.0, 33.0, 8.0),
        };
        let values = cumulant
            .values()
            .iter()
            .map(|&c| {
                let arg = sign * c / norm;
                if arg > 0.0 {
                    arg.powf(1.0 / root)
                } else {
                    0.0
                }
            })
            .collect();
        Estimator::from_values(
            format!("v{harmonic}{{{order}}}"),
            cumulant.axis().clone(),
            values,
        )
    }
}

/// In-memory correlator store keyed by [`CorrelatorKey`]
#[derive(Debug, Clone)]
pub struct CorrelatorContainer {
    axis: Axis,
    n_samples: usize,
    profiles: HashMap<CorrelatorKey, ResampledProfile>,
    multi_rebin: Option<Axis>,
    view: SampleIndex,
}

impl CorrelatorContainer {
    /// Create an empty store with `n_samples` sub-samples on `axis`
    pub fn new(axis: Axis, n_samples: usize) -> Self {
        Self {
            axis,
            n_samples,
            profiles: HashMap::new(),
            multi_rebin: None,
            view: SampleIndex::Nominal,
        }
    }

    /// Rebin every projection onto `edges`, which must be a subset of the
    /// store's own edges
    pub fn with_multi_rebin(mut self, edges: Vec<f64>) -> Result<Self> {
        let target = Axis::from_edges(edges)?;
        if self.axis.projection_onto(&target).is_none() {
            return Err(Error::binning_mismatch(
                format!("correlator store {}", self.axis),
                format!("multi-rebin {target}"),
            ));
        }
        self.multi_rebin = Some(target);
        Ok(self)
    }

    /// Multi-rebin edges, if configured
    pub fn multi_rebin(&self) -> Option<&Axis> {
        self.multi_rebin.as_ref()
    }

    /// Which sample this store currently presents
    pub fn view(&self) -> SampleIndex {
        self.view
    }

    /// Add a filled correlator profile
    pub fn insert(&mut self, key: CorrelatorKey, profile: ResampledProfile) -> Result<()> {
        if profile.axis() != &self.axis {
            return Err(Error::binning_mismatch(key.to_string(), "correlator store axis"));
        }
        if profile.n_replicas() != self.n_samples {
            return Err(Error::InvalidInput(format!(
                "Correlator '{key}' has {} sub-samples, store expects {}",
                profile.n_replicas(),
                self.n_samples
            )));
        }
        self.profiles.insert(key, profile);
        Ok(())
    }

    /// Fill one event's correlator value into the nominal and sub-sample `replica`
    pub fn fill(
        &mut self,
        key: &CorrelatorKey,
        x: f64,
        value: f64,
        weight: f64,
        replica: usize,
    ) -> Result<bool> {
        let (axis, n) = (&self.axis, self.n_samples);
        self.profiles
            .entry(key.clone())
            .or_insert_with(|| ResampledProfile::new(key.to_string(), axis.clone(), n))
            .fill(x, value, weight, replica)
    }
}

impl RawCorrelatorStore for CorrelatorContainer {
    fn sub_sample(&self, replica: usize) -> Result<Self> {
        if replica >= self.n_samples {
            return Err(Error::lookup("correlator sub-sample", SampleIndex::Replica(replica)));
        }
        debug!("Building correlator sub-sample {replica}");
        let mut clone = self.clone();
        for profile in clone.profiles.values_mut() {
            profile.override_nominal_with(replica)?;
        }
        clone.view = SampleIndex::Replica(replica);
        Ok(clone)
    }

    fn correlator(&self, order: u8, harmonic: u8, label: &str) -> Result<Estimator> {
        let key = CorrelatorKey::new(label, harmonic, order)?;
        let profile = self
            .profiles
            .get(&key)
            .ok_or_else(|| Error::lookup(key.to_string(), self.view))?;
        let nominal = profile.profile(SampleIndex::Nominal)?;
        match &self.multi_rebin {
            Some(target) => Ok(nominal.rebin(target)?.to_estimator()),
            None => Ok(nominal.to_estimator()),
        }
    }

    fn n_samples(&self) -> usize {
        self.n_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn store_with(values: &[(u8, f64)]) -> CorrelatorContainer {
        let axis = Axis::uniform(1, 0.0, 1.0).unwrap();
        let mut store = CorrelatorContainer::new(axis, 2);
        for &(order, value) in values {
            let key = CorrelatorKey::new("ChGap", 2, order).unwrap();
            store.fill(&key, 0.5, value, 1.0, 0).unwrap();
        }
        store
    }

    #[test]
    fn test_v2_from_two_particle_correlator() {
        let store = store_with(&[(2, 0.01)]);
        let v22 = store.flow_coefficient(2, 2, "ChGap").unwrap();
        assert_relative_eq!(v22.value(0), 0.1, epsilon = 1e-12);
        assert_eq!(v22.error(0), 0.0);
        assert_eq!(v22.name(), "v2{2}");
    }

    #[test]
    fn test_v4_from_four_particle_cumulant() {
        // v = 0.1: <2> = v^2, <4> = v^4, c{4} = -v^4
        let store = store_with(&[(2, 0.01), (4, 1e-4)]);
        let c24 = store.cumulant(2, 4, "ChGap").unwrap();
        assert_relative_eq!(c24.value(0), -1e-4, epsilon = 1e-15);
        let v24 = store.flow_coefficient(2, 4, "ChGap").unwrap();
        assert_relative_eq!(v24.value(0), 0.1, epsilon = 1e-10);
    }

    #[test]
    fn test_v6_and_v8_for_pure_flow() {
        // for a constant flow magnitude v, <2k> = v^(2k)
        let v: f64 = 0.1;
        let store = store_with(&[
            (2, v.powi(2)),
            (4, v.powi(4)),
            (6, v.powi(6)),
            (8, v.powi(8)),
        ]);
        let c26 = store.cumulant(2, 6, "ChGap").unwrap();
        assert_relative_eq!(c26.value(0), 4.0 * v.powi(6), epsilon = 1e-15);
        let c28 = store.cumulant(2, 8, "ChGap").unwrap();
        assert_relative_eq!(c28.value(0), -33.0 * v.powi(8), epsilon = 1e-18);

        let v26 = store.flow_coefficient(2, 6, "ChGap").unwrap();
        let v28 = store.flow_coefficient(2, 8, "ChGap").unwrap();
        assert_relative_eq!(v26.value(0), v, epsilon = 1e-8);
        assert_relative_eq!(v28.value(0), v, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_root_argument_reports_zero() {
        // c{4} = <4> - 2<2>^2 > 0 has no real v{4}
        let store = store_with(&[(2, 0.01), (4, 1e-3)]);
        let v24 = store.flow_coefficient(2, 4, "ChGap").unwrap();
        assert_eq!(v24.value(0), 0.0);
    }

    #[test]
    fn test_unsupported_order() {
        let store = store_with(&[(2, 0.01)]);
        assert!(matches!(
            store.flow_coefficient(2, 5, "ChGap"),
            Err(Error::UnsupportedOrder { order: 5 })
        ));
        assert!(matches!(
            store.correlator(3, 2, "ChGap"),
            Err(Error::UnsupportedOrder { order: 3 })
        ));
    }

    #[test]
    fn test_missing_correlator_names_key_and_view() {
        let store = store_with(&[(2, 0.01)]);
        let sub = store.sub_sample(1).unwrap();
        match sub.correlator(4, 2, "ChGap") {
            Err(Error::LookupFailure { key, sample }) => {
                assert_eq!(key, "ChGap24");
                assert_eq!(sample, SampleIndex::Replica(1));
            }
            other => panic!("expected lookup failure, got {other:?}"),
        }
    }

    #[test]
    fn test_sub_sample_overrides_nominal() {
        let axis = Axis::uniform(1, 0.0, 1.0).unwrap();
        let key = CorrelatorKey::new("ChGap", 2, 2).unwrap();
        let mut store = CorrelatorContainer::new(axis, 2);
        store.fill(&key, 0.5, 0.02, 1.0, 0).unwrap();
        store.fill(&key, 0.5, 0.04, 1.0, 1).unwrap();

        assert_relative_eq!(store.correlator(2, 2, "ChGap").unwrap().value(0), 0.03, epsilon = 1e-12);
        let sub = store.sub_sample(1).unwrap();
        assert_eq!(sub.view(), SampleIndex::Replica(1));
        assert_relative_eq!(sub.correlator(2, 2, "ChGap").unwrap().value(0), 0.04, epsilon = 1e-12);
        // parent store is untouched
        assert_eq!(store.view(), SampleIndex::Nominal);
        assert!(store.sub_sample(2).is_err());
    }

    #[test]
    fn test_multi_rebin_applies_to_every_view() {
        let axis = Axis::uniform(4, 0.0, 4.0).unwrap();
        let key = CorrelatorKey::new("ChGap", 2, 2).unwrap();
        let mut store = CorrelatorContainer::new(axis, 1)
            .with_multi_rebin(vec![0.0, 2.0, 4.0])
            .unwrap();
        store.fill(&key, 0.5, 1.0, 1.0, 0).unwrap();
        store.fill(&key, 1.5, 3.0, 1.0, 0).unwrap();

        let nominal = store.correlator(2, 2, "ChGap").unwrap();
        assert_eq!(nominal.len(), 2);
        assert_relative_eq!(nominal.value(0), 2.0, epsilon = 1e-12);
        let sub = store.sub_sample(0).unwrap().correlator(2, 2, "ChGap").unwrap();
        assert_eq!(sub.axis(), nominal.axis());
        assert_relative_eq!(sub.value(0), 2.0, epsilon = 1e-12);

        let misaligned = CorrelatorContainer::new(Axis::uniform(4, 0.0, 4.0).unwrap(), 1)
            .with_multi_rebin(vec![0.0, 1.5, 4.0]);
        assert!(matches!(misaligned, Err(Error::BinningMismatch { .. })));
    }

    #[test]
    fn test_nan_binning_value_is_not_filled() {
        let mut store = store_with(&[(2, 0.01)]);
        let key = CorrelatorKey::new("ChGap", 2, 2).unwrap();
        assert!(!store.fill(&key, f64::NAN, 0.1, 1.0, 0).unwrap());
        let c22 = store.correlator(2, 2, "ChGap").unwrap();
        assert_relative_eq!(c22.value(0), 0.01, epsilon = 1e-15);
    }
}
