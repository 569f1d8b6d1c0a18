//! Moment-to-cumulant recursions for flow and flow-pt observables
//!
//! Every covariant cumulant of (flow², Δpt) is the raw joint moment minus the
//! disconnected contributions built from lower-order cumulants and central
//! moments of Δpt. With `M_j` the joint term carrying the `j`-th power of the
//! mean pt, `pt` the mean pt and `CMk` the `k`-th central moment of Δpt:
//!
//! | cumulant | expansion |
//! |---|---|
//! | `cv1` | `M0 − ⟨2⟩·pt` |
//! | `cv2` | `M0 + M1·pt + ⟨2⟩·pt² − ⟨2⟩·CM2` |
//! | `cv3` | `M0 − M1·pt − M2·pt² − ⟨2⟩·pt³ − 3·cv1·CM2 − ⟨2⟩·CM3` |
//! | `cv4` | `M0 − M1·pt − M2·pt² − M3·pt³ − ⟨2⟩·pt⁴ − 6·cv2·CM2 − 4·cv1·CM3 − 4·⟨2⟩·CM2² + ⟨2⟩·CM4` |
//! | `cv4pt1` | `M0 − ⟨4⟩·pt − 4·cv1·⟨2⟩` |
//!
//! Without a central-moment decomposition only `cv1` and `cv4pt1` can be
//! formed, from the reduced joint terms.

use crate::config::EngineConfig;
use crate::observable::Observable;
use flow_core::{Error, Result, SampleIndex};
use flow_histogram::{Estimator, EstimatorOps};
use flow_store::{FlowPtStore, MomentKey, RawCorrelatorStore};
use std::borrow::Cow;
use tracing::{debug, instrument};

/// Multiplicity of the `⟨2⟩·CM2²` term in `cv4`
pub const CV4_CM2_SQUARED_MULTIPLICITY: f64 = 4.0;

/// Disconnected terms of `cv24_pt2` that have no established expansion yet
pub const CV24_PT2_MISSING_TERMS: &[&str] = &[
    "4*<2>*<v2^2 dpt^2>",
    "4*<v2^2 dpt>^2",
    "4*<2>^2*<dpt^2>",
    "<4>*<dpt^2>",
];

/// A cumulant estimator whose expansion is known to lack some terms
#[derive(Debug, Clone)]
pub struct PartialCumulant {
    /// The terms that could be evaluated
    pub estimator: Estimator,
    /// Descriptions of the terms that were left out
    pub missing: &'static [&'static str],
}

/// Derives flow cumulants and flow-pt covariant cumulants from the two stores
///
/// Nominal requests read the correlator store directly. Replica requests build
/// one private sub-sample view per call and drop it when the call returns.
#[derive(Debug, Clone)]
pub struct CumulantEngine<C, F> {
    correlators: C,
    flow_pt: F,
    config: EngineConfig,
}

impl<C, F> CumulantEngine<C, F>
where
    C: RawCorrelatorStore,
    F: FlowPtStore,
{
    /// Create an engine over the two stores with the default configuration
    pub fn new(correlators: C, flow_pt: F) -> Self {
        Self {
            correlators,
            flow_pt,
            config: EngineConfig::default(),
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn correlator_store(&self) -> &C {
        &self.correlators
    }

    pub fn flow_pt_store(&self) -> &F {
        &self.flow_pt
    }

    /// Number of sub-samples available in the correlator store
    pub fn n_samples(&self) -> usize {
        self.correlators.n_samples()
    }

    fn terms(&self, sample: SampleIndex) -> Result<Terms<'_, C, F>> {
        let correlators = match sample {
            SampleIndex::Nominal => Cow::Borrowed(&self.correlators),
            SampleIndex::Replica(i) => Cow::Owned(self.correlators.sub_sample(i)?),
        };
        Ok(Terms {
            correlators,
            flow_pt: &self.flow_pt,
            sample,
            label: &self.config.gap_label,
        })
    }

    /// Normalized flow coefficient `v_n{k}`, `k` in 2, 4, 6, 8
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn flow_coefficient(
        &self,
        harmonic: u8,
        order: u8,
        label: &str,
        sample: SampleIndex,
    ) -> Result<Estimator> {
        self.terms(sample)?
            .correlators
            .flow_coefficient(harmonic, order, label)
    }

    /// Plain `order`-particle correlator `⟨k;n⟩`
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn correlator(
        &self,
        order: u8,
        harmonic: u8,
        label: &str,
        sample: SampleIndex,
    ) -> Result<Estimator> {
        self.terms(sample)?
            .correlators
            .correlator(order, harmonic, label)
    }

    /// Order-1 covariance of `v_n²` and Δpt
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn cvn2_pt(&self, harmonic: u8, sample: SampleIndex) -> Result<Estimator> {
        self.terms(sample)?.cv1(harmonic)
    }

    /// Order-2 covariant cumulant of `v2²` and Δpt
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn cv22_pt2(&self, sample: SampleIndex) -> Result<Estimator> {
        self.terms(sample)?.cv2()
    }

    /// Order-3 covariant cumulant of `v2²` and Δpt
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn cv22_pt3(&self, sample: SampleIndex) -> Result<Estimator> {
        self.terms(sample)?.cv3()
    }

    /// Order-4 covariant cumulant of `v2²` and Δpt
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn cv22_pt4(&self, sample: SampleIndex) -> Result<Estimator> {
        self.terms(sample)?.cv4()
    }

    /// Order-1 covariant cumulant of `v2⁴` and Δpt
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn cv24_pt(&self, sample: SampleIndex) -> Result<Estimator> {
        self.terms(sample)?.cv4pt1()
    }

    /// Order-2 covariant cumulant of `v2⁴` and Δpt
    ///
    /// Several disconnected terms of this expansion are not established, so
    /// this always fails with [`Error::IncompleteFormula`] once its inputs
    /// exist. Use [`cv24_pt2_partial`](Self::cv24_pt2_partial) to get the
    /// evaluable part explicitly.
    #[instrument(skip(self, sample), fields(sample = %sample))]
    pub fn cv24_pt2(&self, sample: SampleIndex) -> Result<Estimator> {
        let partial = self.terms(sample)?.cv4pt2_partial()?;
        Err(Error::IncompleteFormula {
            operation: "cv24_pt2",
            missing: partial.missing,
        })
    }

    /// Evaluable part of `cv24_pt2`: `M0 + M1·pt + ⟨4⟩·pt²`
    pub fn cv24_pt2_partial(&self, sample: SampleIndex) -> Result<PartialCumulant> {
        self.terms(sample)?.cv4pt2_partial()
    }

    /// Mean transverse momentum
    pub fn mean_pt(&self, sample: SampleIndex) -> Result<Estimator> {
        self.flow_pt.mean_pt(sample)
    }

    /// Evaluate a named observable, attaching the observable and sample to
    /// any failure
    pub fn calculate(&self, observable: Observable, sample: SampleIndex) -> Result<Estimator> {
        (observable.function())(self, sample)
            .map_err(|e| e.in_observable(observable.name(), sample))
    }

    /// Evaluate a named observable on sub-samples `0..n`
    ///
    /// Each evaluation owns its sub-sample view; with the `parallel` feature
    /// the replicas are evaluated concurrently.
    #[instrument(skip(self, observable), fields(observable = observable.name()))]
    pub fn calculate_replicas(&self, observable: Observable, n: usize) -> Result<Vec<Estimator>> {
        debug!("Evaluating {} replicas", n);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|i| self.calculate(observable, SampleIndex::Replica(i)))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            SampleIndex::replicas(n)
                .map(|sample| self.calculate(observable, sample))
                .collect()
        }
    }
}

/// The raw inputs of one sample
struct Terms<'a, C: Clone, F> {
    correlators: Cow<'a, C>,
    flow_pt: &'a F,
    sample: SampleIndex,
    label: &'a str,
}

impl<C, F> Terms<'_, C, F>
where
    C: RawCorrelatorStore,
    F: FlowPtStore,
{
    fn correlator(&self, order: u8, harmonic: u8) -> Result<Estimator> {
        self.correlators.correlator(order, harmonic, self.label)
    }

    fn joint(&self, harmonic: u8, particles: u8, pt_order: u8, mpt: Option<u8>) -> Result<Estimator> {
        let key = MomentKey {
            label: self.label.to_string(),
            harmonic,
            particles,
            pt_order,
            mpt_power: mpt,
        };
        self.flow_pt.joint_moment(&key, self.sample)
    }

    fn mean_pt(&self) -> Result<Estimator> {
        self.flow_pt.mean_pt(self.sample)
    }

    fn central_moment(&self, k: u8) -> Result<Estimator> {
        self.flow_pt.central_moment(self.sample, k)
    }

    fn require_central_moments(&self, operation: &'static str) -> Result<()> {
        if self.flow_pt.uses_central_moments() {
            Ok(())
        } else {
            Err(Error::CentralMomentsUnavailable { operation })
        }
    }

    /// `M0` of the order-1 terms, reduced when there is no decomposition
    fn order_one_joint(&self, harmonic: u8, particles: u8) -> Result<Estimator> {
        if self.flow_pt.uses_central_moments() {
            self.joint(harmonic, particles, 1, Some(0))
        } else {
            debug!(harmonic, particles, "No central moments, using the reduced joint term");
            self.joint(harmonic, particles, 1, None)
        }
    }

    fn cv1(&self, harmonic: u8) -> Result<Estimator> {
        let m0 = self.order_one_joint(harmonic, 2)?;
        let c2 = self.correlator(2, harmonic)?;
        let pt = self.mean_pt()?;
        Ok(m0.sub(&c2.multiply(&pt)?)?.with_name(format!("cv{harmonic}2pt")))
    }

    fn cv2(&self) -> Result<Estimator> {
        self.require_central_moments("cv22_pt2")?;
        let m0 = self.joint(2, 2, 2, Some(0))?;
        let m1 = self.joint(2, 2, 2, Some(1))?;
        let c2 = self.correlator(2, 2)?;
        let pt = self.mean_pt()?;
        let cm2 = self.central_moment(2)?;

        Ok(m0
            .add(&m1.multiply(&pt)?)?
            .add(&c2.multiply(&pt.powi(2))?)?
            .sub(&c2.multiply(&cm2)?)?
            .with_name("cv22pt2"))
    }

    fn cv3(&self) -> Result<Estimator> {
        self.require_central_moments("cv22_pt3")?;
        let m0 = self.joint(2, 2, 3, Some(0))?;
        let m1 = self.joint(2, 2, 3, Some(1))?;
        let m2 = self.joint(2, 2, 3, Some(2))?;
        let c2 = self.correlator(2, 2)?;
        let pt = self.mean_pt()?;
        let cm2 = self.central_moment(2)?;
        let cm3 = self.central_moment(3)?;
        let cv1 = self.cv1(2)?;

        Ok(m0
            .sub(&m1.multiply(&pt)?)?
            .sub(&m2.multiply(&pt.powi(2))?)?
            .sub(&c2.multiply(&pt.powi(3))?)?
            .add_scaled(&cv1.multiply(&cm2)?, -3.0)?
            .sub(&c2.multiply(&cm3)?)?
            .with_name("cv22pt3"))
    }

    fn cv4(&self) -> Result<Estimator> {
        self.require_central_moments("cv22_pt4")?;
        let m0 = self.joint(2, 2, 4, Some(0))?;
        let m1 = self.joint(2, 2, 4, Some(1))?;
        let m2 = self.joint(2, 2, 4, Some(2))?;
        let m3 = self.joint(2, 2, 4, Some(3))?;
        let c2 = self.correlator(2, 2)?;
        let pt = self.mean_pt()?;
        let cm2 = self.central_moment(2)?;
        let cm3 = self.central_moment(3)?;
        let cm4 = self.central_moment(4)?;
        let cv1 = self.cv1(2)?;
        let cv2 = self.cv2()?;

        Ok(m0
            .sub(&m1.multiply(&pt)?)?
            .sub(&m2.multiply(&pt.powi(2))?)?
            .sub(&m3.multiply(&pt.powi(3))?)?
            .sub(&c2.multiply(&pt.powi(4))?)?
            .add_scaled(&cv2.multiply(&cm2)?, -6.0)?
            .add_scaled(&cv1.multiply(&cm3)?, -4.0)?
            .add_scaled(&c2.multiply(&cm2.powi(2))?, -CV4_CM2_SQUARED_MULTIPLICITY)?
            .add(&c2.multiply(&cm4)?)?
            .with_name("cv22pt4"))
    }

    fn cv4pt1(&self) -> Result<Estimator> {
        let m0 = self.order_one_joint(2, 4)?;
        let c2 = self.correlator(2, 2)?;
        let c4 = self.correlator(4, 2)?;
        let pt = self.mean_pt()?;
        let cv1 = self.cv1(2)?;

        Ok(m0
            .sub(&c4.multiply(&pt)?)?
            .add_scaled(&cv1.multiply(&c2)?, -4.0)?
            .with_name("cv24pt"))
    }

    fn cv4pt2_partial(&self) -> Result<PartialCumulant> {
        self.require_central_moments("cv24_pt2")?;
        let m0 = self.joint(2, 4, 2, Some(0))?;
        let m1 = self.joint(2, 4, 2, Some(1))?;
        let c4 = self.correlator(4, 2)?;
        let pt = self.mean_pt()?;

        let estimator = m0
            .add(&m1.multiply(&pt)?)?
            .add(&c4.multiply(&pt.powi(2))?)?
            .with_name("cv24pt2 (partial)");
        Ok(PartialCumulant {
            estimator,
            missing: CV24_PT2_MISSING_TERMS,
        })
    }
}
