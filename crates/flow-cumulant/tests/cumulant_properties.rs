//! Algebraic properties of the covariant cumulants

use approx::assert_relative_eq;
use flow_core::{Error, SampleIndex};
use flow_cumulant::{CumulantEngine, Observable};
use flow_histogram::Axis;
use flow_store::{CorrelatorContainer, CorrelatorKey, FlowPtContainer, MomentKey};
use proptest::prelude::*;

type Engine = CumulantEngine<CorrelatorContainer, FlowPtContainer>;

/// Stores over three multiplicity bins with `n` sub-samples, each bin holding
/// the same value in every sub-sample
struct Stores {
    correlators: CorrelatorContainer,
    flow_pt: FlowPtContainer,
    n: usize,
}

impl Stores {
    fn new(n: usize) -> Self {
        let axis = Axis::uniform(3, 0.0, 30.0).unwrap();
        Self {
            correlators: CorrelatorContainer::new(axis.clone(), n),
            flow_pt: FlowPtContainer::new(axis, n).with_central_moments(true),
            n,
        }
    }

    fn centers() -> [f64; 3] {
        [5.0, 15.0, 25.0]
    }

    fn c22(&mut self, values: [f64; 3]) {
        let key = CorrelatorKey::new("ChGap", 2, 2).unwrap();
        for (x, v) in Self::centers().into_iter().zip(values) {
            for replica in 0..self.n {
                self.correlators.fill(&key, x, v, 1.0, replica).unwrap();
            }
        }
    }

    fn joint(&mut self, key: &str, values: [f64; 3]) {
        let key = MomentKey::parse(key).unwrap();
        for (x, v) in Self::centers().into_iter().zip(values) {
            for replica in 0..self.n {
                self.flow_pt.fill_moment(&key, x, v, 1.0, replica).unwrap();
            }
        }
    }

    fn mean_pt(&mut self, values: [f64; 3]) {
        for (x, v) in Self::centers().into_iter().zip(values) {
            for replica in 0..self.n {
                self.flow_pt.fill_mean_pt(x, v, 1.0, replica).unwrap();
            }
        }
    }

    fn central_moment(&mut self, k: u8, values: [f64; 3]) {
        for (x, v) in Self::centers().into_iter().zip(values) {
            for replica in 0..self.n {
                self.flow_pt.fill_central_moment(k, x, v, 1.0, replica).unwrap();
            }
        }
    }

    fn engine(self) -> Engine {
        CumulantEngine::new(self.correlators, self.flow_pt)
    }
}

fn triple(range: std::ops::Range<f64>) -> impl Strategy<Value = [f64; 3]> {
    [range.clone(), range.clone(), range]
}

proptest! {
    #[test]
    fn cv1_reduces_to_joint_term_without_mean_pt(
        c2 in triple(0.0..0.2),
        m0 in triple(-1.0..1.0),
    ) {
        let mut stores = Stores::new(1);
        stores.c22(c2);
        stores.mean_pt([0.0; 3]);
        stores.joint("ChGap22pt1_Mpt0", m0);
        let cv1 = stores.engine().cvn2_pt(2, SampleIndex::Nominal).unwrap();
        for bin in 0..3 {
            prop_assert!((cv1.value(bin) - m0[bin]).abs() < 1e-12);
        }
    }

    #[test]
    fn cv2_vanishes_for_independent_pt(
        c2 in triple(0.001..0.1),
        m1 in triple(0.2..1.5),
        variance in triple(0.0..0.1),
    ) {
        // for Δpt independent of flow the joint terms factorize:
        // M0 = <2> * E[pt^2], M1 = -2 * <2> * E[pt], CM2 = Var(pt)
        let m2: Vec<f64> = (0..3).map(|b| m1[b] * m1[b] + variance[b]).collect();
        let joint0 = [0, 1, 2].map(|b| c2[b] * m2[b]);
        let joint1 = [0, 1, 2].map(|b| -2.0 * c2[b] * m1[b]);

        let mut stores = Stores::new(1);
        stores.c22(c2);
        stores.mean_pt(m1);
        stores.central_moment(2, variance);
        stores.joint("ChGap22pt2_Mpt0", joint0);
        stores.joint("ChGap22pt2_Mpt1", joint1);

        let cv2 = stores.engine().cv22_pt2(SampleIndex::Nominal).unwrap();
        for bin in 0..3 {
            prop_assert!(cv2.value(bin).abs() < 1e-12, "bin {} = {}", bin, cv2.value(bin));
        }
    }
}

#[test]
fn test_end_to_end_cv1() {
    let mut stores = Stores::new(4);
    stores.c22([0.1; 3]);
    stores.mean_pt([0.3; 3]);
    stores.joint("ChGap22pt1_Mpt0", [0.05, 0.06, 0.07]);
    let engine = stores.engine();

    let cv1 = engine.calculate(Observable::Cv22Pt, SampleIndex::Nominal).unwrap();
    for (bin, m0) in [0.05, 0.06, 0.07].into_iter().enumerate() {
        assert_relative_eq!(cv1.value(bin), m0 - 0.03, epsilon = 1e-12);
    }

    let replicas = engine.calculate_replicas(Observable::Cv22Pt, 4).unwrap();
    assert_eq!(replicas.len(), 4);
    for replica in &replicas {
        assert_relative_eq!(replica.value(2), 0.04, epsilon = 1e-12);
    }
}

#[test]
fn test_calculate_attaches_context() {
    let mut stores = Stores::new(2);
    stores.c22([0.1; 3]);
    stores.mean_pt([0.3; 3]);
    let engine = stores.engine();

    match engine.calculate(Observable::Cv22Pt, SampleIndex::Replica(1)) {
        Err(err @ Error::Observable { .. }) => {
            let Error::Observable { operation, sample, .. } = &err else {
                unreachable!()
            };
            assert_eq!(*operation, "cv22_pt");
            assert_eq!(*sample, SampleIndex::Replica(1));
            match err.root_cause() {
                Error::LookupFailure { key, sample } => {
                    assert_eq!(key, "ChGap22pt1_Mpt0");
                    assert_eq!(*sample, SampleIndex::Replica(1));
                }
                other => panic!("expected lookup failure, got {other:?}"),
            }
        }
        other => panic!("expected observable error, got {other:?}"),
    }
}

#[test]
fn test_replica_beyond_store_is_an_error() {
    let mut stores = Stores::new(2);
    stores.c22([0.1; 3]);
    let engine = stores.engine();
    let err = engine.calculate(Observable::C22, SampleIndex::Replica(5)).unwrap_err();
    assert!(matches!(err.root_cause(), Error::LookupFailure { .. }));
    assert!(engine.calculate_replicas(Observable::C22, 3).is_err());
}

#[test]
fn test_every_observable_is_dispatchable() {
    let stores = Stores::new(1);
    let engine = stores.engine();
    for observable in Observable::ALL {
        // empty stores: every observable fails, but with its own name attached
        match engine.calculate(observable, SampleIndex::Nominal) {
            Err(Error::Observable { operation, .. }) => assert_eq!(operation, observable.name()),
            other => panic!("{observable}: expected observable error, got {other:?}"),
        }
    }
}
