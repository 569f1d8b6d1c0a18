//! The closed set of named observables

use crate::engine::CumulantEngine;
use flow_core::{Error, Result, SampleIndex};
use flow_histogram::Estimator;
use flow_store::{FlowPtStore, RawCorrelatorStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Evaluates one observable for one sample
pub type ObservableFn<C, F> = fn(&CumulantEngine<C, F>, SampleIndex) -> Result<Estimator>;

/// Observables the engine can evaluate by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Observable {
    /// `v2{2}`
    V22,
    /// `v3{2}`
    V32,
    /// `v4{2}`
    V42,
    /// `⟨2⟩` of the second harmonic
    C22,
    /// `⟨4⟩` of the second harmonic
    C24,
    /// `⟨2⟩` of the third harmonic
    C32,
    /// `⟨2⟩` of the fourth harmonic
    C42,
    /// Order-1 covariance of `v2²` and Δpt
    Cv22Pt,
    /// Order-1 covariance of `v3²` and Δpt
    Cv32Pt,
    /// Order-1 covariance of `v4²` and Δpt
    Cv42Pt,
    /// Order-2 covariant cumulant of `v2²` and Δpt
    Cv22Pt2,
    /// Order-3 covariant cumulant of `v2²` and Δpt
    Cv22Pt3,
    /// Order-4 covariant cumulant of `v2²` and Δpt
    Cv22Pt4,
    /// Order-1 covariant cumulant of `v2⁴` and Δpt
    Cv24Pt,
    /// Order-2 covariant cumulant of `v2⁴` and Δpt; always incomplete
    Cv24Pt2,
    /// Mean transverse momentum
    MeanPt,
}

impl Observable {
    /// Every observable, in a stable order
    pub const ALL: [Observable; 16] = [
        Self::V22,
        Self::V32,
        Self::V42,
        Self::C22,
        Self::C24,
        Self::C32,
        Self::C42,
        Self::Cv22Pt,
        Self::Cv32Pt,
        Self::Cv42Pt,
        Self::Cv22Pt2,
        Self::Cv22Pt3,
        Self::Cv22Pt4,
        Self::Cv24Pt,
        Self::Cv24Pt2,
        Self::MeanPt,
    ];

    /// Short name used in logs, error context and parsing
    pub fn name(self) -> &'static str {
        match self {
            Self::V22 => "v22",
            Self::V32 => "v32",
            Self::V42 => "v42",
            Self::C22 => "c22",
            Self::C24 => "c24",
            Self::C32 => "c32",
            Self::C42 => "c42",
            Self::Cv22Pt => "cv22_pt",
            Self::Cv32Pt => "cv32_pt",
            Self::Cv42Pt => "cv42_pt",
            Self::Cv22Pt2 => "cv22_pt2",
            Self::Cv22Pt3 => "cv22_pt3",
            Self::Cv22Pt4 => "cv22_pt4",
            Self::Cv24Pt => "cv24_pt",
            Self::Cv24Pt2 => "cv24_pt2",
            Self::MeanPt => "mean_pt",
        }
    }

    /// The engine operation behind this observable
    pub fn function<C, F>(self) -> ObservableFn<C, F>
    where
        C: RawCorrelatorStore,
        F: FlowPtStore,
    {
        let f: ObservableFn<C, F> = match self {
            Self::V22 => |e, i| e.flow_coefficient(2, 2, &e.config().gap_label, i),
            Self::V32 => |e, i| e.flow_coefficient(3, 2, &e.config().gap_label, i),
            Self::V42 => |e, i| e.flow_coefficient(4, 2, &e.config().gap_label, i),
            Self::C22 => |e, i| e.correlator(2, 2, &e.config().gap_label, i),
            Self::C24 => |e, i| e.correlator(4, 2, &e.config().gap_label, i),
            Self::C32 => |e, i| e.correlator(2, 3, &e.config().gap_label, i),
            Self::C42 => |e, i| e.correlator(2, 4, &e.config().gap_label, i),
            Self::Cv22Pt => |e, i| e.cvn2_pt(2, i),
            Self::Cv32Pt => |e, i| e.cvn2_pt(3, i),
            Self::Cv42Pt => |e, i| e.cvn2_pt(4, i),
            Self::Cv22Pt2 => |e, i| e.cv22_pt2(i),
            Self::Cv22Pt3 => |e, i| e.cv22_pt3(i),
            Self::Cv22Pt4 => |e, i| e.cv22_pt4(i),
            Self::Cv24Pt => |e, i| e.cv24_pt(i),
            Self::Cv24Pt2 => |e, i| e.cv24_pt2(i),
            Self::MeanPt => |e, i| e.mean_pt(i),
        };
        f
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Observable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown observable '{s}'")))
    }
}
