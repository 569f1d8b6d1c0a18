//! Nominal plus replicas, then resampling errors

use flow_core::{Result, SampleIndex};
use flow_cumulant::{CumulantEngine, FlowPtStore, Observable, RawCorrelatorStore};
use flow_histogram::Estimator;
use flow_resampling::{ResamplingStatistics, StatMethod};
use tracing::{debug, instrument};

/// Drives one engine and one resampling setup over a list of observables
#[derive(Debug, Clone)]
pub struct FlowAnalysis<C, F> {
    engine: CumulantEngine<C, F>,
    statistics: ResamplingStatistics,
    n_samples: usize,
}

impl<C, F> FlowAnalysis<C, F>
where
    C: RawCorrelatorStore,
    F: FlowPtStore,
{
    /// Create an analysis; `n_samples` defaults to the correlator store's
    /// sub-sample count
    pub fn new(
        engine: CumulantEngine<C, F>,
        statistics: ResamplingStatistics,
        n_samples: Option<usize>,
    ) -> Self {
        let n_samples = n_samples.unwrap_or_else(|| engine.n_samples());
        Self {
            engine,
            statistics,
            n_samples,
        }
    }

    pub fn engine(&self) -> &CumulantEngine<C, F> {
        &self.engine
    }

    pub fn statistics(&self) -> &ResamplingStatistics {
        &self.statistics
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Nominal estimate of `observable` with errors from `method`
    #[instrument(skip(self, observable, method), fields(observable = observable.name(), method = %method))]
    pub fn observable(&self, observable: Observable, method: StatMethod) -> Result<Estimator> {
        let nominal = self.engine.calculate(observable, SampleIndex::Nominal)?;
        let replicas = self.engine.calculate_replicas(observable, self.n_samples)?;
        debug!("Computed nominal and {} replicas", replicas.len());
        self.statistics.estimate(&nominal, &replicas, method)
    }

    /// Evaluate several observables; each keeps its own outcome
    pub fn observables(
        &self,
        observables: &[Observable],
        method: StatMethod,
    ) -> Vec<(Observable, Result<Estimator>)> {
        observables
            .iter()
            .map(|&obs| (obs, self.observable(obs, method)))
            .collect()
    }
}
