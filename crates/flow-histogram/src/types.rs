//! Core types for binned estimators

use crate::traits::Binned;
use flow_core::{Error, Result};
use std::fmt;

/// Bin edges along one observable axis (e.g. multiplicity or centrality)
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    /// Create an axis from explicit, strictly increasing edges
    pub fn from_edges(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "An axis needs at least 2 edges, got {}",
                edges.len()
            )));
        }
        if edges.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(Error::InvalidInput(
                "Axis edges must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { edges })
    }

    /// Create an axis with `n_bins` equal-width bins over `[low, high)`
    pub fn uniform(n_bins: usize, low: f64, high: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::InvalidParameter("n_bins must be positive".to_string()));
        }
        let width = (high - low) / n_bins as f64;
        let edges = (0..=n_bins)
            .map(|i| if i == n_bins { high } else { low + i as f64 * width })
            .collect();
        Self::from_edges(edges)
    }

    /// Number of bins
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// All bin edges, including the upper edge of the last bin
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Lower edge of a bin
    pub fn low_edge(&self, bin: usize) -> f64 {
        self.edges[bin]
    }

    /// Upper edge of a bin
    pub fn up_edge(&self, bin: usize) -> f64 {
        self.edges[bin + 1]
    }

    /// Center of a bin
    pub fn center(&self, bin: usize) -> f64 {
        0.5 * (self.edges[bin] + self.edges[bin + 1])
    }

    /// Find the bin containing `x`; `None` for under/overflow and NaN
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if !(x >= self.edges[0] && x < self.edges[self.edges.len() - 1]) {
            return None;
        }
        Some(self.edges.partition_point(|&e| e <= x) - 1)
    }

    /// Map each bin of `self` onto a bin of the coarser axis `target`
    ///
    /// Every edge of `target` must also be an edge of `self`.
    pub fn projection_onto(&self, target: &Axis) -> Option<Vec<usize>> {
        if target.edges.iter().any(|e| !self.edges.contains(e)) {
            return None;
        }
        (0..self.n_bins())
            .map(|bin| target.find_bin(self.center(bin)))
            .collect()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Axis({} bins, [{}, {}])",
            self.n_bins(),
            self.edges[0],
            self.edges[self.edges.len() - 1]
        )
    }
}

/// A binned estimator: one value and one uncertainty per bin
///
/// Estimators are values. Every arithmetic operation in
/// [`EstimatorOps`](crate::EstimatorOps) returns a new estimator and leaves its
/// operands untouched, so an operand can serve as the base of several terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimator {
    name: String,
    axis: Axis,
    values: Vec<f64>,
    errors: Vec<f64>,
}

impl Estimator {
    /// Create an estimator from values and errors
    pub fn new(
        name: impl Into<String>,
        axis: Axis,
        values: Vec<f64>,
        errors: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if values.len() != axis.n_bins() || errors.len() != axis.n_bins() {
            return Err(Error::InvalidInput(format!(
                "Estimator '{name}' has {} values and {} errors for {} bins",
                values.len(),
                errors.len(),
                axis.n_bins()
            )));
        }
        Ok(Self {
            name,
            axis,
            values,
            errors,
        })
    }

    /// Create an estimator with zero errors
    pub fn from_values(name: impl Into<String>, axis: Axis, values: Vec<f64>) -> Result<Self> {
        let errors = vec![0.0; values.len()];
        Self::new(name, axis, values, errors)
    }

    /// Create an estimator with the same value in every bin
    pub fn constant(name: impl Into<String>, axis: Axis, value: f64) -> Self {
        let n = axis.n_bins();
        Self {
            name: name.into(),
            axis,
            values: vec![value; n],
            errors: vec![0.0; n],
        }
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the estimator has no bins
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bin values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Bin uncertainties
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    /// Value of one bin
    pub fn value(&self, bin: usize) -> f64 {
        self.values[bin]
    }

    /// Uncertainty of one bin
    pub fn error(&self, bin: usize) -> f64 {
        self.errors[bin]
    }

    /// Copy with a different name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Copy with replaced uncertainties
    pub fn with_errors(mut self, errors: Vec<f64>) -> Result<Self> {
        if errors.len() != self.values.len() {
            return Err(Error::InvalidInput(format!(
                "Expected {} errors for '{}', got {}",
                self.values.len(),
                self.name,
                errors.len()
            )));
        }
        self.errors = errors;
        Ok(self)
    }

    /// Assemble an estimator whose lengths are known to match the axis
    pub(crate) fn from_parts(name: String, axis: Axis, values: Vec<f64>, errors: Vec<f64>) -> Self {
        Self {
            name,
            axis,
            values,
            errors,
        }
    }

    /// Build an estimator on the same axis from per-bin (value, error) pairs
    pub(crate) fn map_bins<F>(&self, name: String, mut f: F) -> Self
    where
        F: FnMut(usize, f64, f64) -> (f64, f64),
    {
        let (values, errors) = (0..self.len())
            .map(|bin| f(bin, self.values[bin], self.errors[bin]))
            .unzip();
        Self {
            name,
            axis: self.axis.clone(),
            values,
            errors,
        }
    }
}

impl Binned for Estimator {
    fn name(&self) -> &str {
        &self.name
    }

    fn axis(&self) -> &Axis {
        &self.axis
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Estimator('{}', {})", self.name, self.axis)
    }
}
