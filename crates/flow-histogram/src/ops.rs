//! Bin-wise algebra on estimators
//!
//! Errors follow linear propagation for uncorrelated operands, the same
//! convention histogram arithmetic uses for `Add` and `Multiply`.

use crate::traits::Binned;
use crate::types::Estimator;
use flow_core::Result;

/// Arithmetic that can be performed on binned estimators
///
/// Every operation returns a fresh estimator. Binary operations fail with a
/// binning mismatch when the operands do not share identical bin edges.
pub trait EstimatorOps: Sized {
    /// `self + c * other`
    fn add_scaled(&self, other: &Self, c: f64) -> Result<Self>;

    /// `self * other`, bin by bin
    fn multiply(&self, other: &Self) -> Result<Self>;

    /// `c * self`
    fn scale(&self, c: f64) -> Self;

    /// `self + other`
    fn add(&self, other: &Self) -> Result<Self> {
        self.add_scaled(other, 1.0)
    }

    /// `self - other`
    fn sub(&self, other: &Self) -> Result<Self> {
        self.add_scaled(other, -1.0)
    }

    /// `self^k` by repeated bin-wise multiplication; `k = 0` gives ones
    fn powi(&self, k: u32) -> Self;
}

impl EstimatorOps for Estimator {
    fn add_scaled(&self, other: &Self, c: f64) -> Result<Self> {
        self.ensure_compatible(other)?;
        let name = if c < 0.0 {
            format!("({} - {}*{})", self.name(), -c, other.name())
        } else {
            format!("({} + {}*{})", self.name(), c, other.name())
        };
        Ok(self.map_bins(name, |bin, a, ea| {
            let (b, eb) = (other.value(bin), other.error(bin));
            (a + c * b, (ea * ea + c * c * eb * eb).sqrt())
        }))
    }

    fn multiply(&self, other: &Self) -> Result<Self> {
        self.ensure_compatible(other)?;
        let name = format!("{}*{}", self.name(), other.name());
        Ok(self.map_bins(name, |bin, a, ea| {
            let (b, eb) = (other.value(bin), other.error(bin));
            let err = ((ea * b).powi(2) + (eb * a).powi(2)).sqrt();
            (a * b, err)
        }))
    }

    fn scale(&self, c: f64) -> Self {
        let name = format!("{}*{}", c, self.name());
        self.map_bins(name, |_, a, ea| (c * a, c.abs() * ea))
    }

    fn powi(&self, k: u32) -> Self {
        let name = format!("{}^{}", self.name(), k);
        // repeated multiplication propagates the error as k * a^(k-1) * ea
        self.map_bins(name, |_, a, ea| {
            let err = if k == 0 {
                0.0
            } else {
                k as f64 * a.powi(k as i32 - 1).abs() * ea
            };
            (a.powi(k as i32), err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Axis;
    use approx::assert_relative_eq;
    use flow_core::Error;

    fn estimator(name: &str, values: Vec<f64>, errors: Vec<f64>) -> Estimator {
        let axis = Axis::uniform(values.len(), 0.0, values.len() as f64).unwrap();
        Estimator::new(name, axis, values, errors).unwrap()
    }

    #[test]
    fn test_add_scaled() {
        let a = estimator("a", vec![1.0, 2.0], vec![0.3, 0.0]);
        let b = estimator("b", vec![10.0, 20.0], vec![0.4, 0.5]);
        let r = a.add_scaled(&b, -0.5).unwrap();
        assert_eq!(r.values(), &[-4.0, -8.0]);
        assert_relative_eq!(r.error(0), (0.09f64 + 0.04).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(r.error(1), 0.25, epsilon = 1e-12);
        // operands untouched
        assert_eq!(a.values(), &[1.0, 2.0]);
        assert_eq!(b.values(), &[10.0, 20.0]);
    }

    #[test]
    fn test_multiply_propagates_errors() {
        let a = estimator("a", vec![2.0], vec![0.1]);
        let b = estimator("b", vec![3.0], vec![0.2]);
        let r = a.multiply(&b).unwrap();
        assert_eq!(r.value(0), 6.0);
        assert_relative_eq!(r.error(0), (0.09f64 + 0.16).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_powi_matches_repeated_multiply() {
        let a = estimator("pt", vec![0.3, -0.5], vec![0.0, 0.0]);
        let cubed = a.multiply(&a).unwrap().multiply(&a).unwrap();
        let p = a.powi(3);
        for bin in 0..2 {
            assert_relative_eq!(p.value(bin), cubed.value(bin), epsilon = 1e-15);
        }
        assert_eq!(a.powi(0).values(), &[1.0, 1.0]);
    }

    #[test]
    fn test_scale() {
        let a = estimator("a", vec![1.0, -2.0], vec![0.1, 0.2]);
        let r = a.scale(-3.0);
        assert_eq!(r.values(), &[-3.0, 6.0]);
        assert_relative_eq!(r.error(1), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_binning_names_both_operands() {
        let a = estimator("ChGap22", vec![1.0, 2.0], vec![0.0; 2]);
        let b = estimator("mpt", vec![1.0, 2.0, 3.0], vec![0.0; 3]);
        match a.multiply(&b) {
            Err(Error::BinningMismatch { left, right }) => {
                assert_eq!(left, "ChGap22");
                assert_eq!(right, "mpt");
            }
            other => panic!("expected binning mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_same_bin_count_different_edges_is_mismatch() {
        let a = estimator("a", vec![1.0, 2.0], vec![0.0; 2]);
        let axis = Axis::from_edges(vec![0.0, 0.5, 2.0]).unwrap();
        let b = Estimator::from_values("b", axis, vec![1.0, 2.0]).unwrap();
        assert!(matches!(a.add(&b), Err(Error::BinningMismatch { .. })));
    }
}
