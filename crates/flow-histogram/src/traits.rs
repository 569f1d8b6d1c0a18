//! Core traits for binned quantities

use crate::types::Axis;
use flow_core::{Error, Result};

/// Anything that lives on a named binning
pub trait Binned {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// The binning
    fn axis(&self) -> &Axis;

    /// Two binned quantities are compatible iff their axes are identical
    fn is_compatible<B: Binned + ?Sized>(&self, other: &B) -> bool {
        self.axis() == other.axis()
    }

    /// Fail with a binning mismatch naming both operands unless compatible
    fn ensure_compatible<B: Binned + ?Sized>(&self, other: &B) -> Result<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(Error::binning_mismatch(self.name(), other.name()))
        }
    }
}
