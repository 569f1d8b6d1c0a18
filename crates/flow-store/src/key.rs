//! Typed keys for raw correlators and joint flow-pt moments

use flow_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Particle-count orders a multi-particle correlator can have
pub const SUPPORTED_ORDERS: [u8; 4] = [2, 4, 6, 8];

/// Fail with [`Error::UnsupportedOrder`] unless `order` is one of 2, 4, 6, 8
pub fn check_order(order: u8) -> Result<()> {
    if SUPPORTED_ORDERS.contains(&order) {
        Ok(())
    } else {
        Err(Error::UnsupportedOrder { order })
    }
}

/// Address of one multi-particle correlator
///
/// The string form is `"{label}{harmonic}{order}"`, so the four-particle
/// correlator of the second harmonic with label `ChGap` is `ChGap24`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelatorKey {
    pub label: String,
    pub harmonic: u8,
    pub order: u8,
}

impl CorrelatorKey {
    /// Create a key, rejecting particle-count orders outside 2, 4, 6, 8
    pub fn new(label: impl Into<String>, harmonic: u8, order: u8) -> Result<Self> {
        check_order(order)?;
        Ok(Self {
            label: label.into(),
            harmonic,
            order,
        })
    }
}

impl fmt::Display for CorrelatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.label, self.harmonic, self.order)
    }
}

/// Name of one pre-tabulated joint moment of flow and Δpt
///
/// The string form is `"{label}{harmonic}{particles}pt{pt_order}"` followed by
/// `"_Mpt{m}"` when the term carries an explicit power of the mean pt, e.g.
/// `ChGap22pt1_Mpt0` or the reduced form `ChGap24pt1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MomentKey {
    pub label: String,
    pub harmonic: u8,
    pub particles: u8,
    pub pt_order: u8,
    pub mpt_power: Option<u8>,
}

impl MomentKey {
    /// Key of the reduced joint moment (no mean-pt power suffix)
    pub fn new(label: impl Into<String>, harmonic: u8, particles: u8, pt_order: u8) -> Self {
        Self {
            label: label.into(),
            harmonic,
            particles,
            pt_order,
            mpt_power: None,
        }
    }

    /// Same key carrying the `_Mpt{power}` suffix
    pub fn with_mpt(mut self, power: u8) -> Self {
        self.mpt_power = Some(power);
        self
    }

    /// Parse a key from its string form
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("'{s}' is not a joint moment key"));

        let (body, mpt_power) = match s.split_once("_Mpt") {
            Some((body, power)) => (body, Some(power.parse::<u8>().map_err(|_| invalid())?)),
            None => (s, None),
        };
        let (head, pt_order) = body.rsplit_once("pt").ok_or_else(invalid)?;
        let pt_order = pt_order.parse::<u8>().map_err(|_| invalid())?;

        // head is "{label}{harmonic}{particles}" with single-digit numbers
        if head.len() < 3 {
            return Err(invalid());
        }
        let split = head.len() - 2;
        let (Some(label), Some(numbers)) = (head.get(..split), head.get(split..)) else {
            return Err(invalid());
        };
        let mut numbers = numbers.chars().map(|c| c.to_digit(10));
        let (Some(Some(harmonic)), Some(Some(particles))) = (numbers.next(), numbers.next()) else {
            return Err(invalid());
        };
        if label.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(Self {
            label: label.to_string(),
            harmonic: harmonic as u8,
            particles: particles as u8,
            pt_order,
            mpt_power,
        })
    }
}

impl fmt::Display for MomentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}pt{}",
            self.label, self.harmonic, self.particles, self.pt_order
        )?;
        if let Some(power) = self.mpt_power {
            write!(f, "_Mpt{power}")?;
        }
        Ok(())
    }
}

impl FromStr for MomentKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_key_format() {
        let key = MomentKey::new("ChGap", 2, 2, 1).with_mpt(0);
        assert_eq!(key.to_string(), "ChGap22pt1_Mpt0");
        assert_eq!(MomentKey::new("ChGap", 2, 4, 1).to_string(), "ChGap24pt1");
        assert_eq!(
            MomentKey::new("ChGap", 2, 2, 4).with_mpt(3).to_string(),
            "ChGap22pt4_Mpt3"
        );
    }

    #[test]
    fn test_moment_key_parse() {
        for name in ["ChGap22pt1_Mpt0", "ChGap32pt1", "ChGap24pt2_Mpt1", "Full22pt3_Mpt2"] {
            let key: MomentKey = name.parse().unwrap();
            assert_eq!(key.to_string(), name);
        }
        let key = MomentKey::parse("ChGap42pt1_Mpt0").unwrap();
        assert_eq!(key.label, "ChGap");
        assert_eq!(key.harmonic, 4);
        assert_eq!(key.particles, 2);
        assert_eq!(key.pt_order, 1);
        assert_eq!(key.mpt_power, Some(0));
    }

    #[test]
    fn test_moment_key_rejects_garbage() {
        for name in ["", "ChGap22", "22pt1", "ChGap2xpt1", "ChGap22pt1_Mptx", "ChGap122pt1"] {
            assert!(MomentKey::parse(name).is_err(), "{name} should not parse");
        }
    }

    #[test]
    fn test_correlator_key() {
        let key = CorrelatorKey::new("ChGap", 2, 4).unwrap();
        assert_eq!(key.to_string(), "ChGap24");
        assert!(matches!(
            CorrelatorKey::new("ChGap", 2, 3),
            Err(Error::UnsupportedOrder { order: 3 })
        ));
    }
}
