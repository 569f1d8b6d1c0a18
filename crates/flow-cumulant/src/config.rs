//! Engine configuration

use serde::{Deserialize, Serialize};

/// Configuration for [`CumulantEngine`](crate::CumulantEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gap label shared by the correlator and joint-moment names
    pub gap_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gap_label: "ChGap".to_string(),
        }
    }
}

impl EngineConfig {
    /// Use a different gap label
    pub fn with_gap_label(mut self, label: impl Into<String>) -> Self {
        self.gap_label = label.into();
        self
    }
}
