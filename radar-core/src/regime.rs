//! Market regime labels and the classifier seam.
//!
//! The scoring engine only sees the label string; this module gives it a type
//! and a trait so a real classifier can replace the fixed stand-in.

use crate::domain::BarSeries;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Regime {
    Green,
    #[default]
    Yellow,
    Red,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }

    /// Parse a label case-insensitively. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "GREEN" => Some(Self::Green),
            "YELLOW" => Some(Self::Yellow),
            "RED" => Some(Self::Red),
            _ => None,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the market regime from the fetched bars.
pub trait RegimeClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, data: &BTreeMap<String, BarSeries>) -> Regime;
}

/// Always returns the same regime. Defaults to YELLOW.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRegime(pub Regime);

impl RegimeClassifier for FixedRegime {
    fn name(&self) -> &str {
        "fixed"
    }

    fn classify(&self, _data: &BTreeMap<String, BarSeries>) -> Regime {
        self.0
    }
}
