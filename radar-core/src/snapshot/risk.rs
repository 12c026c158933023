//! Risk colour: a three-band volatility label from ATR%.

use crate::domain::RiskColor;
use crate::numeric::parse_numeric;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_GREEN_MAX: f64 = 0.03;
pub const DEFAULT_YELLOW_MAX: f64 = 0.06;

/// Upper ATR% bounds of the GREEN and YELLOW bands, as fractions.
///
/// Every construction path normalizes percents once, so stored values are
/// always fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThresholdFields")]
pub struct RiskThresholds {
    #[serde(rename = "RISK_ATR_GREEN_MAX")]
    pub green_max: f64,
    #[serde(rename = "RISK_ATR_YELLOW_MAX")]
    pub yellow_max: f64,
}

/// Wire form before percent normalization.
#[derive(Deserialize)]
struct ThresholdFields {
    #[serde(rename = "RISK_ATR_GREEN_MAX", default = "default_green")]
    green_max: f64,
    #[serde(rename = "RISK_ATR_YELLOW_MAX", default = "default_yellow")]
    yellow_max: f64,
}

impl From<ThresholdFields> for RiskThresholds {
    fn from(raw: ThresholdFields) -> Self {
        Self::new(raw.green_max, raw.yellow_max)
    }
}

fn default_green() -> f64 {
    DEFAULT_GREEN_MAX
}

fn default_yellow() -> f64 {
    DEFAULT_YELLOW_MAX
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            green_max: DEFAULT_GREEN_MAX,
            yellow_max: DEFAULT_YELLOW_MAX,
        }
    }
}

/// Values of 1 or more are percents (`3` means 3%).
fn as_fraction(v: f64) -> f64 {
    if v >= 1.0 {
        v / 100.0
    } else {
        v
    }
}

impl RiskThresholds {
    pub fn new(green_max: f64, yellow_max: f64) -> Self {
        Self {
            green_max: as_fraction(green_max),
            yellow_max: as_fraction(yellow_max),
        }
    }

    /// Read `RISK_ATR_GREEN_MAX` / `RISK_ATR_YELLOW_MAX` from a loose config map.
    ///
    /// Numbers, numeric strings and percent strings are accepted; anything
    /// unparseable falls back to the default for that key.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let read = |key: &str, default: f64| {
            map.get(key).and_then(parse_numeric).unwrap_or(default)
        };
        Self::new(
            read("RISK_ATR_GREEN_MAX", DEFAULT_GREEN_MAX),
            read("RISK_ATR_YELLOW_MAX", DEFAULT_YELLOW_MAX),
        )
    }

    /// Classify an ATR% fraction. Absent, non-finite or negative input has no
    /// colour.
    pub fn classify(&self, atr_pct: Option<f64>) -> Option<RiskColor> {
        let atr = atr_pct.filter(|v| v.is_finite() && *v >= 0.0)?;
        Some(if atr <= self.green_max {
            RiskColor::Green
        } else if atr <= self.yellow_max {
            RiskColor::Yellow
        } else {
            RiskColor::Red
        })
    }
}
