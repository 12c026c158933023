//! Screen configuration file.
//!
//! One TOML file carries every knob of a screening run:
//!
//! ```toml
//! [screen]
//! lookback_days = 120
//! as_of = "2024-06-28"
//! regime = "GREEN"
//!
//! [radar]
//! RADAR_LIQ_MIN = 1000000
//! RADAR_USE_SECTOR_CAP = true
//! RADAR_SECTOR_CAP = 2
//! macro_mult_YELLOW = 0.9
//!
//! [risk]
//! RISK_ATR_GREEN_MAX = "3%"
//! RISK_ATR_YELLOW_MAX = 0.06
//!
//! [macro_mults]
//! GREEN = 1.0
//! RED = 0.75
//!
//! [universe.sectors]
//! Technology = ["AAPL", "MSFT"]
//! ```
//!
//! Every section and key is optional. The `[radar]`, `[risk]` and
//! `[macro_mults]` tables are read leniently: numbers, numeric strings and
//! percent strings are accepted, and anything unreadable keeps its default.
//! Regime multipliers default to 1.0. They can be set with flat
//! `macro_mult_<LABEL>` keys in `[radar]`; a label listed in `[macro_mults]`
//! wins over its flat key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use radar_core::data::Universe;
use radar_core::indicators::AdxSeed;
use radar_core::numeric::parse_numeric;
use radar_core::radar::{MacroMultipliers, RadarConfig};
use radar_core::snapshot::{RiskThresholds, SnapshotConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The `[screen]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSection {
    /// Calendar days of history fetched before `as_of`.
    pub lookback_days: i64,
    /// Evaluation date; today (UTC) when absent.
    pub as_of: Option<NaiveDate>,
    /// Regime label that overrides the classifier.
    pub regime: Option<String>,
    pub adx_seed: AdxSeed,
}

impl Default for ScreenSection {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            as_of: None,
            regime: None,
            adx_seed: AdxSeed::default(),
        }
    }
}

/// Resolved configuration of a screening run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreenConfig {
    pub screen: ScreenSection,
    pub radar: RadarConfig,
    pub risk: RiskThresholds,
    pub macro_mults: MacroMultipliers,
    pub universe: Universe,
}

/// File layout before lenient coercion.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScreenConfig {
    screen: ScreenSection,
    radar: Map<String, Value>,
    risk: Map<String, Value>,
    macro_mults: BTreeMap<String, Value>,
    universe: Universe,
}

impl ScreenConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawScreenConfig = toml::from_str(content)?;
        if raw.screen.lookback_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "lookback_days must be >= 0, got {}",
                raw.screen.lookback_days
            )));
        }

        // Flat `macro_mult_<LABEL>` keys in [radar] first, then [macro_mults] on top
        let mut macro_mults = MacroMultipliers::from_flat_keys(&raw.radar);
        for (label, value) in &raw.macro_mults {
            if let Some(mult) = parse_numeric(value) {
                macro_mults.insert(label, mult);
            }
        }

        Ok(Self {
            screen: raw.screen,
            radar: RadarConfig::from_map(&raw.radar),
            risk: RiskThresholds::from_map(&raw.risk),
            macro_mults,
            universe: raw.universe,
        })
    }

    /// Settings handed to the indicator engine.
    pub fn snapshot_config(&self) -> SnapshotConfig {
        SnapshotConfig {
            risk: self.risk,
            adx_seed: self.screen.adx_seed,
        }
    }

    /// Evaluation date, falling back to `today`.
    pub fn as_of_or(&self, today: NaiveDate) -> NaiveDate {
        self.screen.as_of.unwrap_or(today)
    }
}
