//! Scoring configuration: liquidity floor, sector cap, macro multipliers.

use crate::numeric::{parse_flag, parse_numeric};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_LIQ_MIN: f64 = 1_000_000.0;
pub const DEFAULT_SECTOR_CAP: usize = 2;

/// Label used when the regime label is empty.
pub const FALLBACK_REGIME: &str = "YELLOW";
/// Table key consulted for labels without their own entry.
pub const DEFAULT_KEY: &str = "DEFAULT";

/// Liquidity and concentration settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Rows with volume below this never get scored.
    #[serde(rename = "RADAR_LIQ_MIN")]
    pub liq_min: f64,
    #[serde(rename = "RADAR_USE_SECTOR_CAP")]
    pub use_sector_cap: bool,
    /// Maximum picks per sector when capping is enabled.
    #[serde(rename = "RADAR_SECTOR_CAP")]
    pub sector_cap: usize,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            liq_min: DEFAULT_LIQ_MIN,
            use_sector_cap: false,
            sector_cap: DEFAULT_SECTOR_CAP,
        }
    }
}

impl RadarConfig {
    /// Read the `RADAR_*` keys from a loose config map, keeping the default for
    /// any key that is missing or unreadable.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            liq_min: map
                .get("RADAR_LIQ_MIN")
                .and_then(parse_numeric)
                .unwrap_or(defaults.liq_min),
            use_sector_cap: map
                .get("RADAR_USE_SECTOR_CAP")
                .and_then(parse_flag)
                .unwrap_or(defaults.use_sector_cap),
            sector_cap: map
                .get("RADAR_SECTOR_CAP")
                .and_then(parse_numeric)
                .filter(|v| *v >= 0.0)
                .map(|v| v as usize)
                .unwrap_or(defaults.sector_cap),
        }
    }
}

/// Regime label → score multiplier.
///
/// Keys are stored uppercase. Lookups fall back to `DEFAULT`, then to 1.0.
/// The built-in table is neutral: every regime scores at full weight until a
/// multiplier is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct MacroMultipliers {
    table: BTreeMap<String, f64>,
}

impl Default for MacroMultipliers {
    fn default() -> Self {
        Self::from_flat_keys(&Map::new())
    }
}

impl From<BTreeMap<String, f64>> for MacroMultipliers {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        Self::from_pairs(raw)
    }
}

impl From<MacroMultipliers> for BTreeMap<String, f64> {
    fn from(m: MacroMultipliers) -> Self {
        m.table
    }
}

impl MacroMultipliers {
    pub fn from_pairs<K: AsRef<str>>(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        let table = pairs
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| (k.as_ref().trim().to_ascii_uppercase(), v))
            .collect();
        Self { table }
    }

    /// Build the table from flat `macro_mult_<LABEL>` keys.
    ///
    /// GREEN, YELLOW and RED each default to 1.0 when their key is missing or
    /// unreadable; `DEFAULT` is always 1.0.
    pub fn from_flat_keys(map: &Map<String, Value>) -> Self {
        let read = |label: &str| {
            map.get(&format!("macro_mult_{label}"))
                .and_then(parse_numeric)
                .unwrap_or(1.0)
        };
        Self::from_pairs([
            ("GREEN", read("GREEN")),
            ("YELLOW", read("YELLOW")),
            ("RED", read("RED")),
            (DEFAULT_KEY, 1.0),
        ])
    }

    /// Normalize a regime label: trimmed, uppercase, `YELLOW` when empty.
    pub fn normalize_label(label: &str) -> String {
        let label = label.trim().to_ascii_uppercase();
        if label.is_empty() {
            FALLBACK_REGIME.to_string()
        } else {
            label
        }
    }

    /// Multiplier for a regime label (normalized first).
    pub fn lookup(&self, label: &str) -> f64 {
        let label = Self::normalize_label(label);
        self.table
            .get(&label)
            .or_else(|| self.table.get(DEFAULT_KEY))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.table.get(key).copied()
    }

    pub fn insert(&mut self, label: &str, mult: f64) {
        if mult.is_finite() {
            self.table.insert(label.trim().to_ascii_uppercase(), mult);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn radar_config_defaults() {
        let c = RadarConfig::default();
        assert_eq!(c.liq_min, 1_000_000.0);
        assert!(!c.use_sector_cap);
        assert_eq!(c.sector_cap, 2);
    }

    #[test]
    fn radar_config_from_loose_map() {
        let map = json!({
            "RADAR_LIQ_MIN": "500000",
            "RADAR_USE_SECTOR_CAP": "true",
            "RADAR_SECTOR_CAP": 1,
        });
        let c = RadarConfig::from_map(map.as_object().unwrap());
        assert_eq!(c.liq_min, 500_000.0);
        assert!(c.use_sector_cap);
        assert_eq!(c.sector_cap, 1);
    }

    #[test]
    fn radar_config_bad_values_fall_back() {
        let map = json!({
            "RADAR_LIQ_MIN": "lots",
            "RADAR_USE_SECTOR_CAP": "maybe",
            "RADAR_SECTOR_CAP": -3,
        });
        assert_eq!(
            RadarConfig::from_map(map.as_object().unwrap()),
            RadarConfig::default()
        );
    }

    #[test]
    fn radar_config_deserializes_wire_names() {
        let c: RadarConfig = serde_json::from_value(json!({"RADAR_SECTOR_CAP": 3})).unwrap();
        assert_eq!(c.sector_cap, 3);
        assert_eq!(c.liq_min, DEFAULT_LIQ_MIN);
    }

    #[test]
    fn lookup_uppercases_and_defaults() {
        let m = MacroMultipliers::from_pairs([("GREEN", 1.1), ("YELLOW", 0.9), ("RED", 0.8)]);
        assert_eq!(m.lookup("red"), 0.8);
        assert_eq!(m.lookup(" Green "), 1.1);
        assert_eq!(m.lookup(""), 0.9);
        assert_eq!(m.lookup("PURPLE"), 1.0);
    }

    #[test]
    fn default_table_is_neutral() {
        let m = MacroMultipliers::default();
        for label in ["GREEN", "YELLOW", "RED", "DEFAULT", "", "purple"] {
            assert_eq!(m.lookup(label), 1.0, "{label}");
        }
        assert_eq!(m.get("YELLOW"), Some(1.0));
    }

    #[test]
    fn lookup_without_default_entry() {
        let m = MacroMultipliers::from_pairs([("GREEN", 1.2)]);
        assert_eq!(m.lookup("RED"), 1.0);
        assert_eq!(m.lookup("green"), 1.2);
    }

    #[test]
    fn flat_keys_default_to_one() {
        let map = json!({ "macro_mult_RED": "0.7" });
        let m = MacroMultipliers::from_flat_keys(map.as_object().unwrap());
        assert_eq!(m.lookup("RED"), 0.7);
        assert_eq!(m.lookup("YELLOW"), 1.0);
        assert_eq!(m.get("DEFAULT"), Some(1.0));
    }

    #[test]
    fn table_keys_are_uppercased_on_deserialize() {
        let m: MacroMultipliers = serde_json::from_value(json!({"green": 1.1})).unwrap();
        assert_eq!(m.get("GREEN"), Some(1.1));
    }
}
