//! Universe: sector-organized symbol lists.
//!
//! Stored as TOML with one array of symbols per sector. The screener uses it
//! for two things: the default symbol list to scan and the sector of each pick
//! when sector capping is enabled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("parse universe TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    #[serde(default)]
    pub sectors: BTreeMap<String, Vec<String>>,
}

impl Universe {
    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        Ok(toml::from_str(content)?)
    }

    /// Every symbol across all sectors, deduplicated, in sector then listing order.
    pub fn all_symbols(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.sectors
            .values()
            .flat_map(|symbols| symbols.iter().map(String::as_str))
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// First sector (alphabetically) that lists `symbol`, case-insensitive.
    pub fn sector_of(&self, symbol: &str) -> Option<&str> {
        self.sectors
            .iter()
            .find(|(_, symbols)| symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol)))
            .map(|(name, _)| name.as_str())
    }
}
