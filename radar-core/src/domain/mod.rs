//! Domain types for the radar screener

pub mod bar;
pub mod ids;
pub mod snapshot;

pub use bar::{Bar, BarError, BarField, BarSeries};
pub use ids::DatasetHash;
pub use snapshot::{IndicatorSnapshot, RiskColor, SymbolSnapshot};

/// Symbol type alias
pub type Symbol = String;
