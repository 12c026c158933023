//! Screening pipeline: fetch → indicators → regime → radar.
//!
//! The caller owns a [`PipelineContext`] (provider, classifier, configuration,
//! symbols, evaluation date) and gets back an immutable [`PipelineResult`].
//! Nothing is cached between runs; the same context over the same bars yields
//! the same result.
//!
//! Indicator snapshots are computed in parallel with rayon and gathered into a
//! symbol-keyed map before scoring, so the result does not depend on thread
//! scheduling.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use radar_core::data::BarProvider;
use radar_core::domain::{DatasetHash, SymbolSnapshot};
use radar_core::radar::{compute_radar, CandidateRow, RadarResult};
use radar_core::regime::{FixedRegime, RegimeClassifier};
use radar_core::snapshot::IndicatorEngine;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ScreenConfig;
use crate::data_loader::{fetch_bars, FetchError, FetchOptions, FetchSummary};

/// Current schema version of [`PipelineResult`].
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch stage: {0}")]
    Fetch(#[from] FetchError),
}

/// A symbol that was fetched but produced no snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolError {
    pub symbol: String,
    pub message: String,
}

/// Everything one screening run needs.
pub struct PipelineContext {
    pub config: ScreenConfig,
    pub provider: Box<dyn BarProvider>,
    pub classifier: Box<dyn RegimeClassifier>,
    /// Symbols to screen; the configured universe when empty.
    pub symbols: Vec<String>,
    pub as_of: NaiveDate,
}

impl PipelineContext {
    /// A context over the configured universe with the fixed YELLOW
    /// classifier.
    pub fn new(config: ScreenConfig, provider: Box<dyn BarProvider>, today: NaiveDate) -> Self {
        let as_of = config.as_of_or(today);
        Self {
            config,
            provider,
            classifier: Box::new(FixedRegime::default()),
            symbols: Vec::new(),
            as_of,
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn RegimeClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    /// Explicit symbols, or every universe symbol when none were given.
    pub fn resolved_symbols(&self) -> Vec<String> {
        if self.symbols.is_empty() {
            self.config
                .universe
                .all_symbols()
                .into_iter()
                .map(String::from)
                .collect()
        } else {
            self.symbols.clone()
        }
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new(self.as_of).with_lookback_days(self.config.screen.lookback_days)
    }
}

/// Immutable output of one screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub fetch: FetchSummary,
    pub snapshots: BTreeMap<String, SymbolSnapshot>,
    /// Fetched symbols whose snapshot could not be computed.
    pub symbol_errors: Vec<SymbolError>,
    pub regime: String,
    pub radar: RadarResult,
    pub dataset_hash: DatasetHash,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run the whole pipeline for `ctx`.
pub fn run_pipeline(ctx: &PipelineContext) -> Result<PipelineResult, PipelineError> {
    let symbols = ctx.resolved_symbols();
    let report = fetch_bars(&symbols, ctx.provider.as_ref(), &ctx.fetch_options())?;
    if !report.is_ok() {
        warn!(errors = ?report.errors, "no bars fetched; scoring an empty set");
    }

    let engine = IndicatorEngine::new(ctx.config.snapshot_config());
    let outcomes: BTreeMap<_, _> = report
        .data
        .par_iter()
        .map(|(symbol, series)| (symbol.clone(), engine.compute(series)))
        .collect();

    let mut snapshots = BTreeMap::new();
    let mut symbol_errors = Vec::new();
    for (symbol, outcome) in outcomes {
        match outcome.and_then(|o| o.into_result()) {
            Ok(snapshot) => {
                snapshots.insert(symbol, snapshot);
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "snapshot failed");
                symbol_errors.push(SymbolError {
                    symbol,
                    message: e.to_string(),
                });
            }
        }
    }

    let regime = match &ctx.config.screen.regime {
        Some(label) => label.trim().to_ascii_uppercase(),
        None => ctx.classifier.classify(&report.data).as_str().to_string(),
    };

    let universe = &ctx.config.universe;
    let rows: Vec<CandidateRow> = snapshots
        .values()
        .map(|s| CandidateRow::from_snapshot(s, universe.sector_of(&s.symbol).map(String::from)))
        .collect();
    let radar = compute_radar(&rows, &regime, &ctx.config.macro_mults, &ctx.config.radar);

    info!(
        as_of = %ctx.as_of,
        fetched = report.data.len(),
        snapshots = snapshots.len(),
        regime = %regime,
        candidates = radar.summary.candidates,
        picked = radar.summary.picked,
        dataset_hash = %report.dataset_hash,
        "screen complete"
    );

    Ok(PipelineResult {
        schema_version: SCHEMA_VERSION,
        fetch: FetchSummary::from(&report),
        snapshots,
        symbol_errors,
        regime,
        radar,
        dataset_hash: report.dataset_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_core::data::{InMemoryProvider, SyntheticProvider};
    use radar_core::domain::{Bar, BarSeries};
    use radar_core::regime::Regime;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ramp(symbol: &str, n: usize, volume: f64) -> BarSeries {
        let start = day(2024, 3, 1);
        let bars = (0..n)
            .map(|i| {
                let close = 50.0 + i as f64 * 0.5;
                Bar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close - 0.2,
                    high: close + 0.6,
                    low: close - 0.6,
                    close,
                    volume,
                }
            })
            .collect();
        BarSeries::new(symbol, bars).unwrap()
    }

    fn ctx(provider: InMemoryProvider, symbols: &[&str]) -> PipelineContext {
        PipelineContext::new(ScreenConfig::default(), Box::new(provider), day(2024, 6, 30))
            .with_symbols(symbols.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn short_series_is_reported_not_fatal() {
        let provider = InMemoryProvider::new()
            .with_series(ramp("LONG", 90, 2e6))
            .with_series(ramp("SHORT", 5, 2e6));
        let result = run_pipeline(&ctx(provider, &["LONG", "SHORT"]).with_as_of(day(2024, 5, 29)))
            .unwrap();

        assert_eq!(result.snapshots.len(), 1);
        assert!(result.snapshots.contains_key("LONG"));
        assert_eq!(result.symbol_errors.len(), 1);
        assert_eq!(result.symbol_errors[0].symbol, "SHORT");
        assert_eq!(result.radar.summary.candidates, 1);
        assert_eq!(result.regime, "YELLOW");
        assert_eq!(result.radar.summary.macro_mult, 1.0);
    }

    #[test]
    fn regime_override_beats_classifier() {
        let mut config = ScreenConfig::default();
        config.screen.regime = Some(" red ".into());
        let provider = InMemoryProvider::new().with_series(ramp("A", 60, 2e6));
        let ctx = PipelineContext::new(config, Box::new(provider), day(2024, 4, 29))
            .with_symbols(vec!["A".into()])
            .with_classifier(Box::new(FixedRegime(Regime::Green)));
        let result = run_pipeline(&ctx).unwrap();
        assert_eq!(result.regime, "RED");
        assert_eq!(result.radar.summary.macro_trend, "RED");
    }

    #[test]
    fn classifier_label_is_used_without_override() {
        let provider = InMemoryProvider::new().with_series(ramp("A", 60, 2e6));
        let ctx = ctx(provider, &["A"])
            .with_as_of(day(2024, 4, 29))
            .with_classifier(Box::new(FixedRegime(Regime::Green)));
        assert_eq!(run_pipeline(&ctx).unwrap().regime, "GREEN");
    }

    #[test]
    fn universe_supplies_symbols_and_sectors() {
        let mut config = ScreenConfig::default();
        config.universe = radar_core::data::Universe::from_toml(
            "[sectors]\nTech = [\"AAA\", \"BBB\"]\nEnergy = [\"CCC\"]\n",
        )
        .unwrap();
        config.radar.liq_min = 0.0;
        let ctx = PipelineContext::new(config, Box::new(SyntheticProvider::new()), day(2024, 6, 28));
        assert_eq!(ctx.resolved_symbols().len(), 3);

        let result = run_pipeline(&ctx).unwrap();
        assert_eq!(result.snapshots.len(), 3);
        for pick in &result.radar.picks {
            let expected = if pick.symbol == "CCC" { "Energy" } else { "Tech" };
            assert_eq!(pick.sector.as_deref(), Some(expected));
        }
    }

    #[test]
    fn nothing_fetched_gives_empty_radar() {
        let result = run_pipeline(&ctx(InMemoryProvider::new(), &["GONE"])).unwrap();
        assert_eq!(result.fetch.status.as_str(), "ERROR");
        assert!(result.snapshots.is_empty());
        assert_eq!(result.radar.summary.latest, "");
        assert_eq!(result.radar.summary.picked, 0);
    }

    #[test]
    fn negative_lookback_is_a_pipeline_error() {
        let mut config = ScreenConfig::default();
        config.screen.lookback_days = -3;
        let ctx = PipelineContext::new(config, Box::new(InMemoryProvider::new()), day(2024, 6, 28))
            .with_symbols(vec!["A".into()]);
        assert!(matches!(run_pipeline(&ctx), Err(PipelineError::Fetch(_))));
    }
}
