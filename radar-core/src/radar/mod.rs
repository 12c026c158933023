//! Candidate Scoring & Selection Engine.
//!
//! A pure function from one cross-section of candidate rows, a regime label and
//! configuration to a ranked shortlist plus per-candidate diagnostics.
//!
//! 1. Keep only rows dated on the most recent date present.
//! 2. Drop rows below the liquidity floor (missing volume counts as 0).
//! 3. Score the rest ([`score::ScoreBreakdown`]) and rank them.
//! 4. Optionally cap the number of picks per sector.

pub mod candidate;
pub mod config;
pub mod score;
pub mod select;

pub use candidate::{CandidateRow, RawCandidate};
pub use config::{MacroMultipliers, RadarConfig};
pub use score::ScoreBreakdown;

use chrono::NaiveDate;
use select::{apply_sector_cap, rank, ScoredCandidate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One selected candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub date: NaiveDate,
    pub symbol: String,
    pub base_score: f64,
    pub macro_mult: f64,
    pub atr_pct: Option<f64>,
    pub sector: Option<String>,
    pub volume: f64,
    pub adj_score: f64,
}

/// Full scoring diagnostics for one liquid candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDebug {
    pub date: NaiveDate,
    pub symbol: String,
    pub s_mom: f64,
    pub s_vol: f64,
    pub s_trend: f64,
    pub s_breakout: f64,
    pub s_rs: f64,
    pub atr_penalty: f64,
    pub base_score: f64,
    pub macro_mult: f64,
    pub adj_score: f64,
    pub volume: f64,
    pub atr_pct: Option<f64>,
    pub sector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarSummary {
    /// Evaluation date as `YYYY-MM-DD`, or empty when no row had a date.
    pub latest: String,
    pub candidates: usize,
    pub picked: usize,
    pub macro_trend: String,
    pub macro_mult: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarResult {
    pub picks: Vec<Pick>,
    pub candidates_debug: Vec<CandidateDebug>,
    pub summary: RadarSummary,
}

impl RadarResult {
    fn empty(macro_trend: String, macro_mult: f64) -> Self {
        Self {
            picks: Vec::new(),
            candidates_debug: Vec::new(),
            summary: RadarSummary {
                latest: String::new(),
                candidates: 0,
                picked: 0,
                macro_trend,
                macro_mult,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates_debug.is_empty()
    }
}

impl From<&ScoredCandidate> for Pick {
    fn from(c: &ScoredCandidate) -> Self {
        Self {
            date: c.row.date,
            symbol: c.row.symbol.clone(),
            base_score: c.score.base_score,
            macro_mult: c.score.macro_mult,
            atr_pct: c.row.atr_pct,
            sector: c.row.sector.clone(),
            volume: c.volume,
            adj_score: c.score.adj_score,
        }
    }
}

impl From<&ScoredCandidate> for CandidateDebug {
    fn from(c: &ScoredCandidate) -> Self {
        let s = &c.score;
        Self {
            date: c.row.date,
            symbol: c.row.symbol.clone(),
            s_mom: s.s_mom,
            s_vol: s.s_vol,
            s_trend: s.s_trend,
            s_breakout: s.s_breakout,
            s_rs: s.s_rs,
            atr_penalty: s.atr_penalty,
            base_score: s.base_score,
            macro_mult: s.macro_mult,
            adj_score: s.adj_score,
            volume: c.volume,
            atr_pct: c.row.atr_pct,
            sector: c.row.sector.clone(),
        }
    }
}

/// Score typed candidate rows.
pub fn compute_radar(
    rows: &[CandidateRow],
    regime_label: &str,
    macros: &MacroMultipliers,
    config: &RadarConfig,
) -> RadarResult {
    let latest = rows.iter().map(|r| r.date).max();
    score_cross_section(rows, latest, regime_label, macros, config)
}

/// Score raw rows after one parse-and-validate pass.
///
/// Dated rows that lack a symbol still count toward the evaluation date even
/// though they are not scored themselves.
pub fn compute_radar_raw(
    raw: &[RawCandidate],
    regime_label: &str,
    macros: &MacroMultipliers,
    config: &RadarConfig,
) -> RadarResult {
    let latest = raw.iter().filter_map(RawCandidate::date).max();
    let rows: Vec<CandidateRow> = raw.iter().filter_map(CandidateRow::parse).collect();
    score_cross_section(&rows, latest, regime_label, macros, config)
}

fn score_cross_section(
    rows: &[CandidateRow],
    latest: Option<NaiveDate>,
    regime_label: &str,
    macros: &MacroMultipliers,
    config: &RadarConfig,
) -> RadarResult {
    let macro_trend = MacroMultipliers::normalize_label(regime_label);
    let macro_mult = macros.lookup(&macro_trend);

    let Some(latest) = latest else {
        debug!(rows = rows.len(), "no dated candidates, empty radar");
        return RadarResult::empty(macro_trend, macro_mult);
    };

    let mut scored: Vec<ScoredCandidate> = rows
        .iter()
        .filter(|r| r.date == latest)
        .filter_map(|r| {
            let volume = r.volume.unwrap_or(0.0);
            if volume < config.liq_min {
                return None;
            }
            Some(ScoredCandidate {
                row: r.clone(),
                volume,
                score: ScoreBreakdown::compute(r, macro_mult),
            })
        })
        .collect();
    rank(&mut scored);

    let selected: Vec<&ScoredCandidate> = if config.use_sector_cap {
        apply_sector_cap(&scored, config.sector_cap)
    } else {
        scored.iter().collect()
    };

    let picks: Vec<Pick> = selected.into_iter().map(Pick::from).collect();
    let candidates_debug: Vec<CandidateDebug> = scored.iter().map(CandidateDebug::from).collect();

    debug!(
        latest = %latest,
        rows = rows.len(),
        candidates = candidates_debug.len(),
        picked = picks.len(),
        macro_trend = %macro_trend,
        macro_mult,
        "radar scored"
    );

    RadarResult {
        summary: RadarSummary {
            latest: latest.format("%Y-%m-%d").to_string(),
            candidates: candidates_debug.len(),
            picked: picks.len(),
            macro_trend,
            macro_mult,
        },
        picks,
        candidates_debug,
    }
}
