//! Export of screening results: JSON for the whole run, CSV for the shortlist
//! and the scoring diagnostics.
//!
//! Persisted JSON carries a `schema_version`; unknown versions are rejected on
//! load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use radar_core::radar::{CandidateDebug, Pick, RadarResult};

use crate::pipeline::{PipelineResult, SCHEMA_VERSION};

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(result: &PipelineResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize PipelineResult to JSON")
}

/// Deserialize a `PipelineResult`, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<PipelineResult> {
    let result: PipelineResult =
        serde_json::from_str(json).context("failed to deserialize PipelineResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

/// Scoring engine output alone, in its wire shape.
pub fn export_radar_json(radar: &RadarResult) -> Result<String> {
    serde_json::to_string_pretty(radar).context("failed to serialize RadarResult to JSON")
}

// ─── CSV ────────────────────────────────────────────────────────────

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

/// Columns: rank, date, symbol, sector, adj_score, base_score, macro_mult,
/// atr_pct, volume
pub fn export_picks_csv(picks: &[Pick]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "date",
        "symbol",
        "sector",
        "adj_score",
        "base_score",
        "macro_mult",
        "atr_pct",
        "volume",
    ])?;

    for (i, p) in picks.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            p.date.to_string(),
            p.symbol.clone(),
            p.sector.clone().unwrap_or_default(),
            format!("{:.4}", p.adj_score),
            format!("{:.4}", p.base_score),
            format!("{:.4}", p.macro_mult),
            opt(p.atr_pct),
            format!("{:.0}", p.volume),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// One row per scored candidate with every sub-score.
pub fn export_debug_csv(candidates: &[CandidateDebug]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "symbol",
        "sector",
        "s_mom",
        "s_vol",
        "s_trend",
        "s_breakout",
        "s_rs",
        "atr_penalty",
        "base_score",
        "macro_mult",
        "adj_score",
        "atr_pct",
        "volume",
    ])?;

    for c in candidates {
        wtr.write_record([
            c.date.to_string(),
            c.symbol.clone(),
            c.sector.clone().unwrap_or_default(),
            format!("{:.4}", c.s_mom),
            format!("{:.4}", c.s_vol),
            format!("{:.4}", c.s_trend),
            format!("{:.4}", c.s_breakout),
            format!("{:.4}", c.s_rs),
            format!("{:.4}", c.atr_penalty),
            format!("{:.4}", c.base_score),
            format!("{:.4}", c.macro_mult),
            format!("{:.4}", c.adj_score),
            opt(c.atr_pct),
            format!("{:.0}", c.volume),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Save `result.json`, `picks.csv` and `candidates.csv` under `dir`.
///
/// Returns the paths written.
pub fn save_artifacts(result: &PipelineResult, dir: &Path) -> Result<Vec<PathBuf>> {
    let files = [
        ("result.json", export_json(result)?),
        ("picks.csv", export_picks_csv(&result.radar.picks)?),
        ("candidates.csv", export_debug_csv(&result.radar.candidates_debug)?),
    ];
    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        write_file(&path, &contents)?;
        written.push(path);
    }
    Ok(written)
}
