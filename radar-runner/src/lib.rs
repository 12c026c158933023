//! Radar Runner: screening orchestration on top of `radar-core`.
//!
//! This crate provides:
//! - The screen configuration file (`[screen]`, `[radar]`, `[risk]`,
//!   `[macro_mults]`, `[universe]`)
//! - The fetch stage with per-symbol failure reporting and a dataset hash
//! - The pipeline: parallel indicator snapshots, regime, radar scoring
//! - JSON and CSV export of results

pub mod config;
pub mod data_loader;
pub mod export;
pub mod pipeline;

pub use config::{ConfigError, ScreenConfig, ScreenSection, DEFAULT_LOOKBACK_DAYS};
pub use data_loader::{
    compute_dataset_hash, fetch_bars, FetchError, FetchOptions, FetchReport, FetchStatus,
    FetchSummary,
};
pub use export::{
    export_debug_csv, export_json, export_picks_csv, export_radar_json, import_json,
    save_artifacts, write_file,
};
pub use pipeline::{
    run_pipeline, PipelineContext, PipelineError, PipelineResult, SymbolError, SCHEMA_VERSION,
};
