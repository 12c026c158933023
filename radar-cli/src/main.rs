//! Radar CLI: daily screener commands.
//!
//! Commands:
//! - `screen`: fetch bars, compute snapshots, score and rank the universe
//! - `snapshot`: one symbol's indicator snapshot as JSON
//! - `score`: run the scoring engine on a JSON file of candidate rows

mod logging;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use radar_core::data::{BarProvider, CsvDirProvider, SyntheticProvider};
use radar_core::radar::{compute_radar_raw, RadarResult, RawCandidate};
use radar_core::snapshot::IndicatorEngine;
use radar_runner::{
    export_debug_csv, export_json, export_picks_csv, export_radar_json, run_pipeline, write_file,
    FetchOptions, PipelineContext, PipelineResult, ScreenConfig,
};

use logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "radar", about = "Radar: daily technical screener")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG overrides.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen the universe and print the ranked shortlist.
    Screen {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of <SYMBOL>.csv bar files.
        #[arg(long, conflicts_with = "synthetic")]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic bars instead of files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Symbols to screen. Defaults to the configured universe.
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Evaluation date (YYYY-MM-DD). Defaults to the config, then today (UTC).
        #[arg(long)]
        as_of: Option<String>,

        /// Calendar days of history to fetch.
        #[arg(long)]
        lookback_days: Option<i64>,

        /// Regime label (GREEN, YELLOW, RED) overriding the classifier.
        #[arg(long)]
        regime: Option<String>,

        /// Write the full result as JSON.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the picks as CSV.
        #[arg(long)]
        picks_csv: Option<PathBuf>,

        /// Write the scoring diagnostics as CSV.
        #[arg(long)]
        debug_csv: Option<PathBuf>,

        /// Print the full result as JSON instead of the summary table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print one symbol's indicator snapshot as JSON.
    Snapshot {
        /// Directory of <SYMBOL>.csv bar files.
        #[arg(long)]
        data_dir: PathBuf,

        /// Symbol to compute.
        symbol: String,

        /// Path to a TOML config file (risk thresholds, ADX seed).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Last bar date to include (YYYY-MM-DD). Defaults to every bar in the file.
        #[arg(long)]
        as_of: Option<String>,

        /// Calendar days of history before --as-of.
        #[arg(long)]
        lookback_days: Option<i64>,
    },
    /// Score a JSON array of candidate rows.
    Score {
        /// JSON file holding an array of candidate rows.
        #[arg(long)]
        candidates: PathBuf,

        /// Regime label. Defaults to the config, then YELLOW.
        #[arg(long)]
        regime: Option<String>,

        /// Path to a TOML config file ([radar], [macro_mults]).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the result JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Screen {
            config,
            data_dir,
            synthetic,
            symbols,
            as_of,
            lookback_days,
            regime,
            output,
            picks_csv,
            debug_csv,
            json,
        } => run_screen(ScreenArgs {
            config,
            data_dir,
            synthetic,
            symbols,
            as_of,
            lookback_days,
            regime,
            output,
            picks_csv,
            debug_csv,
            json,
        }),
        Commands::Snapshot {
            data_dir,
            symbol,
            config,
            as_of,
            lookback_days,
        } => run_snapshot(&data_dir, &symbol, config.as_deref(), as_of, lookback_days),
        Commands::Score {
            candidates,
            regime,
            config,
            output,
        } => run_score(&candidates, regime, config.as_deref(), output.as_deref()),
    }
}

struct ScreenArgs {
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    synthetic: bool,
    symbols: Vec<String>,
    as_of: Option<String>,
    lookback_days: Option<i64>,
    regime: Option<String>,
    output: Option<PathBuf>,
    picks_csv: Option<PathBuf>,
    debug_csv: Option<PathBuf>,
    json: bool,
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}

fn load_config(path: Option<&Path>) -> Result<ScreenConfig> {
    match path {
        Some(p) => ScreenConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(ScreenConfig::default()),
    }
}

fn run_screen(args: ScreenArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(raw) = &args.as_of {
        config.screen.as_of = Some(parse_date_arg(raw)?);
    }
    if let Some(days) = args.lookback_days {
        config.screen.lookback_days = days;
    }
    if args.regime.is_some() {
        config.screen.regime = args.regime;
    }

    let provider: Box<dyn BarProvider> = match (args.data_dir, args.synthetic) {
        (Some(dir), false) => Box::new(CsvDirProvider::new(dir)),
        (None, true) => {
            warn!("using synthetic bars; results are not market data");
            Box::new(SyntheticProvider::new())
        }
        _ => bail!("one of --data-dir or --synthetic is required"),
    };

    let ctx = PipelineContext::new(config, provider, today()).with_symbols(args.symbols);
    info!(as_of = %ctx.as_of, symbols = ctx.resolved_symbols().len(), "screen starting");
    let result = run_pipeline(&ctx)?;

    if let Some(path) = &args.output {
        write_file(path, &export_json(&result)?)?;
        info!(path = %path.display(), "result written");
    }
    if let Some(path) = &args.picks_csv {
        write_file(path, &export_picks_csv(&result.radar.picks)?)?;
        info!(path = %path.display(), "picks written");
    }
    if let Some(path) = &args.debug_csv {
        write_file(path, &export_debug_csv(&result.radar.candidates_debug)?)?;
        info!(path = %path.display(), "diagnostics written");
    }

    if args.json {
        println!("{}", export_json(&result)?);
    } else {
        print_summary(&result);
    }
    Ok(())
}

fn run_snapshot(
    data_dir: &Path,
    symbol: &str,
    config_path: Option<&Path>,
    as_of: Option<String>,
    lookback_days: Option<i64>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = CsvDirProvider::new(data_dir);

    let series = match as_of {
        Some(raw) => {
            let days = lookback_days.unwrap_or(config.screen.lookback_days);
            let (start, end) = FetchOptions::new(parse_date_arg(&raw)?)
                .with_lookback_days(days)
                .window()?;
            provider.fetch(symbol, start, end)?
        }
        None => provider.read_all(symbol)?,
    };
    if series.is_empty() {
        bail!("{symbol}: no data returned");
    }

    let engine = IndicatorEngine::new(config.snapshot_config());
    let snapshot = engine
        .compute(&series)?
        .into_result()
        .with_context(|| format!("{symbol}: snapshot failed"))?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run_score(
    candidates_path: &Path,
    regime: Option<String>,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let content = std::fs::read_to_string(candidates_path)
        .with_context(|| format!("failed to read {}", candidates_path.display()))?;
    let rows: Vec<RawCandidate> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of rows", candidates_path.display()))?;

    let regime = regime.or(config.screen.regime).unwrap_or_default();
    let radar: RadarResult = compute_radar_raw(&rows, &regime, &config.macro_mults, &config.radar);
    info!(
        rows = rows.len(),
        candidates = radar.summary.candidates,
        picked = radar.summary.picked,
        "scored"
    );

    let json = export_radar_json(&radar)?;
    match output {
        Some(path) => write_file(path, &json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(result: &PipelineResult) {
    let fetch = &result.fetch;
    let summary = &result.radar.summary;
    println!();
    println!("=== Radar ===");
    println!("As of:          {}", fetch.as_of);
    println!("Latest bar:     {}", summary.latest);
    println!(
        "Fetch:          {} ({} of {} symbols)",
        fetch.status.as_str(),
        fetch.bar_counts.len(),
        fetch.symbols.len()
    );
    println!(
        "Regime:         {} (x{:.2})",
        summary.macro_trend, summary.macro_mult
    );
    println!("Candidates:     {}", summary.candidates);
    println!("Picked:         {}", summary.picked);
    println!("Dataset hash:   {}", result.dataset_hash);

    if !result.radar.picks.is_empty() {
        println!();
        println!(
            "{:>4}  {:<8} {:<16} {:>8} {:>8} {:>7}",
            "#", "Symbol", "Sector", "Adj", "Base", "ATR%"
        );
        for (i, p) in result.radar.picks.iter().enumerate() {
            let atr = p
                .atr_pct
                .map(|a| format!("{:.2}", a * 100.0))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>4}  {:<8} {:<16} {:>8.2} {:>8.2} {:>7}",
                i + 1,
                p.symbol,
                p.sector.as_deref().unwrap_or("-"),
                p.adj_score,
                p.base_score,
                atr
            );
        }
    }

    for err in fetch.errors.iter() {
        println!("WARNING: {err}");
    }
    for err in &result.symbol_errors {
        println!("WARNING: {}: {}", err.symbol, err.message);
    }
    println!();
}
