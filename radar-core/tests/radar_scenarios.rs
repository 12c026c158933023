//! End-to-end scenarios through both engines.

use chrono::NaiveDate;
use radar_core::domain::{Bar, BarSeries};
use radar_core::indicators::IndicatorError;
use radar_core::radar::{
    compute_radar, compute_radar_raw, CandidateRow, MacroMultipliers, RadarConfig, RawCandidate,
};
use radar_core::snapshot::IndicatorEngine;
use serde_json::json;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn ramp_series(symbol: &str, n: usize, volume: f64) -> BarSeries {
    let bars = (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            Bar {
                date: base_date() + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.5,
                close,
                volume,
            }
        })
        .collect();
    BarSeries::new(symbol, bars).unwrap()
}

fn raw_rows(value: serde_json::Value) -> Vec<RawCandidate> {
    serde_json::from_value(value).unwrap()
}

/// Scenario A: strictly rising closes with flat volume score as a trend.
#[test]
fn rising_series_scores_momentum_and_trend() {
    let snap = IndicatorEngine::default()
        .compute(&ramp_series("UP", 30, 2_000_000.0))
        .unwrap()
        .into_result()
        .unwrap();
    let ind = &snap.indicators;
    assert!(ind.mom5.unwrap() > 0.0);
    assert!(ind.mom20.unwrap() > 0.0);
    // EMA50 needs 50 bars; the trend score uses what is available
    assert_eq!(ind.ema50, None);
    assert_eq!(ind.vol_z20, Some(0.0));

    let row = CandidateRow::from(&snap);
    let r = compute_radar(
        &[row],
        "GREEN",
        &MacroMultipliers::default(),
        &RadarConfig::default(),
    );
    let debug = &r.candidates_debug[0];
    assert!(debug.s_mom > 50.0);
    assert_eq!(debug.s_breakout, 75.0);
}

/// Scenario A with enough history for EMA50: EMA20 > EMA50.
#[test]
fn rising_series_with_long_history_has_strong_trend() {
    let snap = IndicatorEngine::default()
        .compute(&ramp_series("UP", 60, 2_000_000.0))
        .unwrap()
        .snapshot;
    assert!(snap.indicators.ema20.unwrap() > snap.indicators.ema50.unwrap());
    let r = compute_radar(
        &[CandidateRow::from(&snap)],
        "GREEN",
        &MacroMultipliers::default(),
        &RadarConfig::default(),
    );
    assert!(r.candidates_debug[0].s_mom > 50.0);
    assert!(r.candidates_debug[0].s_trend >= 70.0);
}

/// Scenario B: a row below the liquidity floor vanishes entirely.
#[test]
fn illiquid_row_is_dropped() {
    let rows = raw_rows(json!([
        {"date": "2024-06-28", "symbol": "LIQ", "volume": 2_000_000},
        {"date": "2024-06-28", "symbol": "THIN", "volume": 999_999},
    ]));
    let macros = MacroMultipliers::from_pairs([("YELLOW", 0.9), ("DEFAULT", 1.0)]);
    let r = compute_radar_raw(&rows, "YELLOW", &macros, &RadarConfig::default());
    assert_eq!(r.summary.candidates, 1);
    assert_eq!(r.picks.len(), 1);
    assert_eq!(r.picks[0].symbol, "LIQ");
    assert!(r.candidates_debug.iter().all(|c| c.symbol != "THIN"));
}

/// Scenario C: no candidates at all.
#[test]
fn empty_input_gives_empty_result() {
    let r = compute_radar_raw(&[], "GREEN", &MacroMultipliers::default(), &RadarConfig::default());
    assert_eq!(r.summary.latest, "");
    assert_eq!(r.summary.candidates, 0);
    assert_eq!(r.summary.picked, 0);
    assert!(r.picks.is_empty());
    assert!(r.candidates_debug.is_empty());
    assert_eq!(r.summary.macro_trend, "GREEN");
}

/// Scenario D: five bars. ATR fails loudly, long features are absent, short
/// features are present.
#[test]
fn five_bar_series() {
    let outcome = IndicatorEngine::default()
        .compute(&ramp_series("SHORT", 5, 1_000.0))
        .unwrap();
    assert_eq!(
        outcome.atr_error,
        Some(IndicatorError::InsufficientHistory {
            indicator: "atr_14".into(),
            required: 15,
            available: 5,
        })
    );
    let ind = &outcome.snapshot.indicators;
    assert_eq!(ind.rsi14, None);
    assert_eq!(ind.adx14, None);
    assert_eq!(ind.cci20, None);
    assert_eq!(ind.ema20, None);
    assert_eq!(ind.ema50, None);
    assert_eq!(ind.mom5, None);
    assert_eq!(ind.atr_pct, None);
    assert_eq!(ind.risk_color, None);
    assert_eq!(ind.close, Some(104.0));
    assert_eq!(ind.high, Some(105.0));
    assert_eq!(ind.low, Some(102.5));
    assert_eq!(ind.volume, Some(1_000.0));
}

/// Scenario D, momentum side: 6 bars are enough for mom5.
#[test]
fn six_bar_series_has_short_momentum() {
    let outcome = IndicatorEngine::default()
        .compute(&ramp_series("SHORT", 6, 1_000.0))
        .unwrap();
    let ind = &outcome.snapshot.indicators;
    assert!((ind.mom5.unwrap() - (105.0 / 100.0 - 1.0)).abs() < 1e-12);
    assert_eq!(ind.mom20, None);
    assert!(outcome.atr_error.is_some());
}

/// Scenario E: sector cap of one keeps only the best of three.
#[test]
fn sector_cap_keeps_the_leader() {
    let rows = raw_rows(json!([
        {"date": "2024-06-28", "symbol": "T1", "volume": 3e6, "mom_5d": 0.03, "sector": "Tech"},
        {"date": "2024-06-28", "symbol": "T2", "volume": 3e6, "mom_5d": 0.02, "sector": "Tech"},
        {"date": "2024-06-28", "symbol": "T3", "volume": 3e6, "mom_5d": 0.01, "sector": "Tech"},
    ]));
    let cfg = RadarConfig {
        use_sector_cap: true,
        sector_cap: 1,
        ..Default::default()
    };
    let r = compute_radar_raw(&rows, "GREEN", &MacroMultipliers::default(), &cfg);
    assert_eq!(r.picks.len(), 1);
    assert_eq!(r.picks[0].symbol, "T1");
    assert_eq!(r.candidates_debug.len(), 3);
    assert_eq!(r.summary.picked, 1);
    assert_eq!(r.summary.candidates, 3);
}

/// Default config leaves sector capping off.
#[test]
fn sector_cap_is_off_by_default() {
    let rows = raw_rows(json!([
        {"date": "2024-06-28", "symbol": "T1", "volume": 3e6, "sector": "Tech"},
        {"date": "2024-06-28", "symbol": "T2", "volume": 3e6, "sector": "Tech"},
        {"date": "2024-06-28", "symbol": "T3", "volume": 3e6, "sector": "Tech"},
    ]));
    let r = compute_radar_raw(&rows, "GREEN", &MacroMultipliers::default(), &RadarConfig::default());
    assert_eq!(r.picks.len(), 3);
}

/// The sample rows an upstream indicator job emits, scored end to end.
#[test]
fn upstream_sample_rows() {
    let rows: Vec<RawCandidate> = (0..10)
        .map(|i| {
            serde_json::from_value(json!({
                "date": "2024-06-28",
                "symbol": format!("SYM{i}"),
                "volume": 2_000_000 + i * 100_000,
                "atr_pct": 0.08,
                "mom_5d": 0.02 + 0.001 * i as f64,
                "mom_20d": 0.05 + 0.001 * i as f64,
                "vol_z20": 1.5,
                "rsi_14": 55.0,
                "macd": 0.5,
                "adx14": 22.0,
                "cci20": 100.0,
                "vol_trend": 0.5,
                "close": 100.0 + i as f64,
                "ema20": 98.0 + i as f64,
                "ema50": 95.0 + i as f64,
            }))
            .unwrap()
        })
        .collect();
    let macros = MacroMultipliers::from_pairs([("YELLOW", 0.9), ("DEFAULT", 1.0)]);
    let r = compute_radar_raw(&rows, "YELLOW", &macros, &RadarConfig::default());
    assert_eq!(r.picks.len(), 10);
    // Higher momentum ranks first
    assert_eq!(r.picks[0].symbol, "SYM9");
    assert_eq!(r.picks[9].symbol, "SYM0");
    assert_eq!(r.summary.macro_mult, 0.9);
    let penalty = 0.08 / 0.15 * 10.0;
    for p in &r.picks {
        assert!((p.adj_score - (p.base_score * 0.9 - penalty)).abs() < 1e-9);
    }
}
