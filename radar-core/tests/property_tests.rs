//! Property tests for indicator and scoring invariants.
//!
//! Uses proptest to verify:
//! 1. RSI stays within [0, 100]
//! 2. EMA seeds with the SMA and follows its recurrence exactly
//! 3. Snapshots never carry NaN or infinities
//! 4. Base scores stay within [0, 100]
//! 5. Debug output is sorted by adjusted score and excludes illiquid rows
//! 6. Scoring is idempotent

use chrono::NaiveDate;
use proptest::prelude::*;
use radar_core::domain::{Bar, BarSeries};
use radar_core::indicators::{Ema, Indicator, Rsi};
use radar_core::numeric::parse_numeric_str;
use radar_core::radar::{compute_radar, CandidateRow, MacroMultipliers, RadarConfig};
use radar_core::snapshot::IndicatorEngine;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_closes(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..500.0_f64, min..max)
}

fn bars_from(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: volumes.get(i).copied().unwrap_or(1_000_000.0),
            }
        })
        .collect()
}

fn arb_opt(range: std::ops::Range<f64>) -> impl Strategy<Value = Option<f64>> {
    prop::option::of(range)
}

prop_compose! {
    fn arb_row(date: NaiveDate)(
        idx in 0..1000u32,
        volume in arb_opt(0.0..5e6),
        atr_pct in arb_opt(0.0..0.4),
        mom_5d in arb_opt(-0.5..0.5),
        mom_20d in arb_opt(-0.5..0.5),
        vol_z20 in arb_opt(-5.0..5.0),
        adx14 in arb_opt(0.0..100.0),
        vol_trend in arb_opt(-1.0..3.0),
        close in arb_opt(1.0..500.0),
        ema20 in arb_opt(1.0..500.0),
        ema50 in arb_opt(1.0..500.0),
    ) -> CandidateRow {
        CandidateRow {
            date,
            symbol: format!("S{idx}"),
            volume,
            atr_pct,
            mom_5d,
            mom_20d,
            vol_z20,
            adx14,
            vol_trend,
            close,
            ema20,
            ema50,
            ..Default::default()
        }
    }
}

fn arb_rows() -> impl Strategy<Value = Vec<CandidateRow>> {
    let date = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
    prop::collection::vec(arb_row(date), 0..40)
}

// ── 1–3. Indicators ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes(15, 120)) {
        let bars = bars_from(&closes, &[]);
        for v in Rsi::new(14).compute(&bars).into_iter().filter(|v| !v.is_nan()) {
            prop_assert!((0.0..=100.0).contains(&v), "RSI out of range: {}", v);
        }
    }

    #[test]
    fn ema_seed_and_recurrence(closes in arb_closes(21, 80)) {
        let bars = bars_from(&closes, &[]);
        let ema = Ema::new(20).compute(&bars);
        let sma: f64 = closes[..20].iter().sum::<f64>() / 20.0;
        prop_assert!((ema[19] - sma).abs() < 1e-9);
        let alpha = 2.0 / 21.0;
        for i in 20..closes.len() {
            let expected = closes[i] * alpha + ema[i - 1] * (1.0 - alpha);
            prop_assert!((ema[i] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn snapshots_are_finite(
        closes in arb_closes(1, 90),
        volumes in prop::collection::vec(0.0..5e6_f64, 90),
    ) {
        let series = BarSeries::new("P", bars_from(&closes, &volumes)).unwrap();
        let outcome = IndicatorEngine::default().compute(&series).unwrap();
        prop_assert!(outcome.snapshot.indicators.is_all_finite());
        prop_assert_eq!(outcome.atr_error.is_some(), closes.len() < 15);
    }
}

// ── 4–6. Scoring ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn base_score_is_bounded(
        rows in arb_rows(),
        regime in prop::sample::select(vec!["GREEN", "YELLOW", "RED", ""]),
    ) {
        let cfg = RadarConfig { liq_min: 0.0, ..Default::default() };
        let r = compute_radar(&rows, regime, &MacroMultipliers::default(), &cfg);
        for c in &r.candidates_debug {
            prop_assert!((0.0..=100.0).contains(&c.base_score));
            for s in [c.s_mom, c.s_vol, c.s_trend, c.s_breakout, c.s_rs] {
                prop_assert!((0.0..=100.0).contains(&s));
            }
            prop_assert!((0.0..=10.0).contains(&c.atr_penalty));
        }
    }

    #[test]
    fn debug_is_sorted_and_liquid(rows in arb_rows(), liq_min in 0.0..5e6_f64) {
        let cfg = RadarConfig { liq_min, ..Default::default() };
        let r = compute_radar(&rows, "GREEN", &MacroMultipliers::default(), &cfg);
        for pair in r.candidates_debug.windows(2) {
            prop_assert!(pair[0].adj_score >= pair[1].adj_score);
        }
        for c in &r.candidates_debug {
            prop_assert!(c.volume >= liq_min);
        }
        for p in &r.picks {
            prop_assert!(p.volume >= liq_min);
        }
        prop_assert_eq!(r.summary.candidates, r.candidates_debug.len());
        prop_assert_eq!(r.summary.picked, r.picks.len());
    }

    #[test]
    fn scoring_is_idempotent(rows in arb_rows()) {
        let cfg = RadarConfig { liq_min: 0.0, use_sector_cap: true, sector_cap: 1 };
        let macros = MacroMultipliers::default();
        let a = compute_radar(&rows, "RED", &macros, &cfg);
        let b = compute_radar(&rows, "RED", &macros, &cfg);
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn percent_strings_match_fractions(x in 0.0..100.0_f64) {
        let pct = parse_numeric_str(&format!("{x}%")).unwrap();
        let comma = parse_numeric_str(&format!("{x}%").replace('.', ",")).unwrap();
        prop_assert!((pct - x / 100.0).abs() < 1e-12);
        prop_assert!((comma - pct).abs() < 1e-12);
    }
}
