//! Sub-scores, ATR penalty and composite score for one candidate.

use super::candidate::CandidateRow;
use crate::numeric::clamp_score;
use serde::{Deserialize, Serialize};

/// Composite weights; they sum to 1.
pub const W_MOM: f64 = 0.30;
pub const W_VOL: f64 = 0.20;
pub const W_TREND: f64 = 0.25;
pub const W_BREAKOUT: f64 = 0.15;
pub const W_RS: f64 = 0.10;

/// ATR% at which the penalty saturates.
pub const ATR_PENALTY_CAP: f64 = 0.15;
/// Maximum penalty in score points.
pub const ATR_PENALTY_MAX: f64 = 10.0;

const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub s_mom: f64,
    pub s_vol: f64,
    pub s_trend: f64,
    pub s_breakout: f64,
    pub s_rs: f64,
    pub atr_penalty: f64,
    /// Weighted sum of the sub-scores, clamped to [0, 100].
    pub base_score: f64,
    pub macro_mult: f64,
    /// `base_score * macro_mult - atr_penalty`, not clamped.
    pub adj_score: f64,
}

impl ScoreBreakdown {
    pub fn compute(row: &CandidateRow, macro_mult: f64) -> Self {
        let s_mom = momentum_score(row.mom_5d, row.mom_20d);
        let s_vol = volume_score(row.vol_z20, row.vol_trend);
        let s_trend = trend_score(row.ema20, row.ema50, row.adx14);
        let s_breakout = breakout_score(row.close, row.ema20);
        let s_rs = NEUTRAL;
        let atr_penalty = atr_penalty(row.atr_pct);

        let base_score = clamp_score(
            W_MOM * s_mom
                + W_VOL * s_vol
                + W_TREND * s_trend
                + W_BREAKOUT * s_breakout
                + W_RS * s_rs,
        );
        let adj_score = base_score * macro_mult - atr_penalty;

        Self {
            s_mom,
            s_vol,
            s_trend,
            s_breakout,
            s_rs,
            atr_penalty,
            base_score,
            macro_mult,
            adj_score,
        }
    }
}

/// 50 when both momenta are absent, else 50 + 500 * (mom5 + mom20) with an
/// absent term counted as zero.
pub fn momentum_score(mom_5d: Option<f64>, mom_20d: Option<f64>) -> f64 {
    if mom_5d.is_none() && mom_20d.is_none() {
        return NEUTRAL;
    }
    let total = mom_5d.unwrap_or(0.0) + mom_20d.unwrap_or(0.0);
    clamp_score(NEUTRAL + 500.0 * total)
}

/// Volume anomaly, asymmetric in z, then nudged by the volume trend.
pub fn volume_score(vol_z20: Option<f64>, vol_trend: Option<f64>) -> f64 {
    let s = match vol_z20 {
        None => NEUTRAL,
        Some(z) if z >= 0.0 => clamp_score(NEUTRAL + 35.0 * z),
        Some(z) => clamp_score(NEUTRAL + 15.0 * z),
    };
    match vol_trend {
        Some(t) => clamp_score(s + 20.0 * t),
        None => s,
    }
}

pub fn trend_score(ema20: Option<f64>, ema50: Option<f64>, adx14: Option<f64>) -> f64 {
    let mut s = match (ema20, ema50) {
        (Some(fast), Some(slow)) if fast > slow => 70.0,
        (Some(fast), Some(slow)) if fast < slow => 40.0,
        _ => NEUTRAL,
    };
    match adx14 {
        Some(adx) if adx >= 25.0 => s += 10.0,
        Some(adx) if adx >= 15.0 => s += 5.0,
        _ => {}
    }
    clamp_score(s)
}

pub fn breakout_score(close: Option<f64>, ema20: Option<f64>) -> f64 {
    match (close, ema20) {
        (Some(c), Some(e)) if c > e => 75.0,
        (Some(_), Some(_)) => 40.0,
        _ => NEUTRAL,
    }
}

pub fn atr_penalty(atr_pct: Option<f64>) -> f64 {
    match atr_pct {
        Some(atr) if atr > 0.0 => (atr / ATR_PENALTY_CAP).min(1.0) * ATR_PENALTY_MAX,
        _ => 0.0,
    }
}
