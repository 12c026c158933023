//! Ranking and sector-capped selection.

use super::candidate::CandidateRow;
use super::score::ScoreBreakdown;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A row that passed the liquidity filter, with its scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub row: CandidateRow,
    /// Volume after defaulting a missing value to 0.
    pub volume: f64,
    pub score: ScoreBreakdown,
}

/// Adjusted score descending, then symbol ascending.
pub fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .adj_score
        .total_cmp(&a.score.adj_score)
        .then_with(|| a.row.symbol.cmp(&b.row.symbol))
}

pub fn rank(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(rank_order);
}

/// Walk a ranked list and keep at most `cap` rows per sector.
///
/// Rows without a sector are never capped. Order is preserved.
pub fn apply_sector_cap(ranked: &[ScoredCandidate], cap: usize) -> Vec<&ScoredCandidate> {
    let mut taken: HashMap<&str, usize> = HashMap::new();
    let mut picked = Vec::with_capacity(ranked.len());
    for candidate in ranked {
        if let Some(sector) = candidate.row.sector.as_deref() {
            let count = taken.entry(sector).or_insert(0);
            if *count >= cap {
                continue;
            }
            *count += 1;
        }
        picked.push(candidate);
    }
    picked
}
