//! Radar Core: bar domain types, indicators, snapshots and candidate scoring.
//!
//! This crate contains the two pure engines of the daily screener:
//! - the Indicator Computation Engine (`snapshot`), one symbol's bars in, one
//!   feature snapshot out
//! - the Candidate Scoring & Selection Engine (`radar`), a cross-section of
//!   candidates in, a ranked shortlist out
//!
//! plus the seams around them: bar providers, the symbol universe and the
//! regime classifier.

pub mod data;
pub mod domain;
pub mod indicators;
pub mod numeric;
pub mod radar;
pub mod regime;
pub mod snapshot;
