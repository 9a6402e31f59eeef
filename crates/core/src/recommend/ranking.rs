//! Deterministic ordering and truncation of scored candidates

use std::cmp::Ordering;

use super::scoring::ScoreCalculator;
use super::types::{Candidate, Mode, Recommendation, ScoredProduct};
use crate::domain::preferences::Preferences;

/// Rank candidates with the default weights.
pub fn rank(candidates: &[Candidate<'_>], preferences: &Preferences, mode: Mode) -> Recommendation {
    rank_with(&ScoreCalculator::new(), candidates, preferences, mode)
}

/// Score, sort and truncate candidates.
///
/// Higher scores come first; equal scores keep catalog order, so the result is
/// identical on every run for the same inputs.
pub fn rank_with(
    calculator: &ScoreCalculator,
    candidates: &[Candidate<'_>],
    preferences: &Preferences,
    mode: Mode,
) -> Recommendation {
    let mut scored: Vec<(u32, Candidate<'_>)> = candidates
        .iter()
        .map(|candidate| (calculator.score(candidate.product, preferences), *candidate))
        .collect();

    scored.sort_by(|(left_score, left), (right_score, right)| {
        compare(*left_score, left.position, *right_score, right.position)
    });

    let into_scored = |(score, candidate): (u32, Candidate<'_>)| ScoredProduct {
        product: candidate.product.clone(),
        score,
    };

    match mode {
        Mode::Single => scored
            .into_iter()
            .next()
            .map(into_scored)
            .map_or(Recommendation::NoMatch, Recommendation::Best),
        Mode::Multiple { limit } => {
            Recommendation::Ranked(scored.into_iter().take(limit).map(into_scored).collect())
        }
    }
}

fn compare(left_score: u32, left_position: usize, right_score: u32, right_position: usize) -> Ordering {
    right_score.cmp(&left_score).then(left_position.cmp(&right_position))
}
