//! Live score stimuli and post-match scoring.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const MIN_SCORE: u32 = 0;
pub const MAX_SCORE: u32 = 100;

/// Live score every team starts from when a match carries none.
pub const INITIAL_LIVE_SCORE: u32 = 50;

/// Swing applied to the arguing team.
pub const ARGUMENT_SWING: RangeInclusive<i64> = -2..=5;
/// Chance that an argument costs the opposing team a point.
pub const OPPONENT_PENALTY_CHANCE: f64 = 0.3;
pub const LIKE_BOOST: RangeInclusive<i64> = 1..=2;
/// Range each final sub-score is drawn from.
pub const FINAL_SUBSCORE: RangeInclusive<u32> = 70..=94;

/// Running 0-100 estimate of a team's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScoreEntry {
    pub team_id: String,
    pub score: u32,
}

impl LiveScoreEntry {
    pub fn new(team_id: impl Into<String>, score: u32) -> Self {
        Self {
            team_id: team_id.into(),
            score: score.min(MAX_SCORE),
        }
    }
}

/// Post-match evaluation of one team. The total is always derived from the
/// four sub-scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScore {
    pub team_id: String,
    pub clarity: u32,
    pub evidence: u32,
    pub rebuttal: u32,
    pub logic: u32,
}

impl FinalScore {
    /// Mean of the four sub-scores, rounded down.
    pub fn total(&self) -> u32 {
        (self.clarity + self.evidence + self.rebuttal + self.logic) / 4
    }
}

/// Rules that move the live score and produce the final evaluation.
///
/// Stimuli take the whole collection and return the replacement, so a
/// caller never observes a collection with an entry missing.
pub trait ScoreEngine: Send {
    /// `team_id` just argued; the other teams are its opponents.
    fn argument_stimulus(
        &self,
        scores: &[LiveScoreEntry],
        team_id: &str,
        rng: &mut dyn RngCore,
    ) -> Vec<LiveScoreEntry>;

    fn like_stimulus(
        &self,
        scores: &[LiveScoreEntry],
        team_id: &str,
        rng: &mut dyn RngCore,
    ) -> Vec<LiveScoreEntry>;

    fn final_score(&self, team_id: &str, rng: &mut dyn RngCore) -> FinalScore;
}

/// Uniformly random stimuli and final scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomScoreEngine;

impl ScoreEngine for RandomScoreEngine {
    fn argument_stimulus(
        &self,
        scores: &[LiveScoreEntry],
        team_id: &str,
        rng: &mut dyn RngCore,
    ) -> Vec<LiveScoreEntry> {
        apply_argument_stimulus(scores, team_id, rng)
    }

    fn like_stimulus(
        &self,
        scores: &[LiveScoreEntry],
        team_id: &str,
        rng: &mut dyn RngCore,
    ) -> Vec<LiveScoreEntry> {
        apply_like_stimulus(scores, team_id, rng)
    }

    fn final_score(&self, team_id: &str, rng: &mut dyn RngCore) -> FinalScore {
        compute_final_score(team_id, rng)
    }
}

fn clamp_score(value: i64) -> u32 {
    value.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u32
}

fn shifted(entry: &LiveScoreEntry, delta: i64) -> LiveScoreEntry {
    LiveScoreEntry {
        team_id: entry.team_id.clone(),
        score: clamp_score(entry.score as i64 + delta),
    }
}

/// Momentum from an argument: the arguing team moves by -2..=+5, each
/// opponent loses a point 30% of the time.
pub fn apply_argument_stimulus(
    scores: &[LiveScoreEntry],
    team_id: &str,
    rng: &mut dyn RngCore,
) -> Vec<LiveScoreEntry> {
    scores
        .iter()
        .map(|entry| {
            if entry.team_id == team_id {
                shifted(entry, rng.gen_range(ARGUMENT_SWING))
            } else if rng.gen_bool(OPPONENT_PENALTY_CHANCE) {
                shifted(entry, -1)
            } else {
                entry.clone()
            }
        })
        .collect()
}

/// A spectator like is worth one or two points to the liked team only.
pub fn apply_like_stimulus(
    scores: &[LiveScoreEntry],
    team_id: &str,
    rng: &mut dyn RngCore,
) -> Vec<LiveScoreEntry> {
    scores
        .iter()
        .map(|entry| {
            if entry.team_id == team_id {
                shifted(entry, rng.gen_range(LIKE_BOOST))
            } else {
                entry.clone()
            }
        })
        .collect()
}

pub fn compute_final_score(team_id: &str, rng: &mut dyn RngCore) -> FinalScore {
    FinalScore {
        team_id: team_id.to_string(),
        clarity: rng.gen_range(FINAL_SUBSCORE),
        evidence: rng.gen_range(FINAL_SUBSCORE),
        rebuttal: rng.gen_range(FINAL_SUBSCORE),
        logic: rng.gen_range(FINAL_SUBSCORE),
    }
}
