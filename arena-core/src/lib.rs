//! Live-debate simulation core for the debate arena bracket.
//!
//! A [`simulator::DebateSimulator`] owns one bracket [`bracket::Match`] while it
//! is live: it emits arguments, moderator remarks and spectator chatter on a
//! virtual clock, keeps the live score per team, and resolves a final scored
//! outcome when the match clock runs out. [`live::LiveDebate`] drives the same
//! state machine on real time from a tokio task.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod bracket;
pub mod clock;
pub mod config;
pub mod demo;
pub mod error;
pub mod live;
pub mod scoring;
pub mod simulator;
pub mod templates;
pub mod transcript;
pub mod verdict;

pub use bracket::{Match, MatchStatus, Member, Team, TeamSlot};
pub use clock::DebateClock;
pub use config::{ConfigError, SimulationConfig};
pub use error::ArenaError;
pub use live::LiveDebate;
pub use scoring::{FinalScore, LiveScoreEntry, RandomScoreEngine, ScoreEngine};
pub use simulator::{DebateSimulator, MatchSnapshot, Phase};
pub use templates::{ArgumentGenerator, TemplateGenerator};
pub use transcript::{Message, Transcript};

/// The stance a team defends in a debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Agree,
    Disagree,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Agree => write!(f, "agree"),
            Side::Disagree => write!(f, "disagree"),
        }
    }
}

/// Who a transcript entry speaks for. Debaters carry their stance; the
/// audience and the moderator are roles, not stances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agree,
    Disagree,
    Spectator,
    Ai,
}

impl From<Side> for Role {
    fn from(side: Side) -> Self {
        match side {
            Side::Agree => Role::Agree,
            Side::Disagree => Role::Disagree,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Agree => write!(f, "agree"),
            Role::Disagree => write!(f, "disagree"),
            Role::Spectator => write!(f, "spectator"),
            Role::Ai => write!(f, "ai"),
        }
    }
}

/// Spectator "likes" per team for the match currently on screen.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeTally {
    counts: BTreeMap<String, u32>,
}

impl LikeTally {
    /// Start every listed team at zero.
    pub fn for_teams<'a>(team_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            counts: team_ids.into_iter().map(|id| (id.to_string(), 0)).collect(),
        }
    }

    /// Count one like. Returns `false` for a team the tally does not track.
    pub fn record(&mut self, team_id: &str) -> bool {
        match self.counts.get_mut(team_id) {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn count(&self, team_id: &str) -> u32 {
        self.counts.get(team_id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn describe(&self) -> String {
        self.counts
            .iter()
            .map(|(id, count)| format!("{}: {}", id, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_and_role_display_lowercase() {
        assert_eq!(Side::Agree.to_string(), "agree");
        assert_eq!(Side::Disagree.to_string(), "disagree");
        assert_eq!(Role::Spectator.to_string(), "spectator");
        assert_eq!(Role::Ai.to_string(), "ai");
        assert_eq!(Role::from(Side::Disagree), Role::Disagree);
    }

    #[test]
    fn tally_counts_known_teams_only() {
        let mut tally = LikeTally::for_teams(["t1", "t2"]);
        assert!(tally.record("t1"));
        assert!(tally.record("t1"));
        assert!(tally.record("t2"));
        assert!(!tally.record("t9"));

        assert_eq!(tally.count("t1"), 2);
        assert_eq!(tally.count("t2"), 1);
        assert_eq!(tally.count("t9"), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.describe(), "t1: 2, t2: 1");
    }

    #[test]
    fn tally_serializes_as_plain_map() {
        let mut tally = LikeTally::for_teams(["t1", "t2"]);
        tally.record("t2");
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"t1":0,"t2":1}"#);
    }
}
