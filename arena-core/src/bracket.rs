//! Bracket records: teams, slots and matches.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ArenaError;
use crate::scoring::{FinalScore, LiveScoreEntry};
use crate::transcript::Message;
use crate::Side;

/// Team ids starting with this prefix are opponents not decided yet.
pub const PLACEHOLDER_PREFIX: &str = "tbd";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
    pub side: Side,
}

/// One side of a match: a known team, or an opponent still to be decided.
///
/// Serialized in the flat team shape; an unresolved slot is written as a
/// memberless "TBD" team with a `tbd` id and read back the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Team", into = "Team")]
pub enum TeamSlot {
    Assigned(Team),
    Unresolved { side: Side },
}

impl TeamSlot {
    pub fn side(&self) -> Side {
        match self {
            TeamSlot::Assigned(team) => team.side,
            TeamSlot::Unresolved { side } => *side,
        }
    }

    pub fn team(&self) -> Option<&Team> {
        match self {
            TeamSlot::Assigned(team) => Some(team),
            TeamSlot::Unresolved { .. } => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.team().map(|team| team.id.as_str())
    }

    pub fn display_name(&self) -> &str {
        match self {
            TeamSlot::Assigned(team) => &team.name,
            TeamSlot::Unresolved { .. } => "TBD",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TeamSlot::Assigned(_))
    }
}

impl From<Team> for TeamSlot {
    fn from(team: Team) -> Self {
        if team.id.starts_with(PLACEHOLDER_PREFIX) {
            TeamSlot::Unresolved { side: team.side }
        } else {
            TeamSlot::Assigned(team)
        }
    }
}

impl From<TeamSlot> for Team {
    fn from(slot: TeamSlot) -> Self {
        match slot {
            TeamSlot::Assigned(team) => team,
            TeamSlot::Unresolved { side } => Team {
                id: format!("{}-{}", PLACEHOLDER_PREFIX, side),
                name: "TBD".to_string(),
                members: Vec::new(),
                side,
            },
        }
    }
}

/// Display label for a bracket round.
pub fn round_name(round: u32) -> String {
    match round {
        1 => "Quarter Finals".to_string(),
        2 => "Semi Finals".to_string(),
        3 => "Finals".to_string(),
        n => format!("Round {}", n),
    }
}

/// Where a match stands from the bracket's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Live,
    Completed,
    Upcoming,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Live => write!(f, "Live"),
            MatchStatus::Completed => write!(f, "Completed"),
            MatchStatus::Upcoming => write!(f, "Upcoming"),
        }
    }
}

/// A single bracket bout between an agree team and a disagree team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: u32,
    pub round: u32,
    pub position: u32,
    pub teams: [TeamSlot; 2],
    pub is_live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, rename = "messages")]
    pub transcript: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<[FinalScore; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<u32>,
    #[serde(default)]
    pub live_scores: Vec<LiveScoreEntry>,
}

impl Match {
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams
            .iter()
            .filter_map(TeamSlot::team)
            .find(|team| team.id == team_id)
    }

    pub fn team_on(&self, side: Side) -> Option<&Team> {
        self.teams
            .iter()
            .filter_map(TeamSlot::team)
            .find(|team| team.side == side)
    }

    pub fn final_score(&self, team_id: &str) -> Option<&FinalScore> {
        self.scores
            .as_ref()
            .and_then(|scores| scores.iter().find(|score| score.team_id == team_id))
    }

    pub fn round_name(&self) -> String {
        round_name(self.round)
    }

    pub fn status(&self) -> MatchStatus {
        if self.is_live {
            MatchStatus::Live
        } else if self.winner.is_some() {
            MatchStatus::Completed
        } else {
            MatchStatus::Upcoming
        }
    }

    /// Check the record is consistent enough to load into a simulator.
    pub fn validate(&self) -> Result<(), ArenaError> {
        let invalid = |reason: String| ArenaError::InvalidMatch(format!("match {}: {}", self.id, reason));

        let [first, second] = &self.teams;
        if first.side() == second.side() {
            return Err(invalid(format!(
                "needs one agree and one disagree team, found two {} teams",
                first.side()
            )));
        }
        if let (Some(a), Some(b)) = (first.id(), second.id()) {
            if a == b {
                return Err(invalid(format!("both teams have id {:?}", a)));
            }
        }

        if let Some(winner) = &self.winner {
            if self.team(winner).is_none() {
                return Err(invalid(format!("winner {:?} is not in this match", winner)));
            }
        }

        if let Some([a, b]) = &self.scores {
            if a.team_id == b.team_id || self.team(&a.team_id).is_none() || self.team(&b.team_id).is_none() {
                return Err(invalid("final scores must cover both teams".to_string()));
            }
        }

        if let Some(message) = self.transcript.iter().find(|m| m.id == u64::MAX) {
            return Err(invalid(format!(
                "message id {} leaves no room for new messages",
                message.id
            )));
        }

        if !self.live_scores.is_empty() {
            let covers_both = self.live_scores.len() == 2
                && self.live_scores[0].team_id != self.live_scores[1].team_id
                && self.live_scores.iter().all(|e| self.team(&e.team_id).is_some());
            if !covers_both {
                return Err(invalid("live scores must hold one entry per team".to_string()));
            }
        }

        if self.is_live {
            for slot in &self.teams {
                match slot {
                    TeamSlot::Unresolved { side } => {
                        return Err(invalid(format!("live match has no {} team yet", side)));
                    }
                    TeamSlot::Assigned(team) if team.members.is_empty() => {
                        return Err(invalid(format!("team {:?} has no members", team.id)));
                    }
                    TeamSlot::Assigned(_) => {}
                }
            }
        }

        Ok(())
    }
}

/// Parse a bracket from its JSON form and validate every match in it.
pub fn parse_bracket(json: &str) -> Result<Vec<Match>, ArenaError> {
    let bracket: Vec<Match> = serde_json::from_str(json)?;
    for record in &bracket {
        record.validate()?;
    }
    Ok(bracket)
}
