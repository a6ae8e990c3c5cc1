//! The live-debate state machine.
//!
//! A [`DebateSimulator`] owns one [`Match`] for as long as it is live. Time is
//! virtual: callers move it forward with [`DebateSimulator::advance`] and the
//! simulator runs whatever became due in between (clock ticks, activity
//! ticks, delayed moderator remarks, resolution stages) in time order. The
//! live driver in [`crate::live`] maps this onto tokio time; tests drive it
//! directly.
//!
//! Lifecycle: `Idle -> Live -> Resolving -> Completed`, or `Idle -> Completed`
//! for a match that was not live when loaded.

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::bracket::{Match, Team, TeamSlot};
use crate::clock::{DebateClock, Tick};
use crate::config::SimulationConfig;
use crate::error::ArenaError;
use crate::scoring::{
    FinalScore, LiveScoreEntry, RandomScoreEngine, ScoreEngine, INITIAL_LIVE_SCORE,
};
use crate::templates::{self, ArgumentGenerator, TemplateGenerator};
use crate::transcript::{Message, Transcript, MODERATOR_ID, MODERATOR_NAME, VIEWER_ID, VIEWER_NAME};
use crate::verdict::determine_winner;
use crate::{LikeTally, Role, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Loaded, not started.
    Idle,
    Live,
    /// Clock ran out; final analysis and verdict are scheduled.
    Resolving,
    Completed,
}

/// Immutable view of a match for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub match_id: u32,
    pub round: u32,
    pub round_name: String,
    pub phase: Phase,
    pub transcript: Vec<Message>,
    pub live_scores: Vec<LiveScoreEntry>,
    pub time_remaining: u32,
    /// Remaining time as `M:SS`.
    pub clock: String,
    pub likes: LikeTally,
    pub spectators: u32,
    pub final_scores: Option<[FinalScore; 2]>,
    pub winner: Option<String>,
    pub finished: bool,
}

/// Work scheduled for a later virtual instant.
#[derive(Debug, Clone)]
enum Deferred {
    ModeratorReaction { side: Side, argument: String },
    FinalAnalysis,
    Verdict,
}

/// The two debating teams of a live match.
struct Lineup {
    agree: Team,
    disagree: Team,
}

impl Lineup {
    fn from_match(record: &Match) -> Option<Self> {
        Some(Self {
            agree: record.team_on(Side::Agree)?.clone(),
            disagree: record.team_on(Side::Disagree)?.clone(),
        })
    }

    fn team(&self, side: Side) -> &Team {
        match side {
            Side::Agree => &self.agree,
            Side::Disagree => &self.disagree,
        }
    }
}

pub struct DebateSimulator {
    record: Match,
    topic: String,
    config: SimulationConfig,
    phase: Phase,
    lineup: Option<Lineup>,
    clock: DebateClock,
    transcript: Transcript,
    live_scores: Vec<LiveScoreEntry>,
    likes: LikeTally,
    spectators: u32,
    generator: Box<dyn ArgumentGenerator>,
    engine: Box<dyn ScoreEngine>,
    rng: Box<dyn RngCore + Send>,
    started_at: DateTime<Local>,
    now: Duration,
    next_clock_tick: Duration,
    next_activity_tick: Duration,
    deferred: BTreeMap<(Duration, u64), Deferred>,
    deferred_seq: u64,
}

impl DebateSimulator {
    /// Load a match. Fails if the record cannot be simulated.
    pub fn new(
        record: Match,
        topic: impl Into<String>,
        config: SimulationConfig,
    ) -> Result<Self, ArenaError> {
        config.validate()?;
        record.validate()?;

        let lineup = Lineup::from_match(&record);
        if record.is_live && lineup.is_none() {
            return Err(ArenaError::InvalidMatch(format!(
                "match {} is live without both teams",
                record.id
            )));
        }

        let clock = DebateClock::new(record.time_remaining.unwrap_or(config.match_seconds));
        let team_ids: Vec<&str> = record.teams.iter().filter_map(TeamSlot::id).collect();
        let likes = LikeTally::for_teams(team_ids.iter().copied());
        let live_scores = if record.live_scores.is_empty() {
            team_ids
                .iter()
                .map(|id| LiveScoreEntry::new(*id, INITIAL_LIVE_SCORE))
                .collect()
        } else {
            record.live_scores.clone()
        };
        let transcript = Transcript::from_messages(record.transcript.clone());

        let mut rng: Box<dyn RngCore + Send> = Box::new(StdRng::from_entropy());
        let spectators = rng.gen_range(50..150);

        Ok(Self {
            record,
            topic: topic.into(),
            config,
            phase: Phase::Idle,
            lineup,
            clock,
            transcript,
            live_scores,
            likes,
            spectators,
            generator: Box::new(TemplateGenerator),
            engine: Box::new(RandomScoreEngine),
            rng,
            started_at: Local::now(),
            now: Duration::ZERO,
            next_clock_tick: Duration::ZERO,
            next_activity_tick: Duration::ZERO,
            deferred: BTreeMap::new(),
            deferred_seq: 0,
        })
    }

    pub fn with_generator(mut self, generator: impl ArgumentGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_engine(mut self, engine: impl ScoreEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Replace the random source, e.g. with a seeded `StdRng` for a
    /// reproducible run.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Wall-clock time message timestamps are measured from.
    pub fn with_start_time(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Leave `Idle`: a live match starts ticking, anything else is
    /// historical and goes straight to `Completed`.
    pub fn start(&mut self) -> Phase {
        if self.phase != Phase::Idle {
            return self.phase;
        }
        if self.record.is_live {
            self.phase = Phase::Live;
            self.next_clock_tick = self.now + self.config.clock_period();
            self.next_activity_tick = self.now + self.config.activity_period();
            info!(
                match_id = self.record.id,
                remaining = self.clock.remaining(),
                "debate is live"
            );
        } else {
            self.phase = Phase::Completed;
            debug!(match_id = self.record.id, "match is not live, nothing to simulate");
        }
        self.phase
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &DebateClock {
        &self.clock
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn live_scores(&self) -> &[LiveScoreEntry] {
        &self.live_scores
    }

    pub fn likes(&self) -> &LikeTally {
        &self.likes
    }

    pub fn record(&self) -> &Match {
        &self.record
    }

    /// Next virtual instant with work to do, if any.
    pub fn next_due(&self) -> Option<Duration> {
        let deferred = self.deferred.keys().next().map(|(due, _)| *due);
        let recurring = (self.phase == Phase::Live)
            .then(|| self.next_clock_tick.min(self.next_activity_tick));
        match (deferred, recurring) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.advance_to(self.now + dt);
    }

    /// Run everything due up to and including `target`.
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(due) = self.next_due() {
            if due > target {
                break;
            }
            self.now = self.now.max(due);
            self.run_next();
        }
        self.now = self.now.max(target);
    }

    /// Apply any resolution stages still pending, immediately and in order.
    /// A no-op unless the match is `Resolving`.
    pub fn finish_resolution(&mut self) {
        while self.phase == Phase::Resolving {
            let Some(((due, _), action)) = self.deferred.pop_first() else {
                break;
            };
            self.now = self.now.max(due);
            self.run_deferred(action);
        }
    }

    /// Viewers can act until the verdict is in; the match is still live
    /// while it resolves.
    fn accepts_viewer_actions(&self) -> bool {
        matches!(self.phase, Phase::Live | Phase::Resolving)
    }

    /// Post a comment from the local viewer. Blank text and matches that are
    /// not live are ignored; returns whether the comment was posted.
    pub fn submit_spectator_comment(&mut self, text: &str) -> bool {
        if !self.accepts_viewer_actions() {
            warn!(match_id = self.record.id, "comment ignored, match is not live");
            return false;
        }
        if text.trim().is_empty() {
            return false;
        }
        self.append(VIEWER_ID, VIEWER_NAME, text, Role::Spectator);
        true
    }

    /// Like a team from the local viewer. Returns whether it counted.
    pub fn like_team(&mut self, team_id: &str) -> bool {
        if !self.accepts_viewer_actions() {
            warn!(match_id = self.record.id, team_id, "like ignored, match is not live");
            return false;
        }
        if !self.register_like(team_id) {
            warn!(match_id = self.record.id, team_id, "like ignored, unknown team");
            return false;
        }
        true
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            match_id: self.record.id,
            round: self.record.round,
            round_name: self.record.round_name(),
            phase: self.phase,
            transcript: self.transcript.messages().to_vec(),
            live_scores: self.live_scores.clone(),
            time_remaining: self.clock.remaining(),
            clock: self.clock.format(),
            likes: self.likes.clone(),
            spectators: self.spectators,
            final_scores: self.record.scores.clone(),
            winner: self.record.winner.clone(),
            finished: self.phase == Phase::Completed,
        }
    }

    /// Hand the match back to the bracket with everything that happened.
    pub fn into_match(self) -> Match {
        let mut record = self.record;
        record.transcript = self.transcript.into_messages();
        record.live_scores = self.live_scores;
        record.time_remaining = Some(self.clock.remaining());
        record
    }

    /// Run exactly one due item. Deferred work first, then the clock, then
    /// the activity tick.
    fn run_next(&mut self) {
        if let Some(entry) = self.deferred.first_entry() {
            if entry.key().0 <= self.now {
                let action = entry.remove();
                self.run_deferred(action);
                return;
            }
        }
        if self.phase != Phase::Live {
            return;
        }
        if self.next_clock_tick <= self.now {
            self.next_clock_tick += self.config.clock_period();
            self.on_clock_tick();
        } else if self.next_activity_tick <= self.now {
            self.next_activity_tick += self.config.activity_period();
            self.on_activity_tick();
        }
    }

    fn schedule(&mut self, delay: Duration, action: Deferred) {
        self.deferred_seq += 1;
        self.deferred
            .insert((self.now + delay, self.deferred_seq), action);
    }

    fn on_clock_tick(&mut self) {
        match self.clock.tick() {
            Tick::Running => trace!(remaining = self.clock.remaining(), "clock tick"),
            Tick::Expired => self.begin_resolution(),
            Tick::Stopped => {}
        }
    }

    fn on_activity_tick(&mut self) {
        trace!(elapsed = ?self.now, "activity tick");
        if self.rng.gen_bool(self.config.argument_chance) {
            self.debater_speaks();
        }
        if self.rng.gen_bool(self.config.spectator_comment_chance) {
            let (author_id, author_name) = templates::spectator_identity(&mut *self.rng);
            let body = self.generator.spectator_comment(&mut *self.rng);
            self.append(&author_id, &author_name, &body, Role::Spectator);
        }
        if self.rng.gen_bool(self.config.audience_drift_chance) {
            let drift: i64 = self.rng.gen_range(-2..=2);
            self.spectators = (self.spectators as i64 + drift).max(0) as u32;
        }
        if self.rng.gen_bool(self.config.like_chance) {
            let side = if self.rng.gen_bool(0.5) { Side::Agree } else { Side::Disagree };
            if let Some(team_id) = self.lineup.as_ref().map(|l| l.team(side).id.clone()) {
                self.register_like(&team_id);
            }
        }
    }

    fn debater_speaks(&mut self) {
        let side = if self.rng.gen_bool(0.5) { Side::Agree } else { Side::Disagree };
        let Some(team) = self.lineup.as_ref().map(|l| l.team(side)) else {
            return;
        };
        let team_id = team.id.clone();
        let member = &team.members[self.rng.gen_range(0..team.members.len())];
        let (author_id, author_name) = (member.id.clone(), member.name.clone());

        let argument = self.generator.argument(side, &self.topic, &mut *self.rng);
        self.append(&author_id, &author_name, &argument, side.into());
        self.live_scores = self
            .engine
            .argument_stimulus(&self.live_scores, &team_id, &mut *self.rng);
        debug!(team_id = %team_id, scores = ?self.live_scores, "argument stimulus");

        if self.rng.gen_bool(self.config.moderator_chance) {
            let delay = self.config.moderator_delay();
            self.schedule(delay, Deferred::ModeratorReaction { side, argument });
        }
    }

    fn register_like(&mut self, team_id: &str) -> bool {
        if !self.likes.record(team_id) {
            return false;
        }
        self.live_scores = self
            .engine
            .like_stimulus(&self.live_scores, team_id, &mut *self.rng);
        debug!(team_id, likes = self.likes.count(team_id), "like stimulus");
        true
    }

    fn begin_resolution(&mut self) {
        self.phase = Phase::Resolving;
        info!(match_id = self.record.id, "debate clock expired, resolving");
        self.append(MODERATOR_ID, MODERATOR_NAME, templates::ENDED_NOTICE, Role::Ai);
        let delay = self.config.analysis_delay();
        self.schedule(delay, Deferred::FinalAnalysis);
    }

    fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::ModeratorReaction { side, argument } => {
                if self.phase != Phase::Live {
                    debug!("dropping moderator remark, debate already over");
                    return;
                }
                let remark = self
                    .generator
                    .moderator_comment(side, &argument, &mut *self.rng);
                self.append(MODERATOR_ID, MODERATOR_NAME, &remark, Role::Ai);
            }
            Deferred::FinalAnalysis => {
                self.append(MODERATOR_ID, MODERATOR_NAME, templates::FINAL_ANALYSIS, Role::Ai);
                let delay = self.config.verdict_delay();
                self.schedule(delay, Deferred::Verdict);
            }
            Deferred::Verdict => self.conclude(),
        }
    }

    fn conclude(&mut self) {
        let Some(lineup) = self.lineup.as_ref() else {
            return;
        };
        let scores = [
            self.engine.final_score(&lineup.agree.id, &mut *self.rng),
            self.engine.final_score(&lineup.disagree.id, &mut *self.rng),
        ];
        let winner_id = determine_winner(&scores, self.record.round, &mut *self.rng).to_string();
        let (winner_name, winner_side) = match self.record.team(&winner_id) {
            Some(team) => (team.name.clone(), team.side),
            None => return,
        };

        self.record.scores = Some(scores);
        self.record.winner = Some(winner_id.clone());
        self.record.is_live = false;

        let announcement =
            templates::results_announcement(&winner_name, winner_side, self.record.round);
        self.append(MODERATOR_ID, MODERATOR_NAME, &announcement, Role::Ai);
        self.phase = Phase::Completed;
        info!(
            match_id = self.record.id,
            winner = %winner_id,
            "debate resolved"
        );
    }

    fn append(&mut self, author_id: &str, author_name: &str, body: &str, role: Role) -> u64 {
        let timestamp = self.timestamp();
        let id = self
            .transcript
            .push(author_id, author_name, body, timestamp, role);
        debug!(match_id = self.record.id, id, %role, author = author_name, "message");
        id
    }

    fn timestamp(&self) -> String {
        let offset = chrono::Duration::from_std(self.now).unwrap_or_else(|_| chrono::Duration::zero());
        (self.started_at + offset).format("%I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::Member;
    use crate::scoring::MAX_SCORE;

    fn team(id: &str, side: Side) -> Team {
        Team {
            id: id.to_string(),
            name: format!("Team {}", id),
            members: vec![
                Member {
                    id: format!("{}-a", id),
                    name: "Alex Chen".to_string(),
                    avatar: None,
                },
                Member {
                    id: format!("{}-b", id),
                    name: "Jordan Lee".to_string(),
                    avatar: None,
                },
            ],
            side,
        }
    }

    fn live_match(seconds: u32, round: u32) -> Match {
        Match {
            id: 1,
            round,
            position: 1,
            teams: [
                TeamSlot::Assigned(team("t1", Side::Agree)),
                TeamSlot::Assigned(team("t2", Side::Disagree)),
            ],
            is_live: true,
            winner: None,
            transcript: Vec::new(),
            scores: None,
            time_remaining: Some(seconds),
            live_scores: Vec::new(),
        }
    }

    fn simulator(record: Match, config: SimulationConfig, seed: u64) -> DebateSimulator {
        let mut sim = DebateSimulator::new(record, "AI rights", config)
            .unwrap()
            .with_rng(StdRng::seed_from_u64(seed));
        sim.start();
        sim
    }

    /// Every probabilistic branch fires on every tick.
    fn busy_config() -> SimulationConfig {
        SimulationConfig {
            argument_chance: 1.0,
            moderator_chance: 1.0,
            spectator_comment_chance: 1.0,
            audience_drift_chance: 1.0,
            like_chance: 1.0,
            ..SimulationConfig::default()
        }
    }

    /// Nothing probabilistic ever fires.
    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            argument_chance: 0.0,
            moderator_chance: 0.0,
            spectator_comment_chance: 0.0,
            audience_drift_chance: 0.0,
            like_chance: 0.0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn starts_live_with_default_scores() {
        let sim = simulator(live_match(600, 2), quiet_config(), 1);
        assert_eq!(sim.phase(), Phase::Live);
        assert_eq!(sim.live_scores().len(), 2);
        assert!(sim.live_scores().iter().all(|e| e.score == INITIAL_LIVE_SCORE));
        assert_eq!(sim.likes().total(), 0);
    }

    #[test]
    fn historical_match_goes_straight_to_completed() {
        let mut record = live_match(600, 1);
        record.is_live = false;
        let mut sim = simulator(record, busy_config(), 1);
        assert_eq!(sim.phase(), Phase::Completed);
        assert_eq!(sim.next_due(), None);
        sim.advance(Duration::from_secs(60));
        assert!(sim.transcript().is_empty());
    }

    #[test]
    fn invalid_match_fails_construction() {
        let mut record = live_match(600, 1);
        record.teams[1] = TeamSlot::Assigned(team("t2", Side::Agree));
        let result = DebateSimulator::new(record, "topic", SimulationConfig::default());
        assert!(matches!(result, Err(ArenaError::InvalidMatch(_))));
    }

    #[test]
    fn clock_counts_down_once_per_second() {
        let mut sim = simulator(live_match(600, 2), quiet_config(), 1);
        sim.advance(Duration::from_secs(10));
        assert_eq!(sim.clock().remaining(), 590);
        assert_eq!(sim.clock().format(), "9:50");
        sim.advance(Duration::from_millis(999));
        assert_eq!(sim.clock().remaining(), 590);
        sim.advance(Duration::from_millis(1));
        assert_eq!(sim.clock().remaining(), 589);
    }

    #[test]
    fn busy_tick_fires_every_effect() {
        let mut sim = simulator(live_match(600, 2), busy_config(), 3);
        sim.advance(Duration::from_secs(3));

        let roles: Vec<Role> = sim.transcript().messages().iter().map(|m| m.role).collect();
        assert_eq!(roles.len(), 2, "argument then spectator comment");
        assert!(matches!(roles[0], Role::Agree | Role::Disagree));
        assert_eq!(roles[1], Role::Spectator);
        assert_eq!(sim.likes().total(), 1);

        // The moderator reacts 1.5s after the argument.
        sim.advance(Duration::from_millis(1500));
        let last = sim.transcript().last().unwrap();
        assert_eq!(last.role, Role::Ai);
        assert_eq!(last.author_id, MODERATOR_ID);
    }

    #[test]
    fn debater_messages_come_from_their_team() {
        let mut sim = simulator(live_match(600, 2), busy_config(), 8);
        sim.advance(Duration::from_secs(300));
        let record = sim.into_match();
        for message in record.transcript.iter() {
            match message.role {
                Role::Agree => assert!(message.author_id.starts_with("t1-")),
                Role::Disagree => assert!(message.author_id.starts_with("t2-")),
                _ => {}
            }
        }
    }

    #[test]
    fn live_scores_stay_in_bounds_under_heavy_stimulus() {
        let mut sim = simulator(live_match(600, 2), busy_config(), 21);
        for _ in 0..590 {
            sim.advance(Duration::from_secs(1));
            assert_eq!(sim.live_scores().len(), 2);
            assert!(sim.live_scores().iter().all(|e| e.score <= MAX_SCORE));
        }
    }

    #[test]
    fn transcript_ids_strictly_increase_across_sources() {
        let mut sim = simulator(live_match(600, 2), busy_config(), 5);
        for i in 0..40 {
            sim.advance(Duration::from_millis(700));
            sim.submit_spectator_comment(&format!("comment {}", i));
        }
        let ids: Vec<u64> = sim.transcript().messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn blank_comments_are_ignored() {
        let mut sim = simulator(live_match(600, 2), quiet_config(), 1);
        assert!(!sim.submit_spectator_comment(""));
        assert!(!sim.submit_spectator_comment("   "));
        assert!(sim.transcript().is_empty());

        assert!(sim.submit_spectator_comment("hello"));
        assert_eq!(sim.transcript().len(), 1);
        let message = sim.transcript().last().unwrap();
        assert_eq!(message.role, Role::Spectator);
        assert_eq!(message.body, "hello");
        assert_eq!(message.author_name, VIEWER_NAME);
    }

    #[test]
    fn like_counts_and_nudges_score() {
        let mut sim = simulator(live_match(600, 2), quiet_config(), 1);
        assert!(sim.like_team("t1"));
        assert_eq!(sim.likes().count("t1"), 1);
        let t1 = sim.live_scores().iter().find(|e| e.team_id == "t1").unwrap();
        assert!((51..=52).contains(&t1.score));
        let t2 = sim.live_scores().iter().find(|e| e.team_id == "t2").unwrap();
        assert_eq!(t2.score, INITIAL_LIVE_SCORE);

        assert!(!sim.like_team("t9"));
        assert_eq!(sim.likes().total(), 1);
    }

    #[test]
    fn resolution_runs_in_stages() {
        let mut sim = simulator(live_match(2, 2), quiet_config(), 9);
        sim.advance(Duration::from_secs(2));
        assert_eq!(sim.phase(), Phase::Resolving);
        assert!(sim.record().is_live);
        assert_eq!(sim.transcript().last().unwrap().body, templates::ENDED_NOTICE);

        // Viewers can still act while the verdict is pending.
        assert!(sim.like_team("t1"));
        assert!(sim.submit_spectator_comment("close one"));

        sim.advance(Duration::from_secs(2));
        assert_eq!(sim.transcript().last().unwrap().body, templates::FINAL_ANALYSIS);
        assert_eq!(sim.phase(), Phase::Resolving);

        sim.advance(Duration::from_millis(4999));
        assert_eq!(sim.phase(), Phase::Resolving);
        sim.advance(Duration::from_millis(1));
        assert_eq!(sim.phase(), Phase::Completed);
        assert!(!sim.record().is_live);
        assert_eq!(sim.next_due(), None);
        assert!(!sim.like_team("t1"));
        assert!(!sim.submit_spectator_comment("too late"));
    }

    #[test]
    fn finish_resolution_applies_remaining_stages() {
        let mut sim = simulator(live_match(1, 3), quiet_config(), 4);
        sim.advance(Duration::from_secs(1));
        assert_eq!(sim.phase(), Phase::Resolving);

        sim.finish_resolution();
        assert_eq!(sim.phase(), Phase::Completed);
        let bodies: Vec<&str> = sim
            .transcript()
            .messages()
            .iter()
            .map(|m| m.body.as_str())
            .collect();
        assert_eq!(bodies[0], templates::ENDED_NOTICE);
        assert_eq!(bodies[1], templates::FINAL_ANALYSIS);
        assert!(bodies[2].starts_with("RESULTS:"));
        assert!(bodies[2].contains("tournament champions"));
    }

    #[test]
    fn finish_resolution_is_noop_while_live() {
        let mut sim = simulator(live_match(600, 2), quiet_config(), 4);
        sim.finish_resolution();
        assert_eq!(sim.phase(), Phase::Live);
        assert!(sim.transcript().is_empty());
    }

    #[test]
    fn pending_moderator_remark_is_dropped_after_resolution() {
        let config = SimulationConfig {
            moderator_delay_ms: 10_000,
            ..busy_config()
        };
        // Argued at 3s, remark due at 13s, verdict lands at 11s.
        let mut sim = simulator(live_match(4, 2), config, 12);
        sim.advance(Duration::from_secs(60));
        assert_eq!(sim.phase(), Phase::Completed);
        let last = sim.transcript().last().unwrap();
        assert!(last.body.starts_with("RESULTS:"));
    }

    #[test]
    fn final_round_winner_has_higher_total() {
        for seed in 0..30 {
            let mut sim = simulator(live_match(1, 3), SimulationConfig::instant(), seed);
            sim.advance(Duration::from_secs(1));
            let record = sim.into_match();
            let [a, b] = record.scores.clone().unwrap();
            let winner = record.winner.clone().unwrap();
            if a.total() > b.total() {
                assert_eq!(winner, a.team_id);
            } else if b.total() > a.total() {
                assert_eq!(winner, b.team_id);
            } else {
                assert_eq!(winner, "t1");
            }
        }
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut sim = simulator(live_match(65, 1), quiet_config(), 2);
        sim.submit_spectator_comment("first!");
        sim.advance(Duration::from_secs(5));
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.phase, Phase::Live);
        assert_eq!(snapshot.round_name, "Quarter Finals");
        assert_eq!(snapshot.time_remaining, 60);
        assert_eq!(snapshot.clock, "1:00");
        assert_eq!(snapshot.transcript.len(), 1);
        assert!(!snapshot.finished);
        assert!(snapshot.winner.is_none());
    }

    #[test]
    fn timestamps_follow_virtual_time() {
        let start = Local::now();
        let mut sim = DebateSimulator::new(live_match(600, 2), "topic", quiet_config())
            .unwrap()
            .with_rng(StdRng::seed_from_u64(1))
            .with_start_time(start);
        sim.start();
        sim.advance(Duration::from_secs(120));
        sim.submit_spectator_comment("two minutes in");
        let expected = (start + chrono::Duration::seconds(120))
            .format("%I:%M %p")
            .to_string();
        assert_eq!(sim.transcript().last().unwrap().timestamp, expected);
    }

    struct ScriptedGenerator;

    impl ArgumentGenerator for ScriptedGenerator {
        fn argument(&self, side: Side, _topic: &str, _rng: &mut dyn RngCore) -> String {
            format!("{} case", side)
        }

        fn moderator_comment(&self, _side: Side, _preceding: &str, _rng: &mut dyn RngCore) -> String {
            "noted".to_string()
        }

        fn spectator_comment(&self, _rng: &mut dyn RngCore) -> String {
            "watching".to_string()
        }
    }

    struct FlatEngine;

    impl FlatEngine {
        fn flatten(scores: &[LiveScoreEntry]) -> Vec<LiveScoreEntry> {
            scores
                .iter()
                .map(|e| LiveScoreEntry::new(e.team_id.clone(), 77))
                .collect()
        }
    }

    impl ScoreEngine for FlatEngine {
        fn argument_stimulus(
            &self,
            scores: &[LiveScoreEntry],
            _team_id: &str,
            _rng: &mut dyn RngCore,
        ) -> Vec<LiveScoreEntry> {
            Self::flatten(scores)
        }

        fn like_stimulus(
            &self,
            scores: &[LiveScoreEntry],
            _team_id: &str,
            _rng: &mut dyn RngCore,
        ) -> Vec<LiveScoreEntry> {
            Self::flatten(scores)
        }

        fn final_score(&self, team_id: &str, _rng: &mut dyn RngCore) -> FinalScore {
            FinalScore {
                team_id: team_id.to_string(),
                clarity: 80,
                evidence: 80,
                rebuttal: 80,
                logic: 80,
            }
        }
    }

    #[test]
    fn custom_generator_and_engine_drive_the_debate() {
        let config = SimulationConfig {
            moderator_delay_ms: 0,
            analysis_delay_ms: 0,
            verdict_delay_ms: 0,
            ..busy_config()
        };
        let mut sim = DebateSimulator::new(live_match(10, 3), "AI rights", config)
            .unwrap()
            .with_generator(ScriptedGenerator)
            .with_engine(FlatEngine)
            .with_rng(StdRng::seed_from_u64(8));
        sim.start();

        sim.advance(Duration::from_secs(9));
        assert_eq!(sim.phase(), Phase::Live);
        assert!(sim.live_scores().iter().all(|e| e.score == 77));

        sim.advance(Duration::from_secs(5));
        assert_eq!(sim.phase(), Phase::Completed);

        let messages = sim.transcript().messages();
        assert!(messages.iter().any(|m| m.body == "noted"));
        for message in messages {
            match message.role {
                Role::Agree => assert_eq!(message.body, "agree case"),
                Role::Disagree => assert_eq!(message.body, "disagree case"),
                Role::Spectator => assert_eq!(message.body, "watching"),
                Role::Ai => assert!(
                    message.body == "noted"
                        || message.body == templates::ENDED_NOTICE
                        || message.body == templates::FINAL_ANALYSIS
                        || message.body.starts_with("RESULTS:"),
                    "{}",
                    message.body
                ),
            }
        }

        let record = sim.into_match();
        let scores = record.scores.unwrap();
        assert!(scores.iter().all(|s| s.total() == 80));
        assert_eq!(record.winner.as_deref(), Some("t1"));
    }

    #[test]
    fn unreachable_time_scale_is_rejected_on_load() {
        for time_scale in [1e-20, 1e30] {
            let config = SimulationConfig {
                time_scale,
                ..SimulationConfig::default()
            };
            let result = DebateSimulator::new(live_match(600, 1), "AI rights", config);
            assert!(matches!(result, Err(ArenaError::Config(_))));
        }
    }

    #[test]
    fn exhausted_message_ids_are_rejected_on_load() {
        let mut record = live_match(600, 1);
        record.transcript.push(Message {
            id: u64::MAX,
            author_id: "t1-a".to_string(),
            author_name: "Alex Chen".to_string(),
            body: "last word".to_string(),
            timestamp: "10:02 AM".to_string(),
            role: Role::Agree,
        });
        let result = DebateSimulator::new(record, "AI rights", quiet_config());
        assert!(matches!(result, Err(ArenaError::InvalidMatch(_))));
    }
}
