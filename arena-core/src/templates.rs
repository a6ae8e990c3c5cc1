//! Built-in text templates for debaters, the moderator and the audience.

use rand::{Rng, RngCore};

use crate::verdict::is_final_round;
use crate::Side;

/// Fixed phrase pools.
mod pools {
    pub const AGREE_ARGUMENTS: &[&str] = &[
        "Building on my teammate's point, we must consider the ethical implications here.",
        "The evidence clearly supports our position as demonstrated by recent studies.",
        "I'd like to address the counterargument by pointing out a logical fallacy.",
        "Historical precedent strengthens our position on this matter.",
        "When we look at real-world examples, our stance is consistently validated.",
    ];
    pub const DISAGREE_ARGUMENTS: &[&str] = &[
        "I must challenge the previous assertion with contradictory evidence.",
        "The opposing team's argument overlooks several critical factors.",
        "From a different perspective, we can see that this approach is problematic.",
        "Statistical analysis doesn't support the conclusion they've drawn.",
        "There's a fundamental misunderstanding in how they've framed this issue.",
    ];
    pub const SPECTATOR_COMMENTS: &[&str] = &[
        "Interesting point! I hadn't considered that perspective.",
        "I think both teams are making compelling arguments.",
        "The agree team seems to have stronger evidence so far.",
        "The disagree team's rebuttal was very effective.",
        "I'm learning a lot from this debate!",
        "This topic is more complex than I initially thought.",
        "Can the AI moderator clarify the last fact check?",
        "Great debate so far, really enjoying the points raised.",
        "The team dynamics are fascinating to watch.",
    ];
}

/// Number of moderator remark templates.
const MODERATOR_REMARKS: usize = 5;

pub const ENDED_NOTICE: &str =
    "The debate has ended. The AI moderator is calculating the scores...";

pub const FINAL_ANALYSIS: &str = "FINAL ANALYSIS: This debate has concluded. Both teams \
presented strong arguments. Team scores will be displayed shortly.";

/// Source of everything said during a simulated debate.
///
/// The built-in [`TemplateGenerator`] draws from fixed pools; a model-backed
/// implementation can replace it without touching the simulator.
pub trait ArgumentGenerator: Send {
    /// A debater's contribution for `side`. `topic` is the debate title.
    fn argument(&self, side: Side, topic: &str, rng: &mut dyn RngCore) -> String;

    /// A moderator remark reacting to the argument just made by `side`.
    fn moderator_comment(&self, side: Side, preceding: &str, rng: &mut dyn RngCore) -> String;

    fn spectator_comment(&self, rng: &mut dyn RngCore) -> String;
}

/// Uniform picks from the fixed phrase pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl ArgumentGenerator for TemplateGenerator {
    fn argument(&self, side: Side, topic: &str, rng: &mut dyn RngCore) -> String {
        generate_argument(side, topic, rng)
    }

    fn moderator_comment(&self, side: Side, preceding: &str, rng: &mut dyn RngCore) -> String {
        generate_moderator_comment(side, preceding, rng)
    }

    fn spectator_comment(&self, rng: &mut dyn RngCore) -> String {
        generate_spectator_comment(rng)
    }
}

fn pick(pool: &[&'static str], rng: &mut dyn RngCore) -> &'static str {
    pool[rng.gen_range(0..pool.len())]
}

/// The pools are not topic-specific yet; `topic` is accepted so callers do
/// not change once they are.
pub fn generate_argument(side: Side, _topic: &str, rng: &mut dyn RngCore) -> String {
    match side {
        Side::Agree => pick(pools::AGREE_ARGUMENTS, rng),
        Side::Disagree => pick(pools::DISAGREE_ARGUMENTS, rng),
    }
    .to_string()
}

pub fn generate_moderator_comment(side: Side, _preceding: &str, rng: &mut dyn RngCore) -> String {
    match rng.gen_range(0..MODERATOR_REMARKS) {
        0 => format!(
            "ANALYSIS: The {} team makes a strong logical argument, though additional evidence would strengthen it.",
            side
        ),
        1 => format!(
            "FACT CHECK: The claim made by the {} team is partially supported by current research.",
            side
        ),
        2 => "FALLACY ALERT: Be careful of hasty generalization in the recent argument.".to_string(),
        3 => format!(
            "CLARITY ASSESSMENT: The {} team's argument structure is well-organized and clear.",
            side
        ),
        _ => "REBUTTAL EFFECTIVENESS: Strong counter-argument that directly addresses the opposing point."
            .to_string(),
    }
}

pub fn generate_spectator_comment(rng: &mut dyn RngCore) -> String {
    pick(pools::SPECTATOR_COMMENTS, rng).to_string()
}

/// Synthetic `(author_id, author_name)` for an audience member.
pub fn spectator_identity(rng: &mut dyn RngCore) -> (String, String) {
    (
        format!("spectator{}", rng.gen_range(0..1000)),
        format!("Spectator {}", rng.gen_range(0..100)),
    )
}

/// Result line naming the winner. Earlier rounds announce advancement, the
/// final crowns the champions.
pub fn results_announcement(winner_name: &str, winner_side: Side, round: u32) -> String {
    if is_final_round(round) {
        format!(
            "RESULTS: {} has won this debate! They are the tournament champions!",
            winner_name
        )
    } else {
        format!(
            "RESULTS: {} has won this debate! They will advance to the next round as the best {} team.",
            winner_name, winner_side
        )
    }
}
