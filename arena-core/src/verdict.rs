//! Winner selection once final scores are in.

use rand::{Rng, RngCore};

use crate::scoring::FinalScore;

/// Round number of the tournament final.
pub const FINAL_ROUND: u32 = 3;

pub fn is_final_round(round: u32) -> bool {
    round >= FINAL_ROUND
}

/// Pick the winning team id from the two final scores.
///
/// The final is decided on total; equal totals go to the lexicographically
/// smaller team id. Earlier rounds are a coin flip: advancement should rank a
/// team against the same-side team of the sibling match, which needs bracket
/// state a single match does not have.
pub fn determine_winner<'a>(
    scores: &'a [FinalScore; 2],
    round: u32,
    rng: &mut dyn RngCore,
) -> &'a str {
    let [first, second] = scores;
    if !is_final_round(round) {
        return if rng.gen_bool(0.5) {
            first.team_id.as_str()
        } else {
            second.team_id.as_str()
        };
    }

    match first.total().cmp(&second.total()) {
        std::cmp::Ordering::Greater => first.team_id.as_str(),
        std::cmp::Ordering::Less => second.team_id.as_str(),
        std::cmp::Ordering::Equal => first.team_id.as_str().min(second.team_id.as_str()),
    }
}
