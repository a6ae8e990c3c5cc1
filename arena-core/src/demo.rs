//! Built-in eight-team tournament used by the CLI and tests.

use crate::bracket::{Match, Member, Team, TeamSlot};
use crate::scoring::{FinalScore, LiveScoreEntry};
use crate::transcript::{Message, MODERATOR_ID, MODERATOR_NAME};
use crate::{Role, Side};

pub const TOPIC: &str = "Should AI systems have the same rights as humans?";

const TEAMS: [(&str, &str, Side, [(&str, &str); 3]); 8] = [
    ("team1", "Logic Legends", Side::Agree, [("user1", "Alex Chen"), ("user2", "Taylor Kim"), ("user3", "Morgan Lee")]),
    ("team2", "Debate Dragons", Side::Disagree, [("user4", "Jordan Lee"), ("user5", "Casey Morgan"), ("user6", "Riley Park")]),
    ("team3", "Rhetoric Rebels", Side::Agree, [("user7", "Quinn Davis"), ("user8", "Riley Johnson"), ("user9", "Avery Smith")]),
    ("team4", "Discussion Dynamos", Side::Disagree, [("user10", "Sam Wilson"), ("user11", "Jamie Garcia"), ("user12", "Drew Roberts")]),
    ("team5", "Critical Thinkers", Side::Agree, [("user13", "Alex Smith"), ("user14", "Jordan Taylor"), ("user15", "Blake Johnson")]),
    ("team6", "Rational Minds", Side::Disagree, [("user16", "Casey Brown"), ("user17", "Riley Martinez"), ("user18", "Sydney Thomas")]),
    ("team7", "Thought Leaders", Side::Agree, [("user19", "Sam Thomas"), ("user20", "Jamie Miller"), ("user21", "Corey Wilson")]),
    ("team8", "Discourse Defenders", Side::Disagree, [("user22", "Quinn Wilson"), ("user23", "Taylor Davis"), ("user24", "Jordan Evans")]),
];

/// Opening exchange shared by every demo match: (author id, name, side, text, time).
const OPENING: [(&str, &str, Role, &str, &str); 6] = [
    ("user1", "Alex Chen", Role::Agree, "AI systems, while impressive, are tools created to serve humanity. They lack consciousness and moral agency required for rights.", "10:02 AM"),
    ("user10", "Sam Wilson", Role::Disagree, "But as AI develops consciousness-like qualities, we must reconsider our ethical framework. Many rights are based on capacity, not human DNA.", "10:03 AM"),
    ("user2", "Taylor Kim", Role::Agree, "Rights come with responsibilities and moral agency. AI lacks true understanding of ethics and cannot be held accountable.", "10:05 AM"),
    ("user11", "Jamie Garcia", Role::Disagree, "We already grant rights to corporations, which are also artificial entities. The criteria shouldn't be biology but capability.", "10:07 AM"),
    ("user3", "Morgan Lee", Role::Agree, "Corporations are composed of humans. AI systems are fundamentally different - they simulate understanding but don't truly comprehend.", "10:09 AM"),
    ("user12", "Drew Roberts", Role::Disagree, "How can we be certain humans truly 'understand' in a way AI doesn't? This is the Chinese Room problem - behavior vs. understanding.", "10:11 AM"),
];

const LIVE_TAIL: [(&str, &str, Role, &str, &str); 4] = [
    (MODERATOR_ID, MODERATOR_NAME, Role::Ai, "ANALYSIS: Sam's argument uses the philosophical Chinese Room thought experiment effectively, raising questions about how we define understanding.", "10:12 AM"),
    (MODERATOR_ID, MODERATOR_NAME, Role::Ai, "FACT CHECK: Corporate personhood is a legal concept in many jurisdictions, giving corporations some rights similar to individuals.", "10:13 AM"),
    ("spectator123", "Spectator Jane", Role::Spectator, "I find both arguments compelling! The philosophical angle is fascinating.", "10:14 AM"),
    ("spectator456", "Spectator Mike", Role::Spectator, "Has anyone considered the economic implications of AI rights?", "10:15 AM"),
];

const COMPLETED_TAIL: [(&str, &str, Role, &str, &str); 3] = [
    (MODERATOR_ID, MODERATOR_NAME, Role::Ai, "ANALYSIS: The debate has raised important questions about consciousness, legal personhood, and moral agency.", "10:15 AM"),
    (MODERATOR_ID, MODERATOR_NAME, Role::Ai, "SUMMARY: The agreeing team emphasized the lack of consciousness and moral agency in AI systems, while the disagreeing team focused on functional capabilities and questioned our understanding of consciousness itself.", "10:16 AM"),
    (MODERATOR_ID, MODERATOR_NAME, Role::Ai, "FINAL ANALYSIS: Both teams presented strong arguments. The agreeing team showed excellent clarity and rebuttal techniques, while the disagreeing team provided strong evidence and logical coherence.", "10:17 AM"),
];

fn team(index: usize) -> Team {
    let (id, name, side, members) = TEAMS[index];
    Team {
        id: id.to_string(),
        name: name.to_string(),
        members: members
            .iter()
            .map(|(id, name)| Member {
                id: id.to_string(),
                name: name.to_string(),
                avatar: None,
            })
            .collect(),
        side,
    }
}

fn messages(live: bool) -> Vec<Message> {
    let opening = OPENING.iter().enumerate().map(|(i, entry)| (i as u64 + 1, entry));
    let tail: &[_] = if live { &LIVE_TAIL } else { &COMPLETED_TAIL };
    let tail = tail.iter().enumerate().map(|(i, entry)| (i as u64 + 100, entry));
    opening
        .chain(tail)
        .map(|(id, (author_id, author_name, role, body, timestamp))| Message {
            id,
            author_id: author_id.to_string(),
            author_name: author_name.to_string(),
            body: body.to_string(),
            timestamp: timestamp.to_string(),
            role: *role,
        })
        .collect()
}

fn score(team_id: &str, [clarity, evidence, rebuttal, logic]: [u32; 4]) -> FinalScore {
    FinalScore {
        team_id: team_id.to_string(),
        clarity,
        evidence,
        rebuttal,
        logic,
    }
}

fn quarter_final(position: u32, winner: usize, scores: [[u32; 4]; 2]) -> Match {
    let (agree, disagree) = (team(2 * position as usize - 2), team(2 * position as usize - 1));
    Match {
        id: position,
        round: 1,
        position,
        scores: Some([score(&agree.id, scores[0]), score(&disagree.id, scores[1])]),
        winner: Some(TEAMS[winner].0.to_string()),
        teams: [TeamSlot::Assigned(agree), TeamSlot::Assigned(disagree)],
        is_live: false,
        transcript: messages(false),
        time_remaining: None,
        live_scores: Vec::new(),
    }
}

fn semi_final(id: u32, agree: usize, disagree: usize, seconds: u32, live: [u32; 2]) -> Match {
    let (agree, disagree) = (team(agree), team(disagree));
    Match {
        id,
        round: 2,
        position: id - 4,
        live_scores: vec![
            LiveScoreEntry::new(agree.id.as_str(), live[0]),
            LiveScoreEntry::new(disagree.id.as_str(), live[1]),
        ],
        teams: [TeamSlot::Assigned(agree), TeamSlot::Assigned(disagree)],
        is_live: true,
        winner: None,
        transcript: messages(true),
        scores: None,
        time_remaining: Some(seconds),
    }
}

/// The demo bracket: quarter finals decided, both semi finals live, the
/// final waiting on their winners.
pub fn tournament() -> Vec<Match> {
    vec![
        quarter_final(1, 0, [[80, 70, 90, 80], [70, 60, 80, 70]]),
        quarter_final(2, 3, [[70, 60, 70, 80], [90, 80, 80, 90]]),
        quarter_final(3, 4, [[90, 80, 70, 90], [70, 70, 80, 80]]),
        quarter_final(4, 7, [[70, 70, 60, 80], [80, 90, 80, 80]]),
        semi_final(5, 0, 3, 600, [68, 72]),
        semi_final(6, 4, 7, 540, [71, 65]),
        Match {
            id: 7,
            round: 3,
            position: 1,
            teams: [
                TeamSlot::Unresolved { side: Side::Agree },
                TeamSlot::Unresolved { side: Side::Disagree },
            ],
            is_live: false,
            winner: None,
            transcript: Vec::new(),
            scores: None,
            time_remaining: None,
            live_scores: Vec::new(),
        },
    ]
}

/// Look up a demo match by id.
pub fn find_match(id: u32) -> Option<Match> {
    tournament().into_iter().find(|m| m.id == id)
}
