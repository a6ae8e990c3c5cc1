//! Bracket command - list every match grouped by round
//!
//! Usage:
//! ```bash
//! arena bracket
//! arena bracket --file bracket.json
//! ```

use anyhow::Result;
use arena_core::{Match, MatchStatus, Side, TeamSlot};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args)]
pub struct BracketArgs {
    /// Bracket JSON file (defaults to the built-in demo tournament)
    #[arg(long, short = 'f', value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print the bracket as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: BracketArgs) -> Result<()> {
    let bracket = super::load_bracket(args.file.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&bracket)?);
        return Ok(());
    }

    let mut rounds: BTreeMap<u32, Vec<&Match>> = BTreeMap::new();
    for record in &bracket {
        rounds.entry(record.round).or_default().push(record);
    }

    println!("{}", arena_core::demo::TOPIC.bold().cyan());
    println!("{}", "═".repeat(60).cyan());

    for (round, mut matches) in rounds {
        matches.sort_by_key(|m| m.position);
        println!();
        println!("{}", arena_core::bracket::round_name(round).bold());
        for record in matches {
            print_match(record);
        }
    }

    Ok(())
}

fn slot_label(slot: &TeamSlot, winner: Option<&str>) -> String {
    let label = format!("{} ({})", slot.display_name(), slot.side());
    match (slot.id(), winner) {
        (Some(id), Some(winner)) if id == winner => label.green().bold().to_string(),
        _ if !slot.is_resolved() => label.dimmed().to_string(),
        _ => label,
    }
}

fn print_match(record: &Match) {
    let winner = record.winner.as_deref();
    let [first, second] = &record.teams;
    let status = match record.status() {
        MatchStatus::Live => "LIVE".red().bold(),
        MatchStatus::Completed => "Completed".green(),
        MatchStatus::Upcoming => "Upcoming".dimmed(),
    };
    println!(
        "  #{} {} vs {}  [{}]",
        record.id,
        slot_label(first, winner),
        slot_label(second, winner),
        status
    );

    match record.status() {
        MatchStatus::Live => {
            let scores: Vec<String> = record
                .live_scores
                .iter()
                .map(|entry| format!("{} {}", entry.team_id, entry.score))
                .collect();
            let remaining = record.time_remaining.unwrap_or(0);
            println!(
                "      {} {}:{:02} left, live scores {}",
                "•".cyan(),
                remaining / 60,
                remaining % 60,
                scores.join(" / ")
            );
        }
        MatchStatus::Completed => {
            for side in [Side::Agree, Side::Disagree] {
                let Some(team) = record.team_on(side) else {
                    continue;
                };
                if let Some(score) = record.final_score(&team.id) {
                    println!(
                        "      {} {}: clarity {} evidence {} rebuttal {} logic {} = {}",
                        "•".cyan(),
                        team.name,
                        score.clarity,
                        score.evidence,
                        score.rebuttal,
                        score.logic,
                        score.total().to_string().bold()
                    );
                }
            }
        }
        MatchStatus::Upcoming => {}
    }
}
