//! Run command - play one match live in the terminal
//!
//! Usage:
//! ```bash
//! arena run --match-id 5
//! arena run --match-id 6 --seconds 90 --time-scale 5 --interactive
//! arena run --file bracket.json --match-id 2 --fast --json
//! ```

use anyhow::{bail, Context, Result};
use arena_core::{
    demo, DebateSimulator, LiveDebate, Match, MatchSnapshot, Message, Role, Side,
    SimulationConfig,
};
use clap::Args;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::BufRead;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Speed-up used by `--fast` unless `--time-scale` is also given.
const FAST_TIME_SCALE: f64 = 60.0;

#[derive(Args)]
pub struct RunArgs {
    /// Match to run
    #[arg(long, short = 'm', default_value_t = 5)]
    match_id: u32,

    /// Bracket JSON file (defaults to the built-in demo tournament)
    #[arg(long, short = 'f', value_name = "FILE")]
    file: Option<PathBuf>,

    /// Debate topic
    #[arg(long, default_value = demo::TOPIC)]
    topic: String,

    /// Override the remaining match time, in seconds
    #[arg(long)]
    seconds: Option<u32>,

    /// Seed for a reproducible debate
    #[arg(long, env = "ARENA_SEED")]
    seed: Option<u64>,

    /// Run this many times faster than real time
    #[arg(long)]
    time_scale: Option<f64>,

    /// Skip the resolution pauses and run at a high speed-up
    #[arg(long)]
    fast: bool,

    /// Read spectator input from stdin (`/like <team-id>` or a comment)
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Print the finished match record as JSON instead of a score card
    #[arg(long)]
    json: bool,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    let mut bracket = super::load_bracket(args.file.as_deref())?;
    let Some(index) = bracket.iter().position(|m| m.id == args.match_id) else {
        bail!("no match with id {} in the bracket", args.match_id);
    };
    let mut record = bracket.swap_remove(index);
    if let Some(seconds) = args.seconds {
        record.time_remaining = Some(seconds);
    }

    let mut sim = DebateSimulator::new(record, args.topic.as_str(), config)
        .with_context(|| format!("cannot run match {}", args.match_id))?;
    if let Some(seed) = args.seed {
        sim = sim.with_rng(StdRng::seed_from_u64(seed));
    }
    print_header(sim.record(), &args.topic);

    let debate = LiveDebate::spawn(sim);
    let mut updates = debate.subscribe();
    let mut input = args.interactive.then(spawn_stdin_reader);
    let mut printed = 0;
    let mut last = debate.snapshot();
    printed = print_new_messages(&last, printed);

    while !last.finished {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                last = updates.borrow_and_update().clone();
                printed = print_new_messages(&last, printed);
            }
            line = recv_line(&mut input), if input.is_some() => {
                match line {
                    Some(line) => handle_input(&debate, &line).await?,
                    None => {
                        debug!("stdin closed");
                        input = None;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping debate");
                break;
            }
        }
    }

    let record = debate.shutdown().await?;
    print_remaining(&record.transcript, printed);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_score_card(&record, &last);
    }
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<SimulationConfig> {
    let mut config = SimulationConfig::from_env().context("invalid ARENA_* configuration")?;
    if args.fast {
        config.moderator_delay_ms = 0;
        config.analysis_delay_ms = 0;
        config.verdict_delay_ms = 0;
        config.time_scale = FAST_TIME_SCALE;
    }
    if let Some(scale) = args.time_scale {
        config.time_scale = scale;
    }
    if let Some(seconds) = args.seconds {
        config.match_seconds = seconds;
    }
    config.validate()?;
    Ok(config)
}

/// Read stdin on a plain thread; tokio's stdin would keep the runtime alive
/// on exit while a read is blocked.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn recv_line(input: &mut Option<mpsc::Receiver<String>>) -> Option<String> {
    match input {
        Some(rx) => rx.recv().await,
        None => None,
    }
}

async fn handle_input(debate: &LiveDebate, line: &str) -> Result<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    let mut words = line.split_whitespace();
    if words.next() == Some("/like") {
        let team_id = words.next().unwrap_or_default();
        if !debate.like_team(team_id).await? {
            println!("{} cannot like {:?} right now", "⚠".yellow().bold(), team_id);
        }
        return Ok(());
    }
    if !debate.submit_comment(line).await? {
        println!("{} the debate is no longer taking comments", "⚠".yellow().bold());
    }
    Ok(())
}

fn print_header(record: &Match, topic: &str) {
    println!("{}", topic.bold().cyan());
    println!("{}", "═".repeat(60).cyan());
    let names: Vec<String> = record
        .teams
        .iter()
        .map(|slot| format!("{} ({})", slot.display_name(), slot.side()))
        .collect();
    println!(
        "{} · Match #{} · {}",
        record.round_name().bold(),
        record.id,
        names.join(" vs ")
    );
    println!();
}

fn print_message(message: &Message) {
    let author = match message.role {
        Role::Agree => message.author_name.green(),
        Role::Disagree => message.author_name.red(),
        Role::Spectator => message.author_name.blue(),
        Role::Ai => message.author_name.magenta().bold(),
    };
    println!(
        "{} {} ({}): {}",
        format!("[{}]", message.timestamp).dimmed(),
        author,
        message.role,
        message.body
    );
}

fn print_new_messages(snapshot: &MatchSnapshot, printed: usize) -> usize {
    print_remaining(&snapshot.transcript, printed);
    snapshot.transcript.len().max(printed)
}

fn print_remaining(transcript: &[Message], printed: usize) {
    for message in transcript.iter().skip(printed) {
        print_message(message);
    }
}

fn print_score_card(record: &Match, last: &MatchSnapshot) {
    println!();
    println!("{}", "Score card".bold());
    println!("{}", "─".repeat(60));

    let Some(scores) = &record.scores else {
        println!(
            "  No verdict yet. {} left on the clock, live scores {}",
            last.clock,
            last.live_scores
                .iter()
                .map(|e| format!("{} {}", e.team_id, e.score))
                .collect::<Vec<_>>()
                .join(" / ")
        );
        return;
    };

    for side in [Side::Agree, Side::Disagree] {
        let Some(team) = record.team_on(side) else {
            continue;
        };
        let Some(score) = scores.iter().find(|s| s.team_id == team.id) else {
            continue;
        };
        println!(
            "  {:<22} {:<9} clarity {:>3}  evidence {:>3}  rebuttal {:>3}  logic {:>3}  total {}",
            team.name,
            side.to_string(),
            score.clarity,
            score.evidence,
            score.rebuttal,
            score.logic,
            score.total().to_string().bold()
        );
    }

    if let Some(winner) = record.winner.as_deref().and_then(|id| record.team(id)) {
        println!();
        println!("  {} {}", "Winner:".bold(), winner.name.green().bold());
    }
    if last.likes.total() > 0 {
        println!("  Likes: {}", last.likes.describe());
    }
}
