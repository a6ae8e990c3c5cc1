//! Drives a [`DebateSimulator`] in real time on a tokio task.
//!
//! The task owns the simulator outright. Viewers talk to it through a
//! [`LiveDebate`] handle: commands go in over an mpsc channel, and every
//! change comes back out as a fresh [`MatchSnapshot`] on a watch channel.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::bracket::Match;
use crate::error::ArenaError;
use crate::simulator::{DebateSimulator, MatchSnapshot};

const COMMAND_BUFFER: usize = 32;

enum Command {
    Comment {
        text: String,
        reply: oneshot::Sender<bool>,
    },
    Like {
        team_id: String,
        reply: oneshot::Sender<bool>,
    },
    Shutdown {
        reply: oneshot::Sender<Match>,
    },
}

/// Handle to a running debate. Cheap to clone; the debate task stops once
/// every handle is gone or [`LiveDebate::shutdown`] is called.
#[derive(Clone)]
pub struct LiveDebate {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<MatchSnapshot>,
}

impl LiveDebate {
    /// Start `sim` and run it on the current tokio runtime. Virtual time
    /// runs `time_scale` times faster than the runtime clock.
    pub fn spawn(mut sim: DebateSimulator) -> Self {
        sim.start();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(sim.snapshot());
        tokio::spawn(run(sim, command_rx, snapshot_tx, Instant::now()));
        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
        }
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<MatchSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> MatchSnapshot {
        self.snapshots.borrow().clone()
    }

    pub async fn submit_comment(&self, text: impl Into<String>) -> Result<bool, ArenaError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Comment {
            text: text.into(),
            reply,
        })
        .await?;
        response.await.map_err(|_| ArenaError::Stopped)
    }

    pub async fn like_team(&self, team_id: impl Into<String>) -> Result<bool, ArenaError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Like {
            team_id: team_id.into(),
            reply,
        })
        .await?;
        response.await.map_err(|_| ArenaError::Stopped)
    }

    /// Wait until the match has a winner and return the final snapshot.
    pub async fn wait_finished(&self) -> Result<MatchSnapshot, ArenaError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| snapshot.finished)
            .await
            .map_err(|_| ArenaError::Stopped)?;
        Ok(snapshot.clone())
    }

    /// Stop the debate and take the match record back. A debate that is
    /// already resolving is carried through to its verdict first.
    pub async fn shutdown(self) -> Result<Match, ArenaError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Shutdown { reply }).await?;
        response.await.map_err(|_| ArenaError::Stopped)
    }

    async fn send(&self, command: Command) -> Result<(), ArenaError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ArenaError::Stopped)
    }
}

/// Virtual time that has passed since `origin` at the given speed-up.
fn virtual_elapsed(origin: Instant, time_scale: f64) -> Duration {
    Instant::now().duration_since(origin).mul_f64(time_scale)
}

async fn run(
    mut sim: DebateSimulator,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<MatchSnapshot>,
    origin: Instant,
) {
    let time_scale = sim.config().time_scale;
    let match_id = sim.record().id;
    info!(match_id, time_scale, "live debate task started");

    loop {
        let next_due = sim.next_due();
        let deadline = next_due.map(|due| origin + due.div_f64(time_scale));

        tokio::select! {
            command = commands.recv() => {
                sim.advance_to(virtual_elapsed(origin, time_scale));
                match command {
                    Some(Command::Comment { text, reply }) => {
                        let _ = reply.send(sim.submit_spectator_comment(&text));
                    }
                    Some(Command::Like { team_id, reply }) => {
                        let _ = reply.send(sim.like_team(&team_id));
                    }
                    Some(Command::Shutdown { reply }) => {
                        sim.finish_resolution();
                        publish(&snapshots, &sim);
                        info!(match_id, "live debate shut down");
                        let _ = reply.send(sim.into_match());
                        return;
                    }
                    None => {
                        sim.finish_resolution();
                        publish(&snapshots, &sim);
                        debug!(match_id, "all handles dropped, live debate stopping");
                        return;
                    }
                }
            }
            _ = sleep_until(deadline.unwrap_or(origin)), if deadline.is_some() => {
                if let Some(due) = next_due {
                    sim.advance_to(virtual_elapsed(origin, time_scale).max(due));
                }
            }
        }

        publish(&snapshots, &sim);
    }
}

fn publish(snapshots: &watch::Sender<MatchSnapshot>, sim: &DebateSimulator) {
    let next = sim.snapshot();
    snapshots.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}
