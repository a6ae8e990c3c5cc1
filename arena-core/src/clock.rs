//! Match countdown.

use std::fmt;

/// Clock start used when a match carries no remaining time.
pub const DEFAULT_MATCH_SECONDS: u32 = 600;

/// What a single clock tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time is still left on the clock.
    Running,
    /// This tick ran the clock out. Reported once per clock.
    Expired,
    /// The clock had already run out; nothing changed.
    Stopped,
}

/// Remaining debate time in whole seconds, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebateClock {
    remaining: u32,
    expiry_reported: bool,
}

impl DebateClock {
    pub fn new(remaining: u32) -> Self {
        Self {
            remaining,
            expiry_reported: false,
        }
    }

    /// Count down one second. A clock that starts at zero reports expiry on
    /// its first tick.
    pub fn tick(&mut self) -> Tick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            Tick::Running
        } else if self.expiry_reported {
            Tick::Stopped
        } else {
            self.expiry_reported = true;
            Tick::Expired
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// `M:SS`, e.g. `9:05`.
    pub fn format(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

impl Default for DebateClock {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_SECONDS)
    }
}

impl fmt::Display for DebateClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
