//! Simulation pacing and probabilities.
//!
//! Every field has a default matching the live debate screen: a ten minute
//! match clock, a one second clock tick and a three second activity tick.
//! Values can be overlaid from `ARENA_*` environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::clock::DEFAULT_MATCH_SECONDS;

/// Accepted range for `time_scale`. Outside it, scaled match durations no
/// longer fit a `Duration`.
pub const MIN_TIME_SCALE: f64 = 1e-3;
pub const MAX_TIME_SCALE: f64 = 1e4;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidEnvVar { var: String, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Clock start for matches that carry no remaining time of their own.
    pub match_seconds: u32,
    pub clock_period_ms: u64,
    pub activity_period_ms: u64,
    /// Chance per activity tick that a debater posts an argument.
    pub argument_chance: f64,
    /// Chance that the moderator reacts to an argument that was just posted.
    pub moderator_chance: f64,
    pub spectator_comment_chance: f64,
    /// Chance per activity tick that the audience counter drifts.
    pub audience_drift_chance: f64,
    /// Chance per activity tick of a simulated spectator like.
    pub like_chance: f64,
    pub moderator_delay_ms: u64,
    /// Pause between the end-of-debate notice and the final analysis.
    pub analysis_delay_ms: u64,
    /// Pause between the final analysis and the published result.
    pub verdict_delay_ms: u64,
    /// Wall-clock speed-up applied by the live driver (2.0 = twice as fast).
    pub time_scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            match_seconds: DEFAULT_MATCH_SECONDS,
            clock_period_ms: 1000,
            activity_period_ms: 3000,
            argument_chance: 0.3,
            moderator_chance: 0.2,
            spectator_comment_chance: 0.15,
            audience_drift_chance: 0.3,
            like_chance: 0.3,
            moderator_delay_ms: 1500,
            analysis_delay_ms: 2000,
            verdict_delay_ms: 5000,
            time_scale: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Default pacing with the resolution sequence collapsed to a single
    /// instant, so a match resolves on the tick its clock runs out.
    pub fn instant() -> Self {
        Self {
            moderator_delay_ms: 0,
            analysis_delay_ms: 0,
            verdict_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Load the defaults and overlay any `ARENA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        overlay(&mut config.match_seconds, "ARENA_MATCH_SECONDS")?;
        overlay(&mut config.clock_period_ms, "ARENA_CLOCK_PERIOD_MS")?;
        overlay(&mut config.activity_period_ms, "ARENA_ACTIVITY_PERIOD_MS")?;
        overlay(&mut config.argument_chance, "ARENA_ARGUMENT_CHANCE")?;
        overlay(&mut config.moderator_chance, "ARENA_MODERATOR_CHANCE")?;
        overlay(
            &mut config.spectator_comment_chance,
            "ARENA_SPECTATOR_COMMENT_CHANCE",
        )?;
        overlay(&mut config.audience_drift_chance, "ARENA_AUDIENCE_DRIFT_CHANCE")?;
        overlay(&mut config.like_chance, "ARENA_LIKE_CHANCE")?;
        overlay(&mut config.moderator_delay_ms, "ARENA_MODERATOR_DELAY_MS")?;
        overlay(&mut config.analysis_delay_ms, "ARENA_ANALYSIS_DELAY_MS")?;
        overlay(&mut config.verdict_delay_ms, "ARENA_VERDICT_DELAY_MS")?;
        overlay(&mut config.time_scale, "ARENA_TIME_SCALE")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chances = [
            ("argument_chance", self.argument_chance),
            ("moderator_chance", self.moderator_chance),
            ("spectator_comment_chance", self.spectator_comment_chance),
            ("audience_drift_chance", self.audience_drift_chance),
            ("like_chance", self.like_chance),
        ];
        for (name, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, chance
                )));
            }
        }
        if self.clock_period_ms == 0 || self.activity_period_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick periods must be greater than zero".to_string(),
            ));
        }
        if !(MIN_TIME_SCALE..=MAX_TIME_SCALE).contains(&self.time_scale) {
            return Err(ConfigError::Invalid(format!(
                "time_scale must be within [{}, {}], got {}",
                MIN_TIME_SCALE, MAX_TIME_SCALE, self.time_scale
            )));
        }
        Ok(())
    }

    pub fn clock_period(&self) -> Duration {
        Duration::from_millis(self.clock_period_ms)
    }

    pub fn activity_period(&self) -> Duration {
        Duration::from_millis(self.activity_period_ms)
    }

    pub fn moderator_delay(&self) -> Duration {
        Duration::from_millis(self.moderator_delay_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn verdict_delay(&self) -> Duration {
        Duration::from_millis(self.verdict_delay_ms)
    }
}

fn overlay<T: FromStr>(field: &mut T, var: &str) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(var) {
        *field = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                value,
            })?;
    }
    Ok(())
}
