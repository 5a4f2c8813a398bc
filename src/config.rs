//! Configuration for the bidding arena.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::environment::EnvError;

/// Configuration for the job-shop bidding environment.
///
/// Controls the stake endowment, the simulated clock, the reward constants,
/// and the optional episode step cap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArenaConfig {
    // --- Bidding ---
    /// Stake every job starts an episode with.
    pub initial_stake: u32,
    /// Largest bid a policy is expected to submit (bids `0..=max_bid`).
    pub max_bid: u32,

    // --- Clock ---
    /// Simulated time that passes in one tick.
    pub time_delta: f64,
    /// Step cap after which an episode is truncated (`None` = run until done).
    pub max_cycles: Option<u32>,

    // --- Reward ---
    /// Reward when a job's stake hits zero before the job is done.
    pub exhausted_stake_penalty: f64,
    /// Reward for a job that tied for the highest bid on its machine.
    pub tie_penalty: f64,
}

impl ArenaConfig {
    /// Number of features in every per-job observation.
    pub const OBSERVATION_DIM: usize = 11;

    /// Observation dimension per job.
    pub fn observation_dim(&self) -> usize {
        Self::OBSERVATION_DIM
    }

    /// Number of discrete bid levels: `0..=max_bid`.
    pub fn action_dim(&self) -> usize {
        self.max_bid as usize + 1
    }

    /// Checks that the clock advances and the reward constants are finite.
    pub fn validate(&self) -> Result<(), EnvError> {
        if !(self.time_delta.is_finite() && self.time_delta > 0.0) {
            return Err(EnvError::InvalidConfig {
                field: "time_delta",
                reason: format!("must be positive and finite, got {}", self.time_delta),
            });
        }
        for (field, value) in [
            ("exhausted_stake_penalty", self.exhausted_stake_penalty),
            ("tie_penalty", self.tie_penalty),
        ] {
            if !value.is_finite() {
                return Err(EnvError::InvalidConfig {
                    field,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_stake: 20,
            max_bid: 19,
            time_delta: 1.0,
            max_cycles: None,
            exhausted_stake_penalty: -10.0,
            tie_penalty: -0.05,
        }
    }
}
