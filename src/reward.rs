//! Per-job reward for a resolved tick.

use crate::config::ArenaConfig;
use crate::scheduler::{ContentionOutcome, TickResult};
use crate::types::JobId;

/// Computes per-job rewards from a tick outcome.
pub struct RewardComputer;

impl RewardComputer {
    /// Computes the reward for one job.
    ///
    /// The first matching rule applies:
    ///
    /// 1. **Exhausted stake**: the balance hit zero this tick and the job is
    ///    not done → `config.exhausted_stake_penalty`.
    /// 2. **Completion**: one of the job's operations finished this tick →
    ///    `job_count − done_before`. Earlier finishers earn more.
    /// 3. **Tie**: the job tied for the highest bid → `config.tie_penalty`.
    /// 4. **Outbid / blocked**: `−reference_duration / longest_operation`,
    ///    where the reference is the operation that kept the job waiting.
    /// 5. Anything else (processing, a win without completion, done) → `0`.
    pub fn compute(
        job: JobId,
        tick: &TickResult,
        job_count: usize,
        longest_operation: u32,
        config: &ArenaConfig,
    ) -> f64 {
        if tick.exhausted.contains(&job) {
            return config.exhausted_stake_penalty;
        }

        if tick.completed(job) {
            return job_count.saturating_sub(tick.done_before) as f64;
        }

        match tick.outcomes[job] {
            ContentionOutcome::Tied => config.tie_penalty,
            ContentionOutcome::Outbid { reference_duration }
            | ContentionOutcome::Blocked { reference_duration } => {
                -(reference_duration as f64) / longest_operation.max(1) as f64
            }
            ContentionOutcome::Won | ContentionOutcome::Idle => 0.0,
        }
    }

    /// Computes rewards for every job of a tick.
    pub fn compute_all(
        tick: &TickResult,
        job_count: usize,
        longest_operation: u32,
        config: &ArenaConfig,
    ) -> Vec<f64> {
        (0..job_count)
            .map(|job| Self::compute(job, tick, job_count, longest_operation, config))
            .collect()
    }
}
