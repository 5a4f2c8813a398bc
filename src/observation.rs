//! Observation encoding for job agents.
//!
//! Every job observes a fixed 11-feature vector: its own bidding situation
//! followed by summary statistics over the other live (not done) jobs.

use crate::agent::JobAgent;
use crate::config::ArenaConfig;
use crate::types::JobId;

/// Fixed-size per-job observation.
pub type Observation = [f64; ArenaConfig::OBSERVATION_DIM];

/// Builds observation vectors for job agents.
pub struct ObservationBuilder;

impl ObservationBuilder {
    pub const OWN_PROGRESS: usize = 0;
    pub const OWN_STAKE: usize = 1;
    pub const OWN_NEXT_DURATION: usize = 2;
    pub const OWN_WAIT_TIME: usize = 3;
    pub const OTHER_PROGRESS_MEAN: usize = 4;
    pub const OTHER_STAKE_MEAN: usize = 5;
    pub const OTHER_STAKE_MAX: usize = 6;
    pub const OTHER_STAKE_MIN: usize = 7;
    pub const OTHER_DURATION_MEAN: usize = 8;
    pub const OTHER_DURATION_MAX: usize = 9;
    pub const LIVE_COUNT: usize = 10;

    /// Builds the observation for one job.
    ///
    /// ```text
    /// [progress, stake, next_op_duration, wait_time,
    ///  other_progress_mean,
    ///  other_stake_mean, other_stake_max, other_stake_min,
    ///  other_duration_mean, other_duration_max,
    ///  live_job_count]
    /// ```
    ///
    /// Statistics over other jobs only consider live peers. When no peer is
    /// live they are `0.0`. The live count includes the observing job while
    /// it is live. A done job reports a next-operation duration of 0.
    pub fn build(job: JobId, agents: &[JobAgent]) -> Observation {
        let me = &agents[job];
        let peers: Vec<&JobAgent> = agents
            .iter()
            .filter(|a| a.id != job && !a.is_done())
            .collect();

        let progress: Vec<f64> = peers.iter().map(|a| a.progress_fraction()).collect();
        let stakes: Vec<f64> = peers.iter().map(|a| a.stake_balance as f64).collect();
        let durations: Vec<f64> = peers.iter().map(|a| a.next_op_duration() as f64).collect();
        let live = agents.iter().filter(|a| !a.is_done()).count();

        [
            me.progress_fraction(),
            me.stake_balance as f64,
            me.next_op_duration() as f64,
            me.wait_time as f64,
            mean(&progress),
            mean(&stakes),
            max(&stakes),
            min(&stakes),
            mean(&durations),
            max(&durations),
            live as f64,
        ]
    }

    /// Builds observations for all jobs, indexed by job id.
    pub fn build_all(agents: &[JobAgent]) -> Vec<Observation> {
        (0..agents.len()).map(|j| Self::build(j, agents)).collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}
