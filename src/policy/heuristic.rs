//! Greedy heuristic bidding baseline.
//!
//! Spends a share of the remaining stake that grows with how long the job's
//! next operation is compared to its rivals and with how long it has been
//! waiting.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::Policy;
use crate::observation::{Observation, ObservationBuilder as Obs};

/// Waiting ticks after which the wait pressure saturates.
const WAIT_SATURATION: f64 = 4.0;

/// Greedy heuristic bidding policy.
///
/// For each live job:
/// ```text
/// pressure = ½ · d / max(d, d_max_other) + ½ · min(wait, 4) / 4
/// bid      = round(aggressiveness · stake · pressure) + jitter
/// ```
///
/// The bid never exceeds the richest rival's stake plus one, and a job
/// that is the only live one bids 0 because uncontested access is free.
/// A random jitter of 0 or 1 breaks the perpetual ties symmetric jobs would
/// otherwise fall into.
pub struct GreedyHeuristicPolicy {
    aggressiveness: f64,
    rng: StdRng,
}

impl GreedyHeuristicPolicy {
    /// Creates a new heuristic policy.
    ///
    /// # Arguments
    ///
    /// * `aggressiveness` - Largest fraction of the stake spent on one bid, in `(0, 1]`
    /// * `seed` - Seed for the tie-breaking jitter
    pub fn new(aggressiveness: f64, seed: u64) -> Self {
        Self {
            aggressiveness: aggressiveness.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn bid(&mut self, obs: &Observation) -> i64 {
        let stake = obs[Obs::OWN_STAKE];
        let duration = obs[Obs::OWN_NEXT_DURATION];

        // done, or alone on the floor
        if duration <= 0.0 || obs[Obs::LIVE_COUNT] <= 1.0 {
            return 0;
        }

        let rival_duration = obs[Obs::OTHER_DURATION_MAX].max(duration);
        let wait = obs[Obs::OWN_WAIT_TIME].min(WAIT_SATURATION) / WAIT_SATURATION;
        let pressure = 0.5 * duration / rival_duration + 0.5 * wait;

        let jitter: f64 = if self.rng.gen_bool(0.5) { 1.0 } else { 0.0 };
        let bid = (self.aggressiveness * stake * pressure).round() + jitter;
        let ceiling = stake.min(obs[Obs::OTHER_STAKE_MAX] + 1.0);
        bid.clamp(0.0, ceiling) as i64
    }
}

impl Default for GreedyHeuristicPolicy {
    fn default() -> Self {
        Self::new(0.5, 0)
    }
}

impl Policy for GreedyHeuristicPolicy {
    fn select_bids(&mut self, observations: &[Observation]) -> Vec<i64> {
        observations.iter().map(|obs| self.bid(obs)).collect()
    }

    fn name(&self) -> &str {
        "greedy_heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;

    fn obs(stake: f64, duration: f64, wait: f64, rival_max: f64, live: f64) -> Observation {
        let mut o = [0.0; ArenaConfig::OBSERVATION_DIM];
        o[Obs::OWN_STAKE] = stake;
        o[Obs::OWN_NEXT_DURATION] = duration;
        o[Obs::OWN_WAIT_TIME] = wait;
        o[Obs::OTHER_STAKE_MAX] = 20.0;
        o[Obs::OTHER_DURATION_MAX] = rival_max;
        o[Obs::LIVE_COUNT] = live;
        o
    }

    #[test]
    fn heuristic_returns_correct_count() {
        let mut policy = GreedyHeuristicPolicy::default();
        let bids = policy.select_bids(&vec![obs(20.0, 3.0, 0.0, 3.0, 4.0); 4]);
        assert_eq!(bids.len(), 4);
    }

    #[test]
    fn done_or_lonely_jobs_pass() {
        let mut policy = GreedyHeuristicPolicy::default();
        assert_eq!(policy.bid(&obs(20.0, 0.0, 0.0, 3.0, 2.0)), 0);
        assert_eq!(policy.bid(&obs(20.0, 5.0, 0.0, 0.0, 1.0)), 0);
    }

    #[test]
    fn longer_and_older_jobs_bid_more() {
        let mut policy = GreedyHeuristicPolicy::new(1.0, 3);
        let short = policy.bid(&obs(20.0, 1.0, 0.0, 8.0, 3.0));
        let long = policy.bid(&obs(20.0, 8.0, 0.0, 8.0, 3.0));
        let long_waited = policy.bid(&obs(20.0, 8.0, 4.0, 8.0, 3.0));
        assert!(long > short);
        assert!(long_waited > long);
    }

    #[test]
    fn bid_never_exceeds_stake() {
        let mut policy = GreedyHeuristicPolicy::new(1.0, 0);
        for _ in 0..50 {
            assert!(policy.bid(&obs(3.0, 8.0, 9.0, 8.0, 3.0)) <= 3);
        }
    }
}
