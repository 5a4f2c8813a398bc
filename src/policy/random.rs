//! Random bidding policy for testing and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::trait_::Policy;
use crate::observation::Observation;

/// Uniformly random bids.
///
/// Each job independently bids a value in `[0, max_bid]`. Used for sanity
/// checks and as a lower-bound baseline.
pub struct RandomPolicy {
    max_bid: u32,
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates a new random policy.
    ///
    /// # Arguments
    ///
    /// * `max_bid` - Largest bid to draw.
    /// * `seed` - Seed for reproducible bid sequences.
    pub fn new(max_bid: u32, seed: u64) -> Self {
        Self {
            max_bid,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn select_bids(&mut self, observations: &[Observation]) -> Vec<i64> {
        let max_bid = self.max_bid as i64;
        (0..observations.len())
            .map(|_| self.rng.gen_range(0..=max_bid))
            .collect()
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;

    #[test]
    fn random_policy_returns_correct_count() {
        let mut policy = RandomPolicy::new(19, 1);
        let obs = vec![[0.0; ArenaConfig::OBSERVATION_DIM]; 4];
        assert_eq!(policy.select_bids(&obs).len(), 4);
    }

    #[test]
    fn random_policy_bids_in_range() {
        let mut policy = RandomPolicy::new(5, 1);
        let obs = vec![[0.0; ArenaConfig::OBSERVATION_DIM]; 100];
        for bid in policy.select_bids(&obs) {
            assert!((0..=5).contains(&bid));
        }
    }

    #[test]
    fn same_seed_same_bids() {
        let obs = vec![[0.0; ArenaConfig::OBSERVATION_DIM]; 8];
        let a = RandomPolicy::new(19, 9).select_bids(&obs);
        let b = RandomPolicy::new(19, 9).select_bids(&obs);
        assert_eq!(a, b);
    }
}
