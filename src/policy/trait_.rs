//! Policy trait for the bidding environment.

use crate::observation::Observation;

/// A policy that chooses every job's bid for a tick.
///
/// Bids are stake amounts; the environment clamps them to each job's balance
/// and ignores bids from jobs that are not waiting.
pub trait Policy: Send + Sync {
    /// Selects one bid per job given their observations.
    ///
    /// # Arguments
    ///
    /// * `observations` - Per-job observation vectors (from [`ObservationBuilder`](crate::observation::ObservationBuilder)), indexed by job id
    ///
    /// # Returns
    ///
    /// A vector of bids, one per job.
    fn select_bids(&mut self, observations: &[Observation]) -> Vec<i64>;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
