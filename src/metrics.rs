//! Evaluation metrics for bidding policies.
//!
//! Runs a policy for a number of episodes and aggregates schedule quality
//! and contention statistics.

use std::fmt;

use crate::environment::{EnvError, JspEnvironment};
use crate::policy::Policy;

/// Step cap applied during evaluation when the environment has none.
///
/// Two broke jobs bidding 0 on the same machine tie forever, so an
/// evaluation run always needs a cap.
pub const DEFAULT_EVALUATION_CAP: u32 = 10_000;

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    /// Mean makespan over completed episodes.
    pub mean_makespan: f64,
    /// Mean of makespan / makespan lower bound over completed episodes.
    pub mean_makespan_ratio: f64,
    /// Mean summed reward over all jobs per episode.
    pub mean_episode_return: f64,
    /// Mean number of tied machines per episode.
    pub mean_ties: f64,
    /// Mean number of ticks per episode.
    pub mean_cycles: f64,
    /// Percentage of episodes in which every job finished.
    pub pct_completed: f64,
    /// Number of episodes evaluated.
    pub n_episodes: usize,
}

/// Tracks per-episode statistics during evaluation.
#[derive(Debug, Default)]
struct EpisodeStats {
    makespan: Option<f64>,
    episode_return: f64,
    ties: usize,
    cycles: u32,
}

impl EvaluationMetrics {
    /// Evaluates a policy over multiple episodes and returns aggregated metrics.
    ///
    /// Episode `k` is reset with seed `base_seed + k`.
    ///
    /// # Arguments
    ///
    /// * `env` - The environment to evaluate in
    /// * `policy` - The policy choosing bids
    /// * `n_episodes` - Number of episodes to run
    /// * `base_seed` - Seed of the first episode
    pub fn evaluate(
        env: &mut JspEnvironment,
        policy: &mut dyn Policy,
        n_episodes: usize,
        base_seed: u64,
    ) -> Result<Self, EnvError> {
        let cap = env.config().max_cycles.unwrap_or(DEFAULT_EVALUATION_CAP);
        let mut all_stats = Vec::with_capacity(n_episodes);

        for k in 0..n_episodes {
            let mut obs = env.reset(base_seed + k as u64);
            let mut stats = EpisodeStats::default();

            loop {
                let bids = policy.select_bids(&obs);
                let result = env.step(&bids)?;

                stats.ties += result.info.tie_count();
                stats.episode_return += result.rewards.iter().sum::<f64>();
                obs = result.observations;

                if result.done || result.truncated || env.cycles() >= cap {
                    break;
                }
            }

            stats.cycles = env.cycles();
            stats.makespan = env.makespan();
            log::debug!(
                "episode {} ({}): {} cycles, makespan {:?}",
                k,
                policy.name(),
                stats.cycles,
                stats.makespan
            );
            all_stats.push(stats);
        }

        let n = all_stats.len().max(1) as f64;
        let lower_bound = env.instance().makespan_lower_bound().max(1) as f64;
        let makespans: Vec<f64> = all_stats.iter().filter_map(|s| s.makespan).collect();
        let completed = makespans.len() as f64;
        let mean_makespan = if makespans.is_empty() {
            0.0
        } else {
            makespans.iter().sum::<f64>() / completed
        };

        Ok(Self {
            mean_makespan,
            mean_makespan_ratio: mean_makespan / lower_bound,
            mean_episode_return: all_stats.iter().map(|s| s.episode_return).sum::<f64>() / n,
            mean_ties: all_stats.iter().map(|s| s.ties as f64).sum::<f64>() / n,
            mean_cycles: all_stats.iter().map(|s| s.cycles as f64).sum::<f64>() / n,
            pct_completed: completed / n * 100.0,
            n_episodes,
        })
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(f, "  Mean makespan:           {:.2}", self.mean_makespan)?;
        writeln!(
            f,
            "  Makespan / lower bound:  {:.3}",
            self.mean_makespan_ratio
        )?;
        writeln!(
            f,
            "  Mean episode return:     {:.2}",
            self.mean_episode_return
        )?;
        writeln!(f, "  Mean ties:               {:.1}", self.mean_ties)?;
        writeln!(f, "  Mean cycles:             {:.1}", self.mean_cycles)?;
        writeln!(f, "  % completed:             {:.1}%", self.pct_completed)
    }
}
