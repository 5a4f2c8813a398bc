//! Job-shop bidding environment.
//!
//! Wraps the scheduler, reward function, and observation encoder behind the
//! `reset` / `step` / `observe` / `render` surface a multi-agent training
//! loop expects. Stepping is batch-synchronous: every call carries one bid
//! per job and resolves a full tick.

mod error;


pub use error::EnvError;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::JobAgent;
use crate::config::ArenaConfig;
use crate::instance::Instance;
use crate::machine::MachineResource;
use crate::observation::{Observation, ObservationBuilder};
use crate::render::Frame;
use crate::reward::RewardComputer;
use crate::scheduler::{Scheduler, TickResult};
use crate::types::{JobId, MachineId};

/// Result of a single environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Per-job observations after the step.
    pub observations: Vec<Observation>,
    /// Per-job rewards for this step.
    pub rewards: Vec<f64>,
    /// Per-job done flags.
    pub dones: Vec<bool>,
    /// Whether every job is done.
    pub done: bool,
    /// Whether the configured step cap was hit before the episode finished.
    pub truncated: bool,
    /// Full tick outcome: winners, ties, completions.
    pub info: TickResult,
}

/// A scheduled (or in-progress) operation, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledOperation {
    pub job: JobId,
    pub operation: usize,
    pub machine: MachineId,
    pub start: f64,
    /// `None` while the operation is still processing.
    pub end: Option<f64>,
}

/// The competitive job-shop environment.
///
/// # Lifecycle
///
/// 1. Load an [`Instance`] and call [`JspEnvironment::new`].
/// 2. Call [`JspEnvironment::reset`] with a seed to start an episode.
/// 3. Call [`JspEnvironment::step`] with one bid per job until `done`.
#[derive(Debug)]
pub struct JspEnvironment {
    config: ArenaConfig,
    instance: Instance,
    scheduler: Scheduler,
    longest_operation: u32,
    rng: StdRng,
    seed: u64,
    ready: bool,
    cumulative_rewards: Vec<f64>,
}

impl JspEnvironment {
    /// Creates an environment for `instance`. Call [`reset`](Self::reset) before stepping.
    ///
    /// The configuration is fixed for the lifetime of the environment.
    ///
    /// # Errors
    ///
    /// [`EnvError::InvalidConfig`] if `time_delta` is not a positive finite
    /// number or a reward constant is not finite.
    pub fn new(instance: Instance, config: ArenaConfig) -> Result<Self, EnvError> {
        config.validate()?;
        let scheduler = Scheduler::new(&instance, config.initial_stake, config.time_delta);
        let longest_operation = instance.longest_operation();
        let n = instance.job_count();
        Ok(Self {
            config,
            instance,
            scheduler,
            longest_operation,
            rng: StdRng::seed_from_u64(0),
            seed: 0,
            ready: false,
            cumulative_rewards: vec![0.0; n],
        })
    }

    /// Starts a new episode and returns the initial observations.
    ///
    /// Every job returns to its first operation with a full stake, every
    /// machine is freed, and the clock restarts at zero. The seed only feeds
    /// [`sample_bids`](Self::sample_bids); the initial state itself is
    /// identical for every seed.
    pub fn reset(&mut self, seed: u64) -> Vec<Observation> {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.scheduler.reset();
        self.cumulative_rewards.iter_mut().for_each(|r| *r = 0.0);
        self.ready = true;

        log::info!(
            "reset episode (seed {}): {} jobs x {} machines",
            seed,
            self.instance.job_count(),
            self.instance.machine_count()
        );

        ObservationBuilder::build_all(self.scheduler.agents())
    }

    /// Runs one tick with one bid per job.
    ///
    /// Bids from jobs that are not waiting are ignored; negative bids count
    /// as 0 and bids above a job's stake are clamped. Once the episode is
    /// done, further steps change nothing and return zero rewards.
    ///
    /// # Errors
    ///
    /// - [`EnvError::NotReset`] if [`reset`](Self::reset) was never called.
    /// - [`EnvError::BidCountMismatch`] if `bids.len()` differs from the job count.
    pub fn step(&mut self, bids: &[i64]) -> Result<StepResult, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReset);
        }
        let n = self.n_jobs();
        if bids.len() != n {
            return Err(EnvError::BidCountMismatch {
                expected: n,
                found: bids.len(),
            });
        }

        let (info, rewards) = if self.scheduler.is_done() {
            (self.scheduler.idle_result(), vec![0.0; n])
        } else {
            let info = self.scheduler.tick(bids);
            let rewards =
                RewardComputer::compute_all(&info, n, self.longest_operation, &self.config);
            (info, rewards)
        };

        for (total, r) in self.cumulative_rewards.iter_mut().zip(&rewards) {
            *total += r;
        }

        let done = info.done;
        let truncated = !done
            && self
                .config
                .max_cycles
                .is_some_and(|cap| self.scheduler.cycles() >= cap);

        if done {
            log::info!(
                "episode finished after {} cycles, makespan {:.2}",
                self.scheduler.cycles(),
                self.scheduler.makespan().unwrap_or(0.0)
            );
        } else if truncated {
            log::warn!(
                "episode truncated at {} cycles with {}/{} jobs done",
                self.scheduler.cycles(),
                self.scheduler.done_count(),
                n
            );
        }

        Ok(StepResult {
            observations: ObservationBuilder::build_all(self.scheduler.agents()),
            rewards,
            dones: self.scheduler.agents().iter().map(JobAgent::is_done).collect(),
            done,
            truncated,
            info,
        })
    }

    /// Returns the current observation of one job.
    ///
    /// # Errors
    ///
    /// [`EnvError::NotReset`] before the first reset, [`EnvError::UnknownJob`]
    /// for an out-of-range job id.
    pub fn observe(&self, job: JobId) -> Result<Observation, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReset);
        }
        if job >= self.n_jobs() {
            return Err(EnvError::UnknownJob {
                job,
                job_count: self.n_jobs(),
            });
        }
        Ok(ObservationBuilder::build(job, self.scheduler.agents()))
    }

    /// Prints the current frame to stdout.
    pub fn render(&self) {
        println!("{}", self.frame());
    }

    /// Snapshot of the current state for display.
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.scheduler)
    }

    /// Draws one uniformly random bid in `0..=max_bid` per job from the
    /// episode's seeded generator.
    pub fn sample_bids(&mut self) -> Vec<i64> {
        let max_bid = self.config.max_bid as i64;
        (0..self.n_jobs())
            .map(|_| self.rng.gen_range(0..=max_bid))
            .collect()
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Returns the number of jobs (agents).
    pub fn n_jobs(&self) -> usize {
        self.instance.job_count()
    }

    pub fn agents(&self) -> &[JobAgent] {
        self.scheduler.agents()
    }

    pub fn machines(&self) -> &[MachineResource] {
        self.scheduler.machines()
    }

    pub fn is_done(&self) -> bool {
        self.ready && self.scheduler.is_done()
    }

    /// Simulated time elapsed this episode.
    pub fn time(&self) -> f64 {
        self.scheduler.now()
    }

    /// Ticks run this episode.
    pub fn cycles(&self) -> u32 {
        self.scheduler.cycles()
    }

    /// Seed passed to the last reset.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sum of rewards per job since the last reset.
    pub fn cumulative_rewards(&self) -> &[f64] {
        &self.cumulative_rewards
    }

    /// Completion time of the last job, once every job is done.
    pub fn makespan(&self) -> Option<f64> {
        if self.is_done() {
            self.scheduler.makespan()
        } else {
            None
        }
    }

    /// Every operation started so far, ordered by job then operation.
    pub fn schedule(&self) -> Vec<ScheduledOperation> {
        self.scheduler
            .agents()
            .iter()
            .flat_map(|a| {
                a.start_times
                    .iter()
                    .enumerate()
                    .map(move |(op, &start)| ScheduledOperation {
                        job: a.id,
                        operation: op,
                        machine: a.operations()[op].machine,
                        start,
                        end: a.end_times.get(op).copied(),
                    })
            })
            .collect()
    }
}
