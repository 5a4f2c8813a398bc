//! Immutable job-shop instance model.
//!
//! An [`Instance`] is loaded once (from text via [`reader`], or built in code
//! with [`Instance::new`]) and then handed to each environment. It is never
//! mutated during an episode.

mod error;
pub mod reader;

pub use error::InstanceError;

use crate::types::{JobId, MachineId, Operation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A validated job-shop instance: `job_count` jobs, each visiting every one of
/// the `machine_count` machines exactly once in a job-specific order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawInstance"))]
pub struct Instance {
    machine_count: usize,
    jobs: Vec<Vec<Operation>>,
}

/// Unvalidated wire form of an [`Instance`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawInstance {
    machine_count: usize,
    jobs: Vec<Vec<Operation>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawInstance> for Instance {
    type Error = InstanceError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        Instance::with_machine_count(raw.machine_count, raw.jobs)
    }
}

impl Instance {
    /// Builds an instance from per-job operation sequences.
    ///
    /// The machine count is inferred from the length of the first job.
    ///
    /// # Errors
    ///
    /// Returns an [`InstanceError`] if the instance is empty, if any job does
    /// not visit every machine exactly once, or if a duration is zero.
    pub fn new(jobs: Vec<Vec<Operation>>) -> Result<Self, InstanceError> {
        let machine_count = jobs.first().map(Vec::len).unwrap_or(0);
        Self::with_machine_count(machine_count, jobs)
    }

    /// Builds an instance with an explicit machine count (as declared by a header).
    pub fn with_machine_count(
        machine_count: usize,
        jobs: Vec<Vec<Operation>>,
    ) -> Result<Self, InstanceError> {
        if jobs.is_empty() || machine_count == 0 {
            return Err(InstanceError::Empty);
        }

        for (job, ops) in jobs.iter().enumerate() {
            if ops.len() != machine_count {
                return Err(InstanceError::OperationCount {
                    job,
                    expected: machine_count,
                    found: ops.len(),
                });
            }
            let mut seen = vec![false; machine_count];
            for (position, op) in ops.iter().enumerate() {
                if op.machine >= machine_count {
                    return Err(InstanceError::MachineOutOfRange {
                        job,
                        machine: op.machine,
                        machine_count,
                    });
                }
                if seen[op.machine] {
                    return Err(InstanceError::DuplicateMachine {
                        job,
                        machine: op.machine,
                    });
                }
                seen[op.machine] = true;
                if op.duration == 0 {
                    return Err(InstanceError::ZeroDuration { job, position });
                }
            }
        }

        Ok(Self {
            machine_count,
            jobs,
        })
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn machine_count(&self) -> usize {
        self.machine_count
    }

    /// Returns the ordered operations of a job.
    pub fn operations(&self, job: JobId) -> &[Operation] {
        &self.jobs[job]
    }

    /// Iterates over all jobs as `(job_id, operations)`.
    pub fn jobs(&self) -> impl Iterator<Item = (JobId, &[Operation])> {
        self.jobs.iter().map(Vec::as_slice).enumerate()
    }

    /// Longest single operation duration in the instance.
    ///
    /// Used to normalise the contention-loss penalty into roughly `[-1, 0]`.
    pub fn longest_operation(&self) -> u32 {
        self.jobs
            .iter()
            .flatten()
            .map(|op| op.duration)
            .max()
            .unwrap_or(1)
    }

    /// Sum of all operation durations of a job.
    pub fn total_processing_time(&self, job: JobId) -> u64 {
        self.jobs[job].iter().map(|op| op.duration as u64).sum()
    }

    /// Total processing time demanded from a machine across all jobs.
    pub fn machine_load(&self, machine: MachineId) -> u64 {
        self.jobs
            .iter()
            .flatten()
            .filter(|op| op.machine == machine)
            .map(|op| op.duration as u64)
            .sum()
    }

    /// Trivial makespan lower bound: the longest job or the busiest machine.
    pub fn makespan_lower_bound(&self) -> u64 {
        let by_job = (0..self.job_count())
            .map(|j| self.total_processing_time(j))
            .max()
            .unwrap_or(0);
        let by_machine = (0..self.machine_count)
            .map(|m| self.machine_load(m))
            .max()
            .unwrap_or(0);
        by_job.max(by_machine)
    }
}
