//! Core types shared by the arena: identifiers, operations, and job conditions.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a job (and of the agent controlling it) within an instance.
pub type JobId = usize;

/// Index of a machine within an instance.
pub type MachineId = usize;

/// A single processing step of a job: run on `machine` for `duration` time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Operation {
    pub machine: MachineId,
    pub duration: u32,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(machine: MachineId, duration: u32) -> Self {
        Self { machine, duration }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}:{}", self.machine, self.duration)
    }
}

/// Lifecycle state of a job agent.
///
/// Exactly one condition holds at any time:
/// - `Waiting`: contending for the machine of its next operation.
/// - `Processing`: occupying that machine and advancing progress.
/// - `Done`: every operation is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Condition {
    #[default]
    Waiting,
    Processing,
    Done,
}

impl Condition {
    /// Returns true unless the job is `Done`.
    pub fn is_live(&self) -> bool {
        !matches!(self, Condition::Done)
    }

    /// Single-character tag used by the text renderer.
    pub fn symbol(&self) -> char {
        match self {
            Condition::Waiting => 'W',
            Condition::Processing => 'P',
            Condition::Done => 'D',
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Waiting => write!(f, "waiting"),
            Condition::Processing => write!(f, "processing"),
            Condition::Done => write!(f, "done"),
        }
    }
}
