use std::path::PathBuf;

use thiserror::Error;

use crate::types::{JobId, MachineId};

/// Errors raised while loading or validating a job-shop instance.
///
/// All of them are fatal: an instance that fails to load never reaches an
/// environment.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("Failed to read instance file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Instance is missing the `<jobs> <machines>` header line")]
    MissingHeader,

    #[error("Invalid header on line {line}: {reason}")]
    InvalidHeader { line: usize, reason: String },

    #[error("Invalid integer `{token}` on line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("Line {line} has {found} values, expected {expected} (machine, duration) entries")]
    WrongColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Instance declares {expected} jobs but only {found} rows were found")]
    MissingJobRows { expected: usize, found: usize },

    #[error("Instance must have at least one job and one machine")]
    Empty,

    #[error("Job {job} has {found} operations, expected one per machine ({expected})")]
    OperationCount {
        job: JobId,
        expected: usize,
        found: usize,
    },

    #[error("Job {job} references machine {machine}, but the instance has {machine_count} machines")]
    MachineOutOfRange {
        job: JobId,
        machine: MachineId,
        machine_count: usize,
    },

    #[error("Job {job} visits machine {machine} more than once")]
    DuplicateMachine { job: JobId, machine: MachineId },

    #[error("Job {job} has a zero-duration operation at position {position}")]
    ZeroDuration { job: JobId, position: usize },
}
