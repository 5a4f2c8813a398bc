use thiserror::Error;

use crate::types::JobId;

/// Caller contract violations reported by the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Environment must be reset before it can be stepped or observed")]
    NotReset,

    #[error("Expected one bid per job ({expected}), got {found}")]
    BidCountMismatch { expected: usize, found: usize },

    #[error("Unknown job {job}: instance has {job_count} jobs")]
    UnknownJob { job: JobId, job_count: usize },

    #[error("Invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
