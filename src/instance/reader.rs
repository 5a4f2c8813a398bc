//! Reader for the line-oriented JSP instance format.
//!
//! ```text
//! # optional comment line
//! <job_count> <machine_count>
//! m d m d ...     (one row per job, machine_count pairs)
//! ```
//!
//! Machine ids are 0-based. Blank lines are ignored; rows past `job_count`
//! are ignored.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::{Instance, InstanceError};
use crate::types::Operation;

impl Instance {
    /// Loads an instance from a text file.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::Io`] if the file cannot be read, or any parse
    /// or validation error from [`parse_instance`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let instance = parse_instance(&text)?;
        log::info!(
            "loaded instance {} ({} jobs x {} machines)",
            path.display(),
            instance.job_count(),
            instance.machine_count()
        );
        Ok(instance)
    }
}

impl FromStr for Instance {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_instance(s)
    }
}

/// Parses an instance from its textual representation.
pub fn parse_instance(text: &str) -> Result<Instance, InstanceError> {
    // (1-based line number, trimmed content), blanks dropped
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .peekable();

    if lines.peek().is_some_and(|(_, first)| first.starts_with('#')) {
        lines.next();
    }

    let (header_line, header) = lines.next().ok_or(InstanceError::MissingHeader)?;
    let (job_count, machine_count) = parse_header(header_line, header)?;

    // header counts are untrusted until the rows are read
    let jobs = lines
        .take(job_count)
        .map(|(line, row)| parse_row(line, row, machine_count))
        .collect::<Result<Vec<_>, _>>()?;
    if jobs.len() < job_count {
        return Err(InstanceError::MissingJobRows {
            expected: job_count,
            found: jobs.len(),
        });
    }

    Instance::with_machine_count(machine_count, jobs)
}

fn parse_header(line: usize, header: &str) -> Result<(usize, usize), InstanceError> {
    let values: Vec<&str> = header.split_whitespace().collect();
    if values.len() < 2 {
        return Err(InstanceError::InvalidHeader {
            line,
            reason: format!("expected `<jobs> <machines>`, found `{}`", header),
        });
    }
    let parse = |token: &str| {
        token
            .parse::<usize>()
            .map_err(|_| InstanceError::InvalidHeader {
                line,
                reason: format!("`{}` is not a non-negative integer", token),
            })
    };
    Ok((parse(values[0])?, parse(values[1])?))
}

fn parse_row(line: usize, row: &str, machine_count: usize) -> Result<Vec<Operation>, InstanceError> {
    let values = row
        .split_whitespace()
        .map(|token| {
            token.parse::<u32>().map_err(|_| InstanceError::InvalidNumber {
                line,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() % 2 != 0 || values.len() / 2 != machine_count {
        return Err(InstanceError::WrongColumnCount {
            line,
            expected: machine_count,
            found: values.len(),
        });
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| Operation::new(pair[0] as usize, pair[1]))
        .collect())
}
