//! Text rendering of the arena.
//!
//! A [`Frame`] is a presentation snapshot taken from the scheduler. The
//! simulation never reads frames back; they exist only to be displayed.

use std::fmt;

use crate::scheduler::Scheduler;
use crate::types::{Condition, JobId, MachineId};

/// Width of the per-job progress bar.
const BAR_WIDTH: usize = 20;

/// Presentation view of one job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub id: JobId,
    pub condition: Condition,
    pub operation_index: usize,
    pub operation_count: usize,
    pub machine: Option<MachineId>,
    pub progress: f64,
    pub stake: u32,
    pub wait_time: u32,
}

/// Presentation view of one machine.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineView {
    pub id: MachineId,
    pub occupant: Option<JobId>,
    /// Fraction of elapsed time this machine has been busy.
    pub utilization: f64,
}

/// Snapshot of the arena for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub cycle: u32,
    pub time: f64,
    pub jobs: Vec<JobView>,
    pub machines: Vec<MachineView>,
}

impl Frame {
    /// Captures the current scheduler state.
    pub fn capture(scheduler: &Scheduler) -> Self {
        let time = scheduler.now();
        let jobs = scheduler
            .agents()
            .iter()
            .map(|a| JobView {
                id: a.id,
                condition: a.condition,
                operation_index: a.operation_index,
                operation_count: a.operations().len(),
                machine: a.required_machine(),
                progress: a.progress_fraction(),
                stake: a.stake_balance,
                wait_time: a.wait_time,
            })
            .collect();
        let machines = scheduler
            .machines()
            .iter()
            .map(|m| MachineView {
                id: m.id,
                occupant: m.occupant,
                utilization: if time > 0.0 { m.busy_time / time } else { 0.0 },
            })
            .collect();
        Self {
            cycle: scheduler.cycles(),
            time,
            jobs,
            machines,
        }
    }
}

fn progress_bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== cycle {} | t = {:.2} ===", self.cycle, self.time)?;
        for m in &self.machines {
            match m.occupant {
                Some(job) => writeln!(
                    f,
                    "  M{:<3} <- J{:<3} util {:>5.1}%",
                    m.id,
                    job,
                    m.utilization * 100.0
                )?,
                None => writeln!(
                    f,
                    "  M{:<3}    idle  util {:>5.1}%",
                    m.id,
                    m.utilization * 100.0
                )?,
            }
        }
        for j in &self.jobs {
            let machine = j
                .machine
                .map(|m| format!("M{}", m))
                .unwrap_or_else(|| "--".to_string());
            writeln!(
                f,
                "  J{:<3} [{}] {:>4} op {}/{} [{}] stake {:>3} wait {}",
                j.id,
                j.condition.symbol(),
                machine,
                j.operation_index,
                j.operation_count,
                progress_bar(j.progress),
                j.stake,
                j.wait_time
            )?;
        }
        Ok(())
    }
}
