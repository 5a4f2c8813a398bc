//! Sealed-bid resolution of machine contention.
//!
//! All bids for a tick are placed before any machine is resolved, and every
//! machine is resolved from the same snapshot. Resolution itself is pure: it
//! reads contenders and accepted bids and reports who won, who tied, and who
//! lost. Refunds and stake collection are applied afterwards by the
//! [`Scheduler`](crate::scheduler::Scheduler).

use crate::machine::MachineResource;
use crate::types::{JobId, MachineId};

/// How contention on one machine was settled this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A single contender placed the strictly highest bid.
    Won {
        winner: JobId,
        bid: u32,
        losers: Vec<JobId>,
    },
    /// Two or more contenders share the highest bid; nobody gets the machine.
    Tied {
        tied: Vec<JobId>,
        bid: u32,
        losers: Vec<JobId>,
    },
    /// The machine is still held by its occupant; every contender keeps waiting.
    Blocked { occupant: JobId, waiting: Vec<JobId> },
}

impl Resolution {
    /// The job granted the machine, if any.
    pub fn winner(&self) -> Option<JobId> {
        match self {
            Resolution::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// Contenders that do not get the machine this tick (tied, outbid, or blocked).
    pub fn non_winners(&self) -> Vec<JobId> {
        match self {
            Resolution::Won { losers, .. } => losers.clone(),
            Resolution::Tied { tied, losers, .. } => tied.iter().chain(losers).copied().collect(),
            Resolution::Blocked { waiting, .. } => waiting.clone(),
        }
    }
}

/// Resolves simultaneous bids into at most one winner per machine.
pub struct BiddingEngine;

impl BiddingEngine {
    /// Resolves every machine's contention for one tick.
    ///
    /// # Arguments
    ///
    /// * `machines` - Machines with their `contenders` filled in for this tick
    /// * `bids` - Accepted bid per job, indexed by job id
    ///
    /// # Returns
    ///
    /// One entry per machine, `None` when the machine had no contenders.
    ///
    /// # Rules
    ///
    /// - The contender with the strictly highest bid wins, even with a bid of 0
    ///   when uncontested.
    /// - A tie for the highest bid is a non-win for every tied contender.
    /// - Contenders for an occupied machine are blocked; occupants are never
    ///   preempted.
    pub fn resolve(machines: &[MachineResource], bids: &[u32]) -> Vec<Option<Resolution>> {
        machines
            .iter()
            .map(|m| Self::resolve_machine(m, bids))
            .collect()
    }

    /// Resolves a single machine.
    pub fn resolve_machine(machine: &MachineResource, bids: &[u32]) -> Option<Resolution> {
        if machine.contenders.is_empty() {
            return None;
        }

        if let Some(occupant) = machine.occupant {
            return Some(Resolution::Blocked {
                occupant,
                waiting: machine.contenders.clone(),
            });
        }

        let top = machine.contenders.iter().map(|&j| bids[j]).max()?;
        let (leaders, losers): (Vec<JobId>, Vec<JobId>) = machine
            .contenders
            .iter()
            .partition(|&&j| bids[j] == top);

        let resolution = if let [winner] = leaders[..] {
            Resolution::Won {
                winner,
                bid: top,
                losers,
            }
        } else {
            Resolution::Tied {
                tied: leaders,
                bid: top,
                losers,
            }
        };
        Some(resolution)
    }

    /// Collects `(machine, winner)` pairs from a tick's resolutions.
    pub fn winners(resolutions: &[Option<Resolution>]) -> Vec<(MachineId, JobId)> {
        resolutions
            .iter()
            .enumerate()
            .filter_map(|(m, r)| r.as_ref()?.winner().map(|j| (m, j)))
            .collect()
    }
}
