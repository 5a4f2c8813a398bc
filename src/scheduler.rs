//! Simulation clock and tick scheduler.
//!
//! One tick runs the full contention cycle:
//! group → bid → resolve → settle → advance → release → check done.

use crate::agent::JobAgent;
use crate::bidding::{BiddingEngine, Resolution};
use crate::instance::Instance;
use crate::machine::MachineResource;
use crate::types::{Condition, JobId, MachineId};

/// What happened to a single job in the contention phase of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentionOutcome {
    /// The job did not contend (already processing or done).
    #[default]
    Idle,
    /// The job won its machine.
    Won,
    /// The job tied for the highest bid; nobody won.
    Tied,
    /// The job was outbid. `reference_duration` is the winner's operation
    /// duration (or the longest among the tied leaders).
    Outbid { reference_duration: u32 },
    /// The machine was occupied. `reference_duration` is the occupant's
    /// operation duration.
    Blocked { reference_duration: u32 },
}

/// An operation that finished during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    pub job: JobId,
    /// Index of the finished operation within the job.
    pub operation: usize,
    pub machine: MachineId,
    pub end_time: f64,
    /// True if this was the job's last operation.
    pub job_finished: bool,
}

/// Outcome of one scheduler tick.
#[derive(Debug, Clone)]
pub struct TickResult {
    /// Number of ticks run so far, including this one.
    pub cycle: u32,
    /// Clock value after the tick.
    pub time: f64,
    /// Per-machine resolution (`None` for machines nobody waited on).
    pub resolutions: Vec<Option<Resolution>>,
    /// `(machine, job)` pairs granted this tick.
    pub winners: Vec<(MachineId, JobId)>,
    /// Per-job contention outcome.
    pub outcomes: Vec<ContentionOutcome>,
    /// Accepted bid per job (0 for jobs that did not contend).
    pub accepted_bids: Vec<u32>,
    /// Operations completed this tick.
    pub completions: Vec<Completion>,
    /// Jobs whose stake reached zero this tick while still unfinished.
    pub exhausted: Vec<JobId>,
    /// Number of jobs already done before this tick.
    pub done_before: usize,
    /// Whether every job is done after this tick.
    pub done: bool,
}

impl TickResult {
    /// Number of machines whose top bid was tied this tick.
    pub fn tie_count(&self) -> usize {
        self.resolutions
            .iter()
            .flatten()
            .filter(|r| matches!(r, Resolution::Tied { .. }))
            .count()
    }

    /// True if `job` finished an operation this tick.
    pub fn completed(&self, job: JobId) -> bool {
        self.completions.iter().any(|c| c.job == job)
    }
}

/// Drives jobs and machines through discrete ticks.
///
/// The scheduler is the only component that changes job conditions or
/// machine occupancy.
#[derive(Debug, Clone)]
pub struct Scheduler {
    agents: Vec<JobAgent>,
    machines: Vec<MachineResource>,
    initial_stake: u32,
    time_delta: f64,
    now: f64,
    cycles: u32,
}

impl Scheduler {
    /// Creates a scheduler with one agent per job and one resource per machine.
    pub fn new(instance: &Instance, initial_stake: u32, time_delta: f64) -> Self {
        let agents = instance
            .jobs()
            .map(|(id, ops)| JobAgent::new(id, ops.to_vec(), initial_stake))
            .collect();
        let machines = (0..instance.machine_count())
            .map(MachineResource::new)
            .collect();
        Self {
            agents,
            machines,
            initial_stake,
            time_delta,
            now: 0.0,
            cycles: 0,
        }
    }

    /// Returns every agent and machine to its episode-start state.
    pub fn reset(&mut self) {
        for agent in &mut self.agents {
            agent.reset(self.initial_stake);
        }
        for machine in &mut self.machines {
            machine.reset();
        }
        self.now = 0.0;
        self.cycles = 0;
    }

    pub fn agents(&self) -> &[JobAgent] {
        &self.agents
    }

    pub fn machines(&self) -> &[MachineResource] {
        &self.machines
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn time_delta(&self) -> f64 {
        self.time_delta
    }

    pub fn done_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_done()).count()
    }

    pub fn is_done(&self) -> bool {
        self.agents.iter().all(JobAgent::is_done)
    }

    /// Largest completion time among finished jobs.
    pub fn makespan(&self) -> Option<f64> {
        self.agents
            .iter()
            .filter_map(JobAgent::completion_time)
            .reduce(f64::max)
    }

    /// Runs one tick with the given bids (indexed by job; missing entries bid 0).
    ///
    /// Bids of jobs that are not waiting are ignored.
    pub fn tick(&mut self, bids: &[i64]) -> TickResult {
        let n = self.agents.len();
        let done_before = self.done_count();
        let stake_before: Vec<u32> = self.agents.iter().map(|a| a.stake_balance).collect();

        // 1. Group waiting jobs by required machine
        for machine in &mut self.machines {
            machine.contenders.clear();
        }
        for agent in &self.agents {
            if agent.condition == Condition::Waiting {
                if let Some(m) = agent.required_machine() {
                    self.machines[m].contenders.push(agent.id);
                }
            }
        }

        // 2. Place bids
        let mut accepted_bids = vec![0u32; n];
        for agent in &mut self.agents {
            if agent.condition == Condition::Waiting {
                let bid = bids.get(agent.id).copied().unwrap_or(0);
                accepted_bids[agent.id] = agent.place_bid(bid);
            }
        }

        // 3. Resolve
        let resolutions = BiddingEngine::resolve(&self.machines, &accepted_bids);
        let winners = BiddingEngine::winners(&resolutions);
        let outcomes = self.classify(&resolutions);

        // 4. Settle stakes and seat winners
        for (machine, resolution) in resolutions.iter().enumerate() {
            let Some(resolution) = resolution else {
                continue;
            };
            if let Some(winner) = resolution.winner() {
                let agent = &mut self.agents[winner];
                agent.collect_bid();
                agent.start_processing(self.now);
                self.machines[machine].occupy(winner);
            }
            for job in resolution.non_winners() {
                let agent = &mut self.agents[job];
                agent.refund_bid();
                agent.record_wait();
            }
        }

        // 5. Advance occupants and release finished machines
        let mut completions = Vec::new();
        for agent in &mut self.agents {
            if agent.condition != Condition::Processing {
                continue;
            }
            let Some(machine) = agent.required_machine() else {
                continue;
            };
            let operation = agent.operation_index;
            self.machines[machine].busy_time += self.time_delta;
            if agent.advance(self.time_delta, self.now) {
                self.machines[machine].release(agent.id);
                completions.push(Completion {
                    job: agent.id,
                    operation,
                    machine,
                    end_time: self.now + self.time_delta,
                    job_finished: agent.is_done(),
                });
            }
        }

        for machine in &mut self.machines {
            machine.contenders.clear();
        }

        self.now += self.time_delta;
        self.cycles += 1;

        let exhausted = self
            .agents
            .iter()
            .filter(|a| stake_before[a.id] > 0 && a.stake_balance == 0 && !a.is_done())
            .map(|a| a.id)
            .collect();
        let done = self.is_done();

        log::debug!(
            "tick {} t={:.2}: winners={:?} completions={} done={}",
            self.cycles,
            self.now,
            winners,
            completions.len(),
            done
        );

        TickResult {
            cycle: self.cycles,
            time: self.now,
            resolutions,
            winners,
            outcomes,
            accepted_bids,
            completions,
            exhausted,
            done_before,
            done,
        }
    }

    /// A result describing a tick in which nothing happened.
    ///
    /// Returned for steps taken after the episode is already done; the clock
    /// does not move.
    pub fn idle_result(&self) -> TickResult {
        let n = self.agents.len();
        TickResult {
            cycle: self.cycles,
            time: self.now,
            resolutions: vec![None; self.machines.len()],
            winners: Vec::new(),
            outcomes: vec![ContentionOutcome::Idle; n],
            accepted_bids: vec![0; n],
            completions: Vec::new(),
            exhausted: Vec::new(),
            done_before: self.done_count(),
            done: self.is_done(),
        }
    }

    /// Derives each job's contention outcome from the tick's resolutions.
    ///
    /// Must run before winners are seated, while `next_op_duration` still
    /// reflects the contested operation.
    fn classify(&self, resolutions: &[Option<Resolution>]) -> Vec<ContentionOutcome> {
        let duration = |job: JobId| self.agents[job].next_op_duration();
        let mut outcomes = vec![ContentionOutcome::Idle; self.agents.len()];

        for resolution in resolutions.iter().flatten() {
            match resolution {
                Resolution::Won { winner, losers, .. } => {
                    outcomes[*winner] = ContentionOutcome::Won;
                    let reference_duration = duration(*winner);
                    for &job in losers {
                        outcomes[job] = ContentionOutcome::Outbid { reference_duration };
                    }
                }
                Resolution::Tied { tied, losers, .. } => {
                    for &job in tied {
                        outcomes[job] = ContentionOutcome::Tied;
                    }
                    let reference_duration = tied.iter().map(|&j| duration(j)).max().unwrap_or(0);
                    for &job in losers {
                        outcomes[job] = ContentionOutcome::Outbid { reference_duration };
                    }
                }
                Resolution::Blocked { occupant, waiting } => {
                    let reference_duration = duration(*occupant);
                    for &job in waiting {
                        outcomes[job] = ContentionOutcome::Blocked { reference_duration };
                    }
                }
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Operation;

    fn instance(jobs: &[&[(usize, u32)]]) -> Instance {
        Instance::new(
            jobs.iter()
                .map(|ops| ops.iter().map(|&(m, d)| Operation::new(m, d)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn single_job_completes_in_one_tick() {
        let inst = instance(&[&[(0, 1)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        let r = s.tick(&[3]);
        assert_eq!(r.winners, vec![(0, 0)]);
        assert_eq!(r.completions.len(), 1);
        assert!(r.completions[0].job_finished);
        assert!(r.done);
        assert_eq!(s.agents()[0].stake_balance, 17);
        assert_eq!(s.agents()[0].start_times, vec![0.0]);
        assert_eq!(s.agents()[0].end_times, vec![1.0]);
        assert!(s.machines()[0].is_idle());
    }

    #[test]
    fn tie_leaves_machine_idle_and_refunds() {
        let inst = instance(&[&[(0, 5)], &[(0, 3)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        let r = s.tick(&[10, 10]);
        assert!(r.winners.is_empty());
        assert_eq!(r.outcomes, vec![ContentionOutcome::Tied; 2]);
        assert_eq!(r.tie_count(), 1);
        assert!(s.machines()[0].is_idle());
        for a in s.agents() {
            assert_eq!(a.stake_balance, 20);
            assert_eq!(a.current_bet, 0);
            assert_eq!(a.wait_time, 1);
            assert_eq!(a.condition, Condition::Waiting);
        }
    }

    #[test]
    fn lower_bidders_on_tied_machine_reference_longest_leader() {
        let inst = instance(&[&[(0, 2)], &[(0, 6)], &[(0, 3)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        let r = s.tick(&[5, 5, 2]);
        assert!(r.winners.is_empty());
        assert_eq!(r.outcomes[0], ContentionOutcome::Tied);
        assert_eq!(r.outcomes[1], ContentionOutcome::Tied);
        assert_eq!(
            r.outcomes[2],
            ContentionOutcome::Outbid {
                reference_duration: 6
            }
        );
        assert!(s.agents().iter().all(|a| a.stake_balance == 20));
    }

    #[test]
    fn occupant_holds_machine_until_finished() {
        let inst = instance(&[&[(0, 3)], &[(0, 1)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);

        let r = s.tick(&[2, 1]);
        assert_eq!(r.winners, vec![(0, 0)]);
        assert_eq!(r.outcomes[1], ContentionOutcome::Outbid { reference_duration: 3 });

        // job 1 bids everything but cannot preempt
        let r = s.tick(&[0, 20]);
        assert!(r.winners.is_empty());
        assert_eq!(r.outcomes[1], ContentionOutcome::Blocked { reference_duration: 3 });
        assert_eq!(s.agents()[1].stake_balance, 20);

        let r = s.tick(&[0, 0]);
        assert_eq!(r.completions.len(), 1);
        assert_eq!(r.completions[0].job, 0);
        assert!(s.machines()[0].is_idle());

        // freed machine is contested from the next tick on
        let r = s.tick(&[0, 0]);
        assert_eq!(r.winners, vec![(0, 1)]);
        assert!(r.done);
        assert_eq!(s.makespan(), Some(4.0));
    }

    #[test]
    fn finished_operation_moves_to_next_machine() {
        let inst = instance(&[&[(1, 1), (0, 2)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        s.tick(&[0]);
        let a = &s.agents()[0];
        assert_eq!(a.operation_index, 1);
        assert_eq!(a.condition, Condition::Waiting);
        assert_eq!(a.required_machine(), Some(0));
        assert!(s.machines()[1].is_idle());
    }

    #[test]
    fn bids_of_processing_jobs_are_ignored() {
        let inst = instance(&[&[(0, 2)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        s.tick(&[4]);
        let r = s.tick(&[9]);
        assert_eq!(r.accepted_bids, vec![0]);
        assert_eq!(s.agents()[0].stake_balance, 16);
    }

    #[test]
    fn all_in_win_reports_exhaustion() {
        let inst = instance(&[&[(0, 1), (1, 1)], &[(1, 1), (0, 1)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        let r = s.tick(&[20, 5]);
        assert_eq!(r.exhausted, vec![0]);
    }

    #[test]
    fn independent_machines_resolve_in_same_tick() {
        let inst = instance(&[&[(0, 1), (1, 1)], &[(1, 1), (0, 1)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        let r = s.tick(&[1, 1]);
        assert_eq!(r.winners, vec![(0, 0), (1, 1)]);
        assert_eq!(r.completions.len(), 2);
    }

    #[test]
    fn reset_restores_clock_and_state() {
        let inst = instance(&[&[(0, 1)]]);
        let mut s = Scheduler::new(&inst, 20, 1.0);
        s.tick(&[3]);
        s.reset();
        assert_eq!(s.now(), 0.0);
        assert_eq!(s.cycles(), 0);
        assert!(!s.is_done());
        assert_eq!(s.agents()[0].stake_balance, 20);
    }
}
