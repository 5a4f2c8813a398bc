//! Job agent state and per-tick dynamics.

use crate::types::{Condition, JobId, MachineId, Operation};

/// Tolerance when deciding that accumulated processing time covers an operation.
const COMPLETION_EPS: f64 = 1e-9;

/// State of a single job agent during an episode.
///
/// Each agent owns a copy of its job's operation sequence, its bidding
/// currency, and its progress through the current operation. Condition
/// transitions are driven by the [`Scheduler`](crate::scheduler::Scheduler);
/// outside the crate the state is read through accessors.
#[derive(Debug, Clone)]
pub struct JobAgent {
    /// Job index within the instance.
    pub(crate) id: JobId,
    operations: Vec<Operation>,
    /// Next operation to perform (0-based).
    pub(crate) operation_index: usize,
    /// Remaining currency available for bidding.
    pub(crate) stake_balance: u32,
    /// Amount wagered this tick (0 outside resolution).
    pub(crate) current_bet: u32,
    /// Currency paid for contentions this job has won.
    pub(crate) stake_spent: u32,
    /// Waiting, processing, or done.
    pub(crate) condition: Condition,
    /// Ticks spent waiting for the current operation.
    pub(crate) wait_time: u32,
    /// Start time of each operation begun so far.
    pub(crate) start_times: Vec<f64>,
    /// End time of each operation completed so far.
    pub(crate) end_times: Vec<f64>,
    /// Processing time accumulated on the current operation.
    elapsed: f64,
}

impl JobAgent {
    /// Creates a new agent at the start of its first operation.
    pub fn new(id: JobId, operations: Vec<Operation>, initial_stake: u32) -> Self {
        let mut agent = Self {
            id,
            operations,
            operation_index: 0,
            stake_balance: initial_stake,
            current_bet: 0,
            stake_spent: 0,
            condition: Condition::Waiting,
            wait_time: 0,
            start_times: Vec::new(),
            end_times: Vec::new(),
            elapsed: 0.0,
        };
        agent.reset(initial_stake);
        agent
    }

    /// Restores the agent to the beginning of an episode.
    pub fn reset(&mut self, initial_stake: u32) {
        self.operation_index = 0;
        self.stake_balance = initial_stake;
        self.current_bet = 0;
        self.stake_spent = 0;
        self.condition = if self.operations.is_empty() {
            Condition::Done
        } else {
            Condition::Waiting
        };
        self.wait_time = 0;
        self.start_times.clear();
        self.end_times.clear();
        self.elapsed = 0.0;
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Index of the next operation to perform (0-based).
    pub fn operation_index(&self) -> usize {
        self.operation_index
    }

    pub fn stake_balance(&self) -> u32 {
        self.stake_balance
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn stake_spent(&self) -> u32 {
        self.stake_spent
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn wait_time(&self) -> u32 {
        self.wait_time
    }

    pub fn start_times(&self) -> &[f64] {
        &self.start_times
    }

    pub fn end_times(&self) -> &[f64] {
        &self.end_times
    }

    /// The operation currently waited on or processed, `None` once done.
    pub fn current_operation(&self) -> Option<&Operation> {
        self.operations.get(self.operation_index)
    }

    /// Machine required by the current operation.
    pub fn required_machine(&self) -> Option<MachineId> {
        self.current_operation().map(|op| op.machine)
    }

    /// Duration of the current operation, or 0 once done.
    pub fn next_op_duration(&self) -> u32 {
        self.current_operation().map(|op| op.duration).unwrap_or(0)
    }

    /// Completion fraction of the current operation, in `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        match self.current_operation() {
            Some(op) => (self.elapsed / op.duration as f64).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.condition == Condition::Done
    }

    /// Places a bid, clamped to `[0, stake_balance]`, and returns the accepted amount.
    ///
    /// The accepted amount leaves the balance and is held in `current_bet`
    /// until the bid is refunded or collected. A bid of 0 is a pass.
    pub fn place_bid(&mut self, amount: i64) -> u32 {
        self.refund_bid();
        let accepted = amount.clamp(0, self.stake_balance as i64) as u32;
        self.stake_balance -= accepted;
        self.current_bet = accepted;
        accepted
    }

    /// Returns the held bid to the balance.
    pub fn refund_bid(&mut self) {
        self.stake_balance += self.current_bet;
        self.current_bet = 0;
    }

    /// Spends the held bid (the job won its contention).
    pub fn collect_bid(&mut self) {
        self.stake_spent += self.current_bet;
        self.current_bet = 0;
    }

    /// Counts one more tick spent waiting.
    pub(crate) fn record_wait(&mut self) {
        self.wait_time += 1;
    }

    /// Moves a waiting job onto its machine at time `now`.
    pub(crate) fn start_processing(&mut self, now: f64) {
        debug_assert_eq!(self.condition, Condition::Waiting);
        self.condition = Condition::Processing;
        self.start_times.push(now);
    }

    /// Advances the current operation by `time_delta`, starting at time `now`.
    ///
    /// Returns true if the operation completed. On completion the end time is
    /// recorded, the operation index advances, progress and wait time reset,
    /// and the job becomes `Waiting` for its next machine or `Done`.
    pub(crate) fn advance(&mut self, time_delta: f64, now: f64) -> bool {
        let Some(duration) = self.current_operation().map(|op| op.duration as f64) else {
            return false;
        };
        if self.condition != Condition::Processing {
            return false;
        }

        self.elapsed += time_delta;
        if self.elapsed + COMPLETION_EPS < duration {
            return false;
        }

        self.end_times.push(now + time_delta);
        self.operation_index += 1;
        self.elapsed = 0.0;
        self.wait_time = 0;
        self.condition = if self.operation_index == self.operations.len() {
            Condition::Done
        } else {
            Condition::Waiting
        };
        true
    }

    /// Completion time of the job's last operation, once done.
    pub fn completion_time(&self) -> Option<f64> {
        if self.is_done() {
            self.end_times.last().copied()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(durations: &[u32]) -> JobAgent {
        let ops = durations
            .iter()
            .enumerate()
            .map(|(m, &d)| Operation::new(m, d))
            .collect();
        JobAgent::new(0, ops, 20)
    }

    #[test]
    fn new_agent_waits_on_first_operation() {
        let a = agent(&[3, 2]);
        assert_eq!(a.condition, Condition::Waiting);
        assert_eq!(a.required_machine(), Some(0));
        assert_eq!(a.next_op_duration(), 3);
        assert_eq!(a.progress_fraction(), 0.0);
    }

    #[test]
    fn bid_is_clamped_to_balance() {
        let mut a = agent(&[1]);
        assert_eq!(a.place_bid(25), 20);
        assert_eq!(a.stake_balance, 0);
        assert_eq!(a.current_bet, 20);
    }

    #[test]
    fn negative_bid_is_a_pass() {
        let mut a = agent(&[1]);
        assert_eq!(a.place_bid(-4), 0);
        assert_eq!(a.stake_balance, 20);
    }

    #[test]
    fn refund_restores_balance_exactly() {
        let mut a = agent(&[1]);
        a.place_bid(7);
        assert_eq!(a.stake_balance + a.current_bet, 20);
        a.refund_bid();
        assert_eq!(a.stake_balance, 20);
        assert_eq!(a.current_bet, 0);
    }

    #[test]
    fn collect_moves_bet_to_spent() {
        let mut a = agent(&[1]);
        a.place_bid(7);
        a.collect_bid();
        assert_eq!(a.stake_balance, 13);
        assert_eq!(a.stake_spent, 7);
        assert_eq!(a.current_bet, 0);
    }

    #[test]
    fn advance_completes_after_duration() {
        let mut a = agent(&[3, 2]);
        a.start_processing(0.0);
        assert!(!a.advance(1.0, 0.0));
        assert!((a.progress_fraction() - 1.0 / 3.0).abs() < 1e-12);
        assert!(!a.advance(1.0, 1.0));
        assert!(a.advance(1.0, 2.0));
        assert_eq!(a.operation_index, 1);
        assert_eq!(a.condition, Condition::Waiting);
        assert_eq!(a.progress_fraction(), 0.0);
        assert_eq!(a.end_times, vec![3.0]);
    }

    #[test]
    fn fractional_steps_do_not_stall() {
        let mut a = agent(&[1]);
        a.start_processing(0.0);
        let mut ticks = 0;
        while !a.advance(0.1, ticks as f64 * 0.1) {
            ticks += 1;
            assert!(ticks < 20);
        }
        assert_eq!(ticks, 9);
        assert!(a.is_done());
    }

    #[test]
    fn last_operation_marks_done() {
        let mut a = agent(&[1]);
        a.start_processing(4.0);
        assert!(a.advance(1.0, 4.0));
        assert!(a.is_done());
        assert_eq!(a.current_operation(), None);
        assert_eq!(a.next_op_duration(), 0);
        assert_eq!(a.completion_time(), Some(5.0));
    }

    #[test]
    fn waiting_agent_does_not_advance() {
        let mut a = agent(&[1]);
        assert!(!a.advance(1.0, 0.0));
        assert_eq!(a.progress_fraction(), 0.0);
    }

    #[test]
    fn wait_time_resets_with_operation() {
        let mut a = agent(&[1, 1]);
        a.record_wait();
        a.record_wait();
        assert_eq!(a.wait_time, 2);
        a.start_processing(2.0);
        a.advance(1.0, 2.0);
        assert_eq!(a.wait_time, 0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut a = agent(&[1]);
        a.place_bid(5);
        a.collect_bid();
        a.start_processing(0.0);
        a.advance(1.0, 0.0);
        a.reset(20);
        assert_eq!(a.stake_balance, 20);
        assert_eq!(a.stake_spent, 0);
        assert_eq!(a.operation_index, 0);
        assert_eq!(a.condition, Condition::Waiting);
        assert!(a.start_times.is_empty());
        assert!(a.end_times.is_empty());
    }
}
