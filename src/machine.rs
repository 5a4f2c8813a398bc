//! Machine occupancy and per-tick contention pools.

use crate::types::{JobId, MachineId};

/// A machine shared by the jobs of an instance.
///
/// The occupant holds the machine until its operation is finished. The
/// contender list is rebuilt by the scheduler at the start of every tick and
/// cleared once the tick is resolved.
#[derive(Debug, Clone, Default)]
pub struct MachineResource {
    /// Machine index within the instance.
    pub(crate) id: MachineId,
    /// Job currently processing on this machine.
    pub(crate) occupant: Option<JobId>,
    /// Jobs waiting for this machine this tick, in ascending job order.
    pub(crate) contenders: Vec<JobId>,
    /// Total simulated time this machine has been occupied.
    pub(crate) busy_time: f64,
}

impl MachineResource {
    pub fn new(id: MachineId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        self.occupant = None;
        self.contenders.clear();
        self.busy_time = 0.0;
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn occupant(&self) -> Option<JobId> {
        self.occupant
    }

    /// Jobs contending this tick; empty between ticks.
    pub fn contenders(&self) -> &[JobId] {
        &self.contenders
    }

    pub fn busy_time(&self) -> f64 {
        self.busy_time
    }

    pub fn is_idle(&self) -> bool {
        self.occupant.is_none()
    }

    /// Puts `job` on the machine.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the machine is already occupied.
    pub(crate) fn occupy(&mut self, job: JobId) {
        debug_assert!(
            self.occupant.is_none(),
            "machine {} already occupied by {:?}",
            self.id,
            self.occupant
        );
        self.occupant = Some(job);
    }

    /// Frees the machine if `job` is its occupant.
    pub(crate) fn release(&mut self, job: JobId) {
        if self.occupant == Some(job) {
            self.occupant = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupy_and_release() {
        let mut m = MachineResource::new(2);
        assert!(m.is_idle());
        m.occupy(5);
        assert_eq!(m.occupant, Some(5));
        m.release(4);
        assert_eq!(m.occupant, Some(5));
        m.release(5);
        assert!(m.is_idle());
    }

    #[test]
    fn reset_clears_everything() {
        let mut m = MachineResource::new(0);
        m.occupy(1);
        m.contenders.push(3);
        m.busy_time = 4.0;
        m.reset();
        assert!(m.is_idle());
        assert!(m.contenders.is_empty());
        assert_eq!(m.busy_time, 0.0);
        assert_eq!(m.id, 0);
    }
}
