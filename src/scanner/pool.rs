//! Fixed-capacity pool of probe slots.

use crate::scanner::probe::{Probe, ProbeState};

/// Hard upper bound on pool capacity.
pub const MAX_PROBES: usize = 1024;

/// Owned, indexed collection of probes. Its capacity bounds how many
/// connection attempts can be in flight at once.
///
/// The scheduler is the only driver, so this is a plain vector with no
/// synchronization.
#[derive(Debug)]
pub struct ProbePool<S> {
    slots: Vec<Probe<S>>,
}

impl<S> ProbePool<S> {
    /// Create a pool of `capacity` idle probes, capped at [`MAX_PROBES`].
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_PROBES);
        Self {
            slots: (0..capacity).map(|_| Probe::new()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Probe<S>> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Probe<S>> {
        self.slots.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Probe<S>> {
        self.slots.get(index)
    }

    pub fn idle_count(&self) -> usize {
        self.slots.iter().filter(|p| p.is_idle()).count()
    }

    pub fn connecting_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|p| p.state() == ProbeState::Connecting)
            .count()
    }

    /// True when no slot owns a connection.
    pub fn is_quiescent(&self) -> bool {
        self.slots.iter().all(Probe::is_idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::probe::mock::{MockConnector, Script};
    use crate::types::Target;
    use tokio::time::Instant;

    #[test]
    fn test_new_pool_is_idle() {
        let pool: ProbePool<()> = ProbePool::new(8);
        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.idle_count(), 8);
        assert_eq!(pool.connecting_count(), 0);
        assert!(pool.is_quiescent());
    }

    #[test]
    fn test_capacity_capped_at_hard_max() {
        let pool: ProbePool<()> = ProbePool::new(4096);
        assert_eq!(pool.capacity(), MAX_PROBES);
        assert_eq!(pool.idle_count(), MAX_PROBES);
    }

    #[test]
    fn test_counts_follow_probe_states() {
        let connector = MockConnector::new(Script::Silent);
        let mut pool = ProbePool::new(4);
        let now = Instant::now();

        for (port, probe) in (1..).zip(pool.iter_mut().take(3)) {
            probe.start(&connector, Target::new(1, port), now).unwrap();
        }
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.connecting_count(), 3);
        assert!(!pool.is_quiescent());
        assert_eq!(pool.get(0).and_then(Probe::target), Some(Target::new(1, 1)));

        for probe in pool.iter_mut() {
            probe.release(&connector);
        }
        assert!(pool.is_quiescent());
        assert_eq!(connector.in_flight.get(), 0);
    }
}
