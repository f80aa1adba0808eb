//! Target enumeration.
//!
//! Walks a host range and a port range in host-major, port-minor order
//! without materializing the cross product.

use crate::types::{HostRange, PortRange, Target};
use thiserror::Error;

/// Signals that every target has been handed out.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("target sequence exhausted")]
pub struct Exhausted;

/// Lazy, restartable sequence of scan targets.
///
/// For each host from first to last, every port from first to last is
/// produced before the host advances.
#[derive(Debug, Clone)]
pub struct TargetEnumerator {
    hosts: HostRange,
    ports: PortRange,
    cursor: u64,
}

impl TargetEnumerator {
    pub fn new(hosts: HostRange, ports: PortRange) -> Self {
        Self {
            hosts,
            ports,
            cursor: 0,
        }
    }

    /// Total number of targets in the sequence.
    pub fn total(&self) -> u64 {
        self.hosts.len() * self.ports.len()
    }

    /// Targets not yet pulled.
    pub fn remaining(&self) -> u64 {
        self.total() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next target without consuming it.
    pub fn peek(&self) -> Option<Target> {
        (!self.is_exhausted()).then(|| self.target_at(self.cursor))
    }

    /// Pull the next target.
    pub fn next_target(&mut self) -> Result<Target, Exhausted> {
        let target = self.peek().ok_or(Exhausted)?;
        self.cursor += 1;
        Ok(target)
    }

    /// Consume the target [`peek`](Self::peek) returned. No-op once exhausted.
    pub fn advance(&mut self) {
        if !self.is_exhausted() {
            self.cursor += 1;
        }
    }

    /// Rewind to the first target.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    fn target_at(&self, index: u64) -> Target {
        let per_host = self.ports.len();
        // Both offsets fit: index < hosts.len() * per_host.
        let host = self.hosts.start() + (index / per_host) as u32;
        let port = self.ports.start() + (index % per_host) as u16;
        Target::new(host, port)
    }
}

impl Iterator for TargetEnumerator {
    type Item = Target;

    fn next(&mut self) -> Option<Target> {
        self.next_target().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, usize::try_from(self.remaining()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;

    fn enumerator(hosts: &str, ports: &str) -> TargetEnumerator {
        TargetEnumerator::new(hosts.parse().unwrap(), ports.parse().unwrap())
    }

    #[test]
    fn test_single_target() {
        let mut targets = enumerator("10.0.0.1/32", "80-80");
        assert_eq!(targets.total(), 1);

        let target = targets.next_target().unwrap();
        assert_eq!(target.ip(), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(target.port, 80);
        assert_eq!(targets.next_target(), Err(Exhausted));
    }

    #[test]
    fn test_host_major_port_minor_order() {
        let targets: Vec<String> = enumerator("10.0.0.0/31", "21-23")
            .map(|t| t.to_string())
            .collect();

        assert_eq!(
            targets,
            vec![
                "10.0.0.0:21",
                "10.0.0.0:22",
                "10.0.0.0:23",
                "10.0.0.1:21",
                "10.0.0.1:22",
                "10.0.0.1:23",
            ]
        );
    }

    #[test]
    fn test_count_matches_product_without_duplicates() {
        for (hosts, ports) in [
            ("172.16.0.0/28", "1-1"),
            ("172.16.0.5/29", "100-130"),
            ("10.1.2.3", "1-1000"),
            ("192.168.0.0/24", "8000-8010"),
        ] {
            let targets = enumerator(hosts, ports);
            let expected = targets.total();
            let seen: HashSet<Target> = targets.collect();
            assert_eq!(seen.len() as u64, expected, "{hosts} {ports}");
        }
    }

    #[test]
    fn test_sequence_is_strictly_ascending() {
        let targets: Vec<Target> = enumerator("10.9.9.250/29", "440-445").collect();
        assert!(targets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_advance_consumes_peeked_target() {
        let mut targets = enumerator("10.0.0.1", "1-2");
        let first = targets.peek().unwrap();
        targets.advance();
        assert_ne!(targets.peek(), Some(first));
        assert_eq!(targets.remaining(), 1);

        targets.advance();
        assert!(targets.is_exhausted());
        targets.advance();
        assert_eq!(targets.remaining(), 0);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut targets = enumerator("10.0.0.1", "1-2");
        assert_eq!(targets.remaining(), 2);
        assert_eq!(targets.peek(), targets.peek());
        assert_eq!(targets.remaining(), 2);

        let peeked = targets.peek().unwrap();
        assert_eq!(targets.next_target().unwrap(), peeked);
        assert_eq!(targets.remaining(), 1);
    }

    #[test]
    fn test_restart() {
        let mut targets = enumerator("10.0.0.1", "1-3");
        let first: Vec<Target> = targets.by_ref().collect();
        assert!(targets.is_exhausted());
        assert_eq!(targets.peek(), None);

        targets.restart();
        let second: Vec<Target> = targets.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_of_address_space() {
        let targets: Vec<Target> = enumerator("255.255.255.254/31", "65534").collect();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1].ip(), Ipv4Addr::BROADCAST);
        assert_eq!(targets[1].port, 65534);
    }

    #[test]
    fn test_whole_address_space_total() {
        let targets = enumerator("0.0.0.0/0", "1-65534");
        assert_eq!(targets.total(), (1u64 << 32) * 65534);
    }
}
