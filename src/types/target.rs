//! Host range and target types.
//!
//! A host specification is a single IPv4 address or `a.b.c.d/bits`. The
//! range runs from the given address up to `address | hostmask`; the address
//! is not rounded down to the network address.

use crate::error::ConfigError;
use ipnetwork::Ipv4Network;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

/// One (address, port) pair to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Target {
    /// IPv4 address in host byte order.
    pub address: u32,
    pub port: u16,
}

impl Target {
    pub const fn new(address: u32, port: u16) -> Self {
        Self { address, port }
    }

    pub fn ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.address)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip(), self.port))
    }
}

impl From<SocketAddrV4> for Target {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(u32::from(*addr.ip()), addr.port())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip(), self.port)
    }
}

/// An inclusive range of IPv4 hosts, in host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    start: u32,
    end: u32,
}

impl HostRange {
    /// Range covered by a network, starting at the network's own address.
    pub fn from_network(network: Ipv4Network) -> Self {
        let start = u32::from(network.ip());
        let end = start | !u32::from(network.mask());
        Self { start, end }
    }

    pub const fn start(&self) -> u32 {
        self.start
    }

    pub const fn end(&self) -> u32 {
        self.end
    }

    pub fn first(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.start)
    }

    pub fn last(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.end)
    }

    /// Number of hosts in the range (up to 2^32 for `/0`).
    pub const fn len(&self) -> u64 {
        (self.end - self.start) as u64 + 1
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.first())
        } else {
            write!(f, "{} - {}", self.first(), self.last())
        }
    }
}

/// Parses `"10.0.0.1"` or `"10.0.0.0/24"`.
impl FromStr for HostRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, bits)) => {
                let prefix: u8 = bits
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPrefix(bits.to_string()))?;
                (addr, prefix)
            }
            None => (s, 32),
        };

        let addr: Ipv4Addr = addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(addr.to_string()))?;

        let network = Ipv4Network::new(addr, prefix)
            .map_err(|_| ConfigError::InvalidPrefix(prefix.to_string()))?;

        Ok(Self::from_network(network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_host() {
        let range: HostRange = "10.0.0.1".parse().unwrap();
        assert_eq!(range.first(), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(range.last(), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_parse_slash_32() {
        let range: HostRange = "10.0.0.1/32".parse().unwrap();
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_parse_cidr_keeps_given_address() {
        let range: HostRange = "192.168.1.50/24".parse().unwrap();
        assert_eq!(range.first(), Ipv4Addr::new(192, 168, 1, 50));
        assert_eq!(range.last(), Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(range.len(), 206);
    }

    #[test]
    fn test_parse_cidr_network_address() {
        let range: HostRange = "192.168.1.0/30".parse().unwrap();
        assert_eq!(range.len(), 4);
        assert_eq!(range.to_string(), "192.168.1.0 - 192.168.1.3");
    }

    #[test]
    fn test_parse_slash_zero() {
        let range: HostRange = "0.0.0.0/0".parse().unwrap();
        assert_eq!(range.len(), 1u64 << 32);
    }

    #[test]
    fn test_parse_invalid_address() {
        assert!(matches!(
            "300.1.1.1".parse::<HostRange>(),
            Err(ConfigError::InvalidAddress(_))
        ));
        assert!(matches!(
            "example.com".parse::<HostRange>(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_invalid_prefix() {
        assert!(matches!(
            "10.0.0.0/33".parse::<HostRange>(),
            Err(ConfigError::InvalidPrefix(_))
        ));
        assert!(matches!(
            "10.0.0.0/x".parse::<HostRange>(),
            Err(ConfigError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_target_display() {
        let target = Target::new(u32::from(Ipv4Addr::new(10, 0, 0, 1)), 80);
        assert_eq!(target.to_string(), "10.0.0.1:80");
        assert_eq!(target.socket_addr().to_string(), "10.0.0.1:80");
    }
}
