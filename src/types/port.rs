//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always scannable port numbers
//! (1-65534). `PortRange` handles the `a` / `a-b` specification syntax.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A validated network port number (1-65534).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum scannable port number.
    pub const MAX: u16 = 65534;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN && port <= Self::MAX {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Port {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Parse wide so "70000" reports out-of-range rather than a format error.
        let value: u32 = s
            .parse()
            .map_err(|_| ConfigError::InvalidPort(s.to_string()))?;

        u16::try_from(value)
            .ok()
            .and_then(Port::new)
            .ok_or(ConfigError::PortOutOfRange {
                port: value,
                min: Port::MIN,
                max: Port::MAX,
            })
    }
}

/// An inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, ConfigError> {
        if start > end {
            Err(ConfigError::InvalidPortRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// First port of the range.
    pub const fn start(&self) -> u16 {
        self.start.0
    }

    /// Last port of the range.
    pub const fn end(&self) -> u16 {
        self.end.0
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> u64 {
        (self.end.0 - self.start.0) as u64 + 1
    }

    /// A valid range always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses `"80"` or `"1-1000"`.
impl FromStr for PortRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('-') {
            Some((start, end)) => Self::new(start.parse()?, end.parse()?),
            None => Ok(Self::single(s.parse()?)),
        }
    }
}
