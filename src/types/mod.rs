//! Core type definitions using newtype patterns for type safety.
//!
//! Parsing validates bounds up front, so the scan engine only ever sees
//! well-formed host and port ranges.

mod port;
mod target;

pub use port::{Port, PortRange};
pub use target::{HostRange, Target};
