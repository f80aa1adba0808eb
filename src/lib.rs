//! # tcpsweep - A TCP connect scanner
//!
//! tcpsweep finds which (host, port) pairs in an IPv4 range accept TCP
//! connections. A fixed pool of non-blocking connect attempts is refilled
//! from a lazy target sequence, polled for completion or timeout, and
//! drained into a result sink, all from a single thread of control.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use tcpsweep::scanner::{ScanScheduler, ScheduleOptions, TargetEnumerator, TcpConnector};
//! use tcpsweep::types::Target;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let targets = TargetEnumerator::new("192.168.1.0/24".parse().unwrap(), "22".parse().unwrap());
//!     let mut scheduler = ScanScheduler::new(TcpConnector::new(), targets, 256, ScheduleOptions::default());
//!
//!     let mut open: Vec<Target> = Vec::new();
//!     let summary = scheduler.run(&mut open).await;
//!     println!("{} open of {}", summary.open, summary.total);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated host ranges, port ranges and targets
//! - [`scanner`] - Target enumeration, probes, the probe pool and scheduler
//! - [`config`] - Validated scan configuration
//! - [`output`] - Result sinks and console output
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::{ConfigError, ProbeError};
pub use scanner::{ScanScheduler, ScanSummary, TargetEnumerator, TcpConnector};
pub use types::{HostRange, PortRange, Target};
