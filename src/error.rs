//! Error types for tcpsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-target connection
//! outcomes are never errors; only configuration and setup failures are.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors, reported before any socket is created.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid IP address given: {0}")]
    InvalidAddress(String),

    #[error("invalid prefix length '{0}' (must be 0-32)")]
    InvalidPrefix(String),

    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("port must be a number within {min}-{max}, got {port}")]
    PortOutOfRange { port: u32, min: u16, max: u16 },

    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidPortRange(u16, u16),

    #[error("concurrency must be within 1-{max}, got {requested}")]
    InvalidConcurrency { requested: usize, max: usize },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("poll interval ({interval_ms}ms) cannot be above the timeout ({timeout_ms}ms)")]
    IntervalExceedsTimeout { interval_ms: u64, timeout_ms: u64 },

    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to put a probe in flight.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Socket allocation failed (descriptor or ephemeral port exhaustion).
    /// The target was not consumed and should be retried later.
    #[error("socket resources exhausted: {0}")]
    ResourceExhausted(#[source] std::io::Error),

    /// `start` was called on a probe that already owns a connection.
    #[error("probe is still connecting to {0}")]
    Busy(crate::types::Target),
}

/// Result type alias for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;
