//! Configuration management for tcpsweep.
//!
//! Command-line values are folded into a [`ScanConfig`] and validated before
//! the scan engine sees them.

mod settings;

pub use settings::{
    ScanConfig, DEFAULT_BACKOFF, DEFAULT_CONCURRENCY, DEFAULT_INTERVAL_MS, DEFAULT_TIMEOUT_SECS,
};
