//! Validated scan settings.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{ScheduleOptions, MAX_PROBES};
use crate::types::{HostRange, PortRange};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default per-connection timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Default number of parallel probes.
pub const DEFAULT_CONCURRENCY: usize = 256;
/// Default sleep between fill and poll passes, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 500;
/// Pause after the OS refuses to hand out another socket.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Everything a scan needs, checked before any socket is created.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    hosts: HostRange,
    ports: PortRange,
    timeout: Duration,
    interval: Duration,
    backoff: Duration,
    concurrency: usize,
    log_file: Option<PathBuf>,
    verbose: bool,
}

impl ScanConfig {
    /// Start from defaults for the given ranges.
    pub fn new(hosts: HostRange, ports: PortRange) -> Self {
        Self {
            hosts,
            ports,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            backoff: DEFAULT_BACKOFF,
            concurrency: DEFAULT_CONCURRENCY,
            log_file: None,
            verbose: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the invariants the scheduler relies on.
    ///
    /// The interval is compared with the timeout at full precision, so a
    /// 1500ms interval is rejected against a 1s timeout.
    pub fn validate(self) -> ConfigResult<Self> {
        if self.concurrency == 0 || self.concurrency > MAX_PROBES {
            return Err(ConfigError::InvalidConcurrency {
                requested: self.concurrency,
                max: MAX_PROBES,
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.interval > self.timeout {
            return Err(ConfigError::IntervalExceedsTimeout {
                interval_ms: self.interval.as_millis() as u64,
                timeout_ms: self.timeout.as_millis() as u64,
            });
        }
        Ok(self)
    }

    pub fn hosts(&self) -> HostRange {
        self.hosts
    }

    pub fn ports(&self) -> PortRange {
        self.ports
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Number of (host, port) pairs covered.
    pub fn total_targets(&self) -> u64 {
        self.hosts.len() * self.ports.len()
    }

    /// Pool size: the configured concurrency, clamped to the target count.
    pub fn concurrency(&self) -> usize {
        usize::try_from(self.total_targets()).map_or(self.concurrency, |t| self.concurrency.min(t))
    }

    pub fn schedule(&self) -> ScheduleOptions {
        ScheduleOptions {
            timeout: self.timeout,
            interval: self.interval,
            backoff: self.backoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(hosts: &str, ports: &str) -> ScanConfig {
        ScanConfig::new(hosts.parse().unwrap(), ports.parse().unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = config("192.168.1.0/24", "1-1024").validate().unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.interval(), Duration::from_millis(500));
        assert_eq!(config.concurrency(), 256);
        assert_eq!(config.total_targets(), 256 * 1024);
        assert!(config.log_file().is_none());
        assert!(!config.verbose());
    }

    #[test]
    fn test_concurrency_bounds() {
        assert!(config("10.0.0.1", "1-2000").with_concurrency(1024).validate().is_ok());
        assert!(matches!(
            config("10.0.0.1", "80").with_concurrency(1025).validate(),
            Err(ConfigError::InvalidConcurrency { requested: 1025, max: 1024 })
        ));
        assert!(matches!(
            config("10.0.0.1", "80").with_concurrency(0).validate(),
            Err(ConfigError::InvalidConcurrency { requested: 0, .. })
        ));
    }

    #[test]
    fn test_concurrency_clamped_to_targets() {
        let cfg = config("10.0.0.0/30", "80").with_concurrency(512).validate().unwrap();
        assert_eq!(cfg.concurrency(), 4);

        // The range starts at the given address, so only three hosts remain.
        let cfg = config("10.0.0.1/30", "80").with_concurrency(512).validate().unwrap();
        assert_eq!(cfg.concurrency(), 3);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(matches!(
            config("10.0.0.1", "80").with_timeout(Duration::ZERO).validate(),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_interval_compared_at_full_precision() {
        let base = config("10.0.0.1", "80").with_timeout(Duration::from_secs(1));

        assert!(base
            .clone()
            .with_interval(Duration::from_millis(1000))
            .validate()
            .is_ok());
        assert!(matches!(
            base.clone().with_interval(Duration::from_millis(1500)).validate(),
            Err(ConfigError::IntervalExceedsTimeout {
                interval_ms: 1500,
                timeout_ms: 1000
            })
        ));
        assert!(matches!(
            base.with_interval(Duration::ZERO).validate(),
            Err(ConfigError::ZeroInterval)
        ));
    }

    #[test]
    fn test_schedule_options() {
        let config = config("10.0.0.1", "80")
            .with_timeout(Duration::from_secs(2))
            .with_interval(Duration::from_millis(100))
            .with_backoff(Duration::from_millis(50));
        let schedule = config.schedule();
        assert_eq!(schedule.timeout, Duration::from_secs(2));
        assert_eq!(schedule.interval, Duration::from_millis(100));
        assert_eq!(schedule.backoff, Duration::from_millis(50));
    }
}
