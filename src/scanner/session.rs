//! Scan session counters and progress accounting.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Aggregate counters for one scan. Mutated only by the scheduler.
#[derive(Debug, Clone)]
pub struct ScanSession {
    total: u64,
    issued: u64,
    open: u64,
    closed: u64,
    timed_out: u64,
    started_at: Instant,
}

impl ScanSession {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            issued: 0,
            open: 0,
            closed: 0,
            timed_out: 0,
            started_at: Instant::now(),
        }
    }

    /// Restart the elapsed-time clock.
    pub(crate) fn mark_started(&mut self) {
        self.started_at = Instant::now();
    }

    pub(crate) fn record_issued(&mut self) {
        self.issued += 1;
    }

    pub(crate) fn record_open(&mut self) {
        self.open += 1;
    }

    pub(crate) fn record_closed(&mut self) {
        self.closed += 1;
    }

    pub(crate) fn record_timed_out(&mut self) {
        self.timed_out += 1;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn open(&self) -> u64 {
        self.open
    }

    pub fn closed(&self) -> u64 {
        self.closed
    }

    pub fn timed_out(&self) -> u64 {
        self.timed_out
    }

    /// Outcomes resolved so far.
    pub fn resolved(&self) -> u64 {
        self.open + self.closed + self.timed_out
    }

    /// Fraction of targets dispatched, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.issued as f64 / self.total as f64
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Running status line, e.g. `Open 3 [41.67%]`.
    pub fn status_line(&self) -> String {
        format!("Open {} [{:.2}%]", self.open, self.progress() * 100.0)
    }
}

/// Worst-case scan duration: every full batch of `concurrency` attempts
/// waits out the timeout, plus one more timeout for the tail.
pub fn estimate_duration(total: u64, concurrency: usize, timeout: Duration) -> Duration {
    let batches = total / concurrency.max(1) as u64;
    let batches = u32::try_from(batches).unwrap_or(u32::MAX);
    timeout.saturating_mul(batches).saturating_add(timeout)
}

/// Whole-second duration rendered as hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms(pub Duration);

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        write!(
            f,
            "{} hours, {} mins, {} secs",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }
}
