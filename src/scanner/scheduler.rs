//! Scan scheduler.
//!
//! Single-threaded control loop over the probe pool:
//!
//! 1. fill every idle slot from the target enumerator,
//! 2. sleep for the poll interval,
//! 3. poll every connecting slot, forwarding open targets to the sink,
//!
//! until the enumerator runs dry, then drain the pool until every slot is
//! idle again. Concurrency comes from non-blocking sockets; the interval
//! sleep is the only suspension point and is raced against cancellation.

use crate::error::ProbeError;
use crate::output::{print_info, ResultSink};
use crate::scanner::enumerator::TargetEnumerator;
use crate::scanner::pool::{ProbePool, MAX_PROBES};
use crate::scanner::probe::{Connector, ProbeOutcome};
use crate::scanner::session::ScanSession;
use indicatif::ProgressBar;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Timing knobs for the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Per-connection timeout.
    pub timeout: Duration,
    /// Sleep between fill and poll passes. Never above `timeout`.
    pub interval: Duration,
    /// Pause after a socket allocation failure.
    pub backoff: Duration,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            interval: Duration::from_millis(500),
            backoff: Duration::from_secs(1),
        }
    }
}

/// Final counters of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: u64,
    pub issued: u64,
    pub open: u64,
    pub closed: u64,
    pub timed_out: u64,
    /// In-flight attempts released without an outcome by an interrupt.
    pub abandoned: u64,
    pub elapsed: Duration,
    pub interrupted: bool,
}

/// Drives a [`ProbePool`] over a [`TargetEnumerator`].
pub struct ScanScheduler<C: Connector> {
    connector: C,
    pool: ProbePool<C::Socket>,
    targets: TargetEnumerator,
    session: ScanSession,
    options: ScheduleOptions,
    progress: ProgressBar,
    cancel: CancellationToken,
    verbose: bool,
}

impl<C: Connector> ScanScheduler<C> {
    /// Build a scheduler with `concurrency` slots, clamped to the number of
    /// targets and to [`MAX_PROBES`].
    pub fn new(
        connector: C,
        targets: TargetEnumerator,
        concurrency: usize,
        options: ScheduleOptions,
    ) -> Self {
        let total = targets.total();
        let capacity = usize::try_from(total)
            .map_or(concurrency, |t| concurrency.min(t))
            .clamp(1, MAX_PROBES);

        Self {
            connector,
            pool: ProbePool::new(capacity),
            targets,
            session: ScanSession::new(total),
            options,
            progress: ProgressBar::hidden(),
            cancel: CancellationToken::new(),
            verbose: false,
        }
    }

    /// Report progress through `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Stop early once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Print status notices such as the drain message.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn pool(&self) -> &ProbePool<C::Socket> {
        &self.pool
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Run the scan to completion or until cancelled.
    pub async fn run<R: ResultSink>(&mut self, sink: &mut R) -> ScanSummary {
        self.session.mark_started();
        info!(
            targets = self.session.total(),
            probes = self.pool.capacity(),
            timeout = ?self.options.timeout,
            interval = ?self.options.interval,
            "scan started"
        );

        while !self.targets.is_exhausted() {
            if self.cancel.is_cancelled() {
                return self.interrupt(sink);
            }

            if let Err(err) = self.fill_pass() {
                let capacity = self.pool.capacity();
                self.progress.suspend(|| {
                    warn!(
                        error = %err,
                        "cannot allocate socket, try with `-s < {capacity}`; backing off"
                    )
                });
                if !self.idle_wait(self.options.backoff).await {
                    return self.interrupt(sink);
                }
            }

            if !self.idle_wait(self.options.interval).await {
                return self.interrupt(sink);
            }
            self.poll_pass(sink);
        }

        if !self.pool.is_quiescent() {
            let remaining = self.pool.connecting_count();
            debug!(remaining, "draining pool");
            if self.verbose {
                self.progress
                    .suspend(|| print_info("Waiting for remaining sockets..."));
            }
        }
        while !self.pool.is_quiescent() {
            if !self.idle_wait(self.options.interval).await {
                return self.interrupt(sink);
            }
            self.poll_pass(sink);
        }

        self.progress.finish_and_clear();
        info!(open = self.session.open(), "scan finished");
        self.summary(0, false)
    }

    /// Poll every slot once to catch completed connections, then release
    /// whatever is still in flight. Safe to call repeatedly.
    ///
    /// Returns how many attempts were released without an outcome.
    pub fn drain_now<R: ResultSink>(&mut self, sink: &mut R) -> u64 {
        self.poll_pass(sink);

        let mut released = 0;
        for probe in self.pool.iter_mut() {
            if probe.release(&self.connector) {
                released += 1;
            }
        }
        released
    }

    fn interrupt<R: ResultSink>(&mut self, sink: &mut R) -> ScanSummary {
        let abandoned = self.drain_now(sink);
        self.progress.abandon();
        warn!(abandoned, open = self.session.open(), "scan interrupted");
        self.summary(abandoned, true)
    }

    /// Start idle slots on the next targets. A failed start leaves the
    /// target unconsumed and ends the pass.
    fn fill_pass(&mut self) -> Result<usize, ProbeError> {
        let now = Instant::now();
        let mut dispatched = 0;

        for probe in self.pool.iter_mut() {
            if !probe.is_idle() {
                continue;
            }
            let Some(target) = self.targets.peek() else {
                break;
            };

            probe.start(&self.connector, target, now)?;
            self.targets.advance();
            self.session.record_issued();
            dispatched += 1;

            self.progress.set_position(self.session.issued());
            self.progress.set_message(self.session.status_line());
        }

        debug!(dispatched, issued = self.session.issued(), "fill pass");
        Ok(dispatched)
    }

    fn poll_pass<R: ResultSink>(&mut self, sink: &mut R) {
        let now = Instant::now();

        for probe in self.pool.iter_mut() {
            match probe.poll(&self.connector, self.options.timeout, now) {
                None | Some(ProbeOutcome::Pending) => {}
                Some(ProbeOutcome::Open(target)) => {
                    self.session.record_open();
                    debug!(%target, "open");
                    if let Err(err) = self.progress.suspend(|| sink.record(target)) {
                        warn!(%target, error = %err, "failed to record open port");
                    }
                }
                Some(ProbeOutcome::Closed(_)) => self.session.record_closed(),
                Some(ProbeOutcome::TimedOut(target)) => {
                    debug!(%target, "timed out");
                    self.session.record_timed_out();
                }
            }
        }

        self.progress.set_message(self.session.status_line());
    }

    /// Sleep for `period`; false if cancelled first.
    async fn idle_wait(&self, period: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = sleep(period) => true,
        }
    }

    fn summary(&self, abandoned: u64, interrupted: bool) -> ScanSummary {
        ScanSummary {
            total: self.session.total(),
            issued: self.session.issued(),
            open: self.session.open(),
            closed: self.session.closed(),
            timed_out: self.session.timed_out(),
            abandoned,
            elapsed: self.session.elapsed(),
            interrupted,
        }
    }
}
