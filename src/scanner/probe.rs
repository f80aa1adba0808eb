//! Probe state machine.
//!
//! A probe is one slot of the pool. It is either idle or owns exactly one
//! in-flight connection attempt:
//!
//! ```text
//! Idle --start()--> Connecting
//! Connecting --poll(): Open | Closed | TimedOut--> Idle
//! Connecting --poll(): Pending--> Connecting
//! ```
//!
//! The socket work itself sits behind the [`Connector`] trait so the state
//! machine can be driven by the OS connector or by a scripted one in tests.

use crate::error::ProbeError;
use crate::types::Target;
use std::fmt;
use std::io;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Sampled state of an outstanding non-blocking connect.
#[derive(Debug)]
pub enum ConnectState {
    /// The handshake completed.
    Connected,
    /// Still in progress.
    Pending,
    /// Refused, unreachable or otherwise failed.
    Failed(io::Error),
}

/// Socket backend for probes.
pub trait Connector {
    /// Owned handle to one connection attempt.
    type Socket;

    /// Allocate a non-blocking socket and issue the connect without waiting.
    fn connect(&self, target: Target) -> Result<Self::Socket, ProbeError>;

    /// Sample the state of an outstanding attempt.
    fn sample(&self, socket: &mut Self::Socket, target: Target) -> ConnectState;

    /// Shut down and close the socket.
    fn release(&self, socket: Self::Socket);
}

/// Terminal or intermediate result of polling a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Open(Target),
    Closed(Target),
    TimedOut(Target),
    Pending,
}

impl ProbeOutcome {
    /// Whether the probe returned to idle.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Coarse probe state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Idle,
    Connecting,
}

impl fmt::Display for ProbeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Connecting => write!(f, "connecting"),
        }
    }
}

enum Slot<S> {
    Idle,
    Connecting {
        socket: S,
        target: Target,
        started_at: Instant,
    },
}

/// One slot of the probe pool.
pub struct Probe<S> {
    slot: Slot<S>,
}

impl<S> Default for Probe<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Probe<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("state", &self.state())
            .field("target", &self.target())
            .finish()
    }
}

impl<S> Probe<S> {
    pub const fn new() -> Self {
        Self { slot: Slot::Idle }
    }

    pub fn state(&self) -> ProbeState {
        match self.slot {
            Slot::Idle => ProbeState::Idle,
            Slot::Connecting { .. } => ProbeState::Connecting,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.slot, Slot::Idle)
    }

    /// Target of the in-flight attempt.
    pub fn target(&self) -> Option<Target> {
        match self.slot {
            Slot::Idle => None,
            Slot::Connecting { target, .. } => Some(target),
        }
    }

    /// When the in-flight attempt was issued.
    pub fn started_at(&self) -> Option<Instant> {
        match self.slot {
            Slot::Idle => None,
            Slot::Connecting { started_at, .. } => Some(started_at),
        }
    }

    /// Issue a connection attempt toward `target`.
    ///
    /// On error the probe stays idle and the caller keeps the target.
    pub fn start<C>(&mut self, connector: &C, target: Target, now: Instant) -> Result<(), ProbeError>
    where
        C: Connector<Socket = S>,
    {
        if let Slot::Connecting { target: busy, .. } = self.slot {
            return Err(ProbeError::Busy(busy));
        }

        let socket = connector.connect(target)?;
        debug!(%target, "connect issued");
        self.slot = Slot::Connecting {
            socket,
            target,
            started_at: now,
        };
        Ok(())
    }

    /// Check the in-flight attempt for completion or timeout.
    ///
    /// Returns `None` when the probe is idle. Any terminal outcome releases
    /// the socket before returning.
    pub fn poll<C>(&mut self, connector: &C, timeout: Duration, now: Instant) -> Option<ProbeOutcome>
    where
        C: Connector<Socket = S>,
    {
        let outcome = match &mut self.slot {
            Slot::Idle => return None,
            Slot::Connecting {
                socket,
                target,
                started_at,
            } => {
                let target = *target;
                if now.saturating_duration_since(*started_at) >= timeout {
                    ProbeOutcome::TimedOut(target)
                } else {
                    match connector.sample(socket, target) {
                        ConnectState::Connected => ProbeOutcome::Open(target),
                        ConnectState::Pending => ProbeOutcome::Pending,
                        ConnectState::Failed(err) => {
                            debug!(%target, error = %err, "connect failed");
                            ProbeOutcome::Closed(target)
                        }
                    }
                }
            }
        };

        if outcome.is_terminal() {
            self.release(connector);
        }
        Some(outcome)
    }

    /// Drop the in-flight attempt, if any. Idle probes are left untouched.
    ///
    /// Returns whether a socket was released.
    pub fn release<C>(&mut self, connector: &C) -> bool
    where
        C: Connector<Socket = S>,
    {
        match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Idle => false,
            Slot::Connecting { socket, .. } => {
                connector.release(socket);
                true
            }
        }
    }
}
