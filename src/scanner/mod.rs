//! Scanner module - the bounded connection-probing engine.
//!
//! A [`TargetEnumerator`] feeds a [`ScanScheduler`], which keeps a
//! fixed-size [`ProbePool`] of non-blocking connect attempts busy and hands
//! every open target to a [`ResultSink`](crate::output::ResultSink).

pub mod enumerator;
pub mod pool;
pub mod probe;
pub mod scheduler;
pub mod session;
pub mod tcp;

pub use enumerator::{Exhausted, TargetEnumerator};
pub use pool::{ProbePool, MAX_PROBES};
pub use probe::{ConnectState, Connector, Probe, ProbeOutcome, ProbeState};
pub use scheduler::{ScanScheduler, ScanSummary, ScheduleOptions};
pub use session::{estimate_duration, Hms, ScanSession};
pub use tcp::{PendingSocket, TcpConnector};
