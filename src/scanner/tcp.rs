//! Non-blocking TCP connector.
//!
//! Issues connects on raw `socket2` sockets in non-blocking mode and samples
//! them with the repeated-connect idiom: a second `connect()` on the same
//! socket reports `EISCONN` once the handshake completed, `EALREADY` or
//! `EINPROGRESS` while it is pending, and the failure reason otherwise.
//! Pending socket errors are collected with `SO_ERROR` first so a refusal is
//! never mistaken for a fresh attempt.

use crate::error::ProbeError;
use crate::scanner::probe::{ConnectState, Connector};
use crate::types::Target;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::Shutdown;

/// One outstanding connection attempt.
#[derive(Debug)]
pub struct PendingSocket {
    socket: Socket,
    /// Result the initial connect already settled on, if it did not go
    /// asynchronous (loopback targets commonly do this).
    settled: Option<ConnectState>,
}

/// Connector backed by the operating system's TCP stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for TcpConnector {
    type Socket = PendingSocket;

    fn connect(&self, target: Target) -> Result<PendingSocket, ProbeError> {
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(ProbeError::ResourceExhausted)?;
        socket
            .set_nonblocking(true)
            .map_err(ProbeError::ResourceExhausted)?;

        let addr = SockAddr::from(target.socket_addr());
        let settled = match socket.connect(&addr) {
            Ok(()) => Some(ConnectState::Connected),
            Err(err) if is_in_progress(&err) => None,
            Err(err) if is_local_exhaustion(&err) => {
                return Err(ProbeError::ResourceExhausted(err));
            }
            Err(err) => Some(ConnectState::Failed(err)),
        };

        Ok(PendingSocket { socket, settled })
    }

    fn sample(&self, pending: &mut PendingSocket, target: Target) -> ConnectState {
        if let Some(state) = pending.settled.take() {
            return state;
        }

        match pending.socket.take_error() {
            Ok(Some(err)) | Err(err) => return ConnectState::Failed(err),
            Ok(None) => {}
        }

        match pending.socket.connect(&SockAddr::from(target.socket_addr())) {
            Ok(()) => ConnectState::Connected,
            Err(err) if err.raw_os_error() == Some(libc::EISCONN) => ConnectState::Connected,
            Err(err) if is_in_progress(&err) => ConnectState::Pending,
            Err(err) => ConnectState::Failed(err),
        }
    }

    fn release(&self, pending: PendingSocket) {
        // Never-connected sockets report ENOTCONN here; closing is what matters.
        let _ = pending.socket.shutdown(Shutdown::Both);
        drop(pending);
    }
}

fn is_in_progress(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EINPROGRESS) | Some(libc::EALREADY) | Some(libc::EINTR)
    )
}

/// Errors that mean the local host ran out of something, not that the
/// target answered. On a TCP socket `EAGAIN` from `connect()` means no
/// local port or routing entry was available, never a pending handshake.
fn is_local_exhaustion(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EAGAIN)
            | Some(libc::EADDRNOTAVAIL)
            | Some(libc::ENOBUFS)
            | Some(libc::EMFILE)
            | Some(libc::ENFILE)
    )
}
