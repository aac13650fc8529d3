//! TCP listener setup and the accept step.
//!
//! # Responsibilities
//! - Bind to all interfaces on the configured port
//! - Accept incoming TCP connections
//! - Ride out transient accept errors with backoff
//!
//! # Design Decisions
//! - Per-connection failures (reset, aborted) and descriptor exhaustion are
//!   retried; anything else is returned to the caller as fatal

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::{TcpListener, TcpStream};

use crate::resilience::backoff::calculate_backoff;

/// First retry delay after a transient accept error, in milliseconds.
const ACCEPT_BACKOFF_BASE_MS: u64 = 5;

/// Upper bound on the accept retry delay, in milliseconds.
const ACCEPT_BACKOFF_MAX_MS: u64 = 1000;

// errno values for descriptor exhaustion on Linux and the BSDs.
const ENFILE: i32 = 23;
const EMFILE: i32 = 24;

/// Address covering every IPv4 interface on `port`.
pub fn all_interfaces(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Bind a listener to all interfaces on `port`.
pub async fn bind(port: u16) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(all_interfaces(port)).await?;

    tracing::debug!(address = %listener.local_addr()?, "Listener bound");

    Ok(listener)
}

/// Accept the next connection.
///
/// Transient errors are logged and retried with exponential backoff; the
/// first non-transient error is returned.
pub async fn accept(listener: &TcpListener) -> io::Result<(TcpStream, SocketAddr)> {
    let mut attempt = 0;
    loop {
        match listener.accept().await {
            Ok(conn) => return Ok(conn),
            Err(e) if is_transient(&e) => {
                attempt += 1;
                let delay = calculate_backoff(attempt, ACCEPT_BACKOFF_BASE_MS, ACCEPT_BACKOFF_MAX_MS);
                tracing::warn!(error = %e, retry_in = ?delay, "Accept error");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Whether an accept error should be retried rather than stop the server.
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    ) || matches!(err.raw_os_error(), Some(ENFILE) | Some(EMFILE))
}
