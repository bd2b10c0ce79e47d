//! Error taxonomy (C10): the only failures that escape [`crate::server::run`]
//! itself. Per-connection failures (malformed requests, transient I/O,
//! buffer exhaustion) are absorbed inside the connection coroutine per
//! SPEC_FULL §7 and never constructed as a [`ServerError`] — they are only
//! observed through [`crate::log`].
//!
//! Grounded on the teacher's own error handling: bare `std::io::Error`
//! propagation via `?`, no `thiserror`/`anyhow` dependency anywhere in the
//! teacher or the rest of the reference pack. This hand-written enum keeps
//! that minimalism while giving `run` a named type to return.

use std::fmt;
use std::io;

/// A failure that can escape [`crate::server::run`].
#[derive(Debug)]
pub enum ServerError {
    /// A worker's listening socket failed to bind.
    Bind(io::Error),
    /// A worker's listening socket failed to enter the listening state.
    Listen(io::Error),
    /// Setting a socket option (`SO_REUSEADDR`/`SO_REUSEPORT`/non-blocking) failed.
    SocketOption(io::Error),
    /// A worker thread panicked instead of running its scheduler to completion.
    WorkerPanic,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind(e) => write!(f, "failed to bind listening socket: {e}"),
            ServerError::Listen(e) => write!(f, "failed to listen on socket: {e}"),
            ServerError::SocketOption(e) => write!(f, "failed to set socket option: {e}"),
            ServerError::WorkerPanic => write!(f, "a worker thread panicked"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind(e) | ServerError::Listen(e) | ServerError::SocketOption(e) => Some(e),
            ServerError::WorkerPanic => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_underlying_io_error() {
        let err = ServerError::Bind(io::Error::new(io::ErrorKind::AddrInUse, "address in use"));
        assert!(err.to_string().contains("address in use"));
    }

    #[test]
    fn worker_panic_has_no_source() {
        use std::error::Error;
        assert!(ServerError::WorkerPanic.source().is_none());
    }
}
