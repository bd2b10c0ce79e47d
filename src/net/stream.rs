use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};

use nix::sys::socket::sockopt::TcpNoDelay;
use nix::sys::socket::setsockopt;
use nix::unistd::{read, write};

/// A non-blocking, owning TCP connection. Closed on `Drop` via `OwnedFd`.
pub struct TcpStream {
    fd: OwnedFd,
}

impl TcpStream {
    /// Wraps an already-accepted, already-nonblocking raw fd and applies
    /// `TCP_NODELAY` (matches `setup_connection` in
    /// `src/engine/src/io/sys/unix/epoll/net.rs`).
    pub(crate) fn from_raw_fd(fd: RawFd) -> Self {
        let owned = unsafe { OwnedFd::from_raw_fd(fd) };
        let _ = setsockopt(&owned, TcpNoDelay, &true);
        Self { fd: owned }
    }

    /// Attempts one `read`. `Ok(0)` means the peer closed the connection;
    /// `io::ErrorKind::WouldBlock` means the caller should suspend on
    /// readability and retry.
    pub fn try_read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let borrowed: BorrowedFd = self.fd.as_fd();
        read(borrowed.as_raw_fd(), buf).map_err(io::Error::from)
    }

    /// Attempts one `write`. `io::ErrorKind::WouldBlock` means the caller
    /// should suspend on writability and retry.
    pub fn try_write(&self, buf: &[u8]) -> io::Result<usize> {
        write(&self.fd, buf).map_err(io::Error::from)
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}
