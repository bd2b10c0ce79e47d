use std::io;
use std::net::SocketAddr;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use nix::sys::socket::sockopt::{ReuseAddr, ReusePort};
use nix::sys::socket::{
    accept4, bind, getsockname, listen, setsockopt, AddressFamily, Backlog, SockFlag,
    SockProtocol, SockType, SockaddrIn,
};

use crate::error::ServerError;

use super::stream::TcpStream;

/// A non-blocking listening socket bound with `SO_REUSEADDR`+`SO_REUSEPORT`
/// so the kernel spreads `accept()`s across every worker bound to the same
/// port (SPEC_FULL §4.8).
pub struct TcpListener {
    fd: OwnedFd,
}

impl TcpListener {
    /// Binds and listens on `addr`. IPv4 only (matches the teacher, which
    /// does not support IPv6 either).
    ///
    /// Each syscall phase maps to its own [`ServerError`] variant (SPEC_FULL
    /// §4.10/§7 class 7) rather than folding every failure into one: socket
    /// creation and the `SO_REUSEADDR`/`SO_REUSEPORT` options are
    /// `ServerError::SocketOption`, `bind()` is `ServerError::Bind`, and
    /// `listen()` (including the backlog conversion) is `ServerError::Listen`.
    pub fn bind(addr: SocketAddr, backlog: i32) -> Result<Self, ServerError> {
        let octets = match addr.ip() {
            std::net::IpAddr::V4(ip) => ip.octets(),
            std::net::IpAddr::V6(_) => {
                return Err(ServerError::SocketOption(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "IPv6 is not supported",
                )))
            }
        };

        let fd = nix::sys::socket::socket(
            AddressFamily::Inet,
            SockType::Stream,
            SockFlag::SOCK_NONBLOCK,
            SockProtocol::Tcp,
        )
        .map_err(|e| ServerError::SocketOption(io::Error::from(e)))?;

        setsockopt(&fd, ReuseAddr, &true).map_err(|e| ServerError::SocketOption(io::Error::from(e)))?;
        setsockopt(&fd, ReusePort, &true).map_err(|e| ServerError::SocketOption(io::Error::from(e)))?;

        let sockaddr = SockaddrIn::new(octets[0], octets[1], octets[2], octets[3], addr.port());
        bind(fd.as_raw_fd(), &sockaddr).map_err(|e| ServerError::Bind(io::Error::from(e)))?;

        let backlog = Backlog::new(backlog)
            .map_err(|_| ServerError::Listen(io::Error::new(io::ErrorKind::InvalidInput, "invalid backlog")))?;
        listen(&fd, backlog).map_err(|e| ServerError::Listen(io::Error::from(e)))?;

        Ok(Self { fd })
    }

    /// Attempts to accept one connection. `io::ErrorKind::WouldBlock` means
    /// the caller should suspend on this listener's readability and retry.
    pub fn try_accept(&self) -> io::Result<TcpStream> {
        match accept4(self.fd.as_raw_fd(), SockFlag::SOCK_NONBLOCK | SockFlag::SOCK_CLOEXEC) {
            Ok(fd) => Ok(TcpStream::from_raw_fd(fd)),
            Err(e) => Err(io::Error::from(e)),
        }
    }

    /// The address actually bound, including the OS-assigned port if `addr`
    /// was passed to [`Self::bind`] with port `0` (used by loopback tests).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        let sockaddr: SockaddrIn = getsockname(self.fd.as_raw_fd()).map_err(io::Error::from)?;
        Ok(SocketAddr::new(std::net::IpAddr::V4(sockaddr.ip()), sockaddr.port()))
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}
