use std::io;
use std::os::fd::{AsFd, BorrowedFd, RawFd};

use nix::errno::Errno;
use nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags, EpollTimeout};

use super::{Interest, Selector, Timeout};

const MAX_EVENTS: usize = 256;

/// The scheduler's reactor, backed by Linux `epoll` in level-triggered mode.
///
/// Grounded on `src/engine/src/io/sys/unix/epoll/selector.rs`'s use of
/// `nix::sys::epoll::{Epoll, EpollEvent, EpollFlags, EpollTimeout}`.
pub struct EpollSelector {
    epoll: Epoll,
    events: [EpollEvent; MAX_EVENTS],
}

fn interest_flags(interest: Interest) -> EpollFlags {
    match interest {
        Interest::Readable => EpollFlags::EPOLLIN,
        Interest::Writable => EpollFlags::EPOLLOUT,
    }
}

impl EpollSelector {
    pub fn new() -> io::Result<Self> {
        let epoll = Epoll::new(EpollCreateFlags::empty())?;
        Ok(Self {
            epoll,
            events: [EpollEvent::empty(); MAX_EVENTS],
        })
    }
}

impl Selector for EpollSelector {
    fn register(&mut self, fd: RawFd, interest: Interest, token: usize) -> io::Result<()> {
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        let event = EpollEvent::new(interest_flags(interest), token as u64);
        match self.epoll.add(borrowed, event) {
            Ok(()) => Ok(()),
            Err(Errno::EEXIST) => {
                let event = EpollEvent::new(interest_flags(interest), token as u64);
                self.epoll.modify(borrowed, &event).map_err(io::Error::from)
            }
            Err(e) => Err(io::Error::from(e)),
        }
    }

    fn deregister(&mut self, fd: RawFd) -> io::Result<()> {
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        self.epoll.delete(borrowed).map_err(io::Error::from)
    }

    fn poll(&mut self, timeout: Timeout) -> io::Result<Vec<usize>> {
        let epoll_timeout = match timeout {
            Timeout::Immediate => EpollTimeout::ZERO,
            Timeout::Block => EpollTimeout::NONE,
        };

        let n = self.epoll.wait(&mut self.events, epoll_timeout)?;
        Ok(self.events[..n].iter().map(|e| e.data() as usize).collect())
    }
}

impl AsFd for EpollSelector {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.epoll.as_fd()
    }
}
