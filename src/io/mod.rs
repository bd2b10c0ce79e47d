//! The reactor half of C4: a readiness multiplexer the scheduler polls when
//! it has nothing ready to run. Grounded on
//! `src/engine/src/io/sys/unix/epoll/selector.rs` and
//! `src/engine/src/io/sys/unix/epoll/net.rs`, simplified relative to the
//! teacher by dropping the `State`/`Ptr<T>` pooled-operation machinery: this
//! selector only ever reports "fd ready for this interest", it never
//! performs I/O itself (see `crate::coroutine` module docs for why).

mod epoll;
mod timer;

pub use epoll::EpollSelector;
pub use timer::Timer;

use std::io;
use std::os::fd::RawFd;

/// The direction of readiness a coroutine is suspended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    Readable,
    Writable,
}

/// What the reactor should do when it wakes up: block forever, or return
/// immediately with whatever is already ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    Immediate,
    Block,
}

/// A readiness multiplexer. One per worker thread, owned by its [`crate::scheduler::Scheduler`].
pub trait Selector {
    /// Registers interest in `fd` under `token`. Per SPEC_FULL §4.4/§7: if
    /// `fd` is already registered (`EEXIST`), falls back to modifying the
    /// existing registration instead of failing; any other error is fatal.
    fn register(&mut self, fd: RawFd, interest: Interest, token: usize) -> io::Result<()>;

    /// Removes any registration for `fd`.
    fn deregister(&mut self, fd: RawFd) -> io::Result<()>;

    /// Blocks (per `timeout`) and returns the tokens that became ready.
    fn poll(&mut self, timeout: Timeout) -> io::Result<Vec<usize>>;
}
