use std::io;
use std::os::fd::{AsRawFd, IntoRawFd, RawFd};
use std::time::Duration;

use nix::sys::time::TimeSpec;
use nix::sys::timerfd::{ClockId, Expiration, TimerFd, TimerFlags, TimerSetTimeFlags};
use nix::unistd;

/// A one-shot monotonic timer descriptor backing `sleep_ms` (SPEC_FULL
/// §4.3/§4.4). Grounded on `original_source/src/platform/linux/coro.c`'s
/// `coro_sleep_ms`, which creates a `timerfd`, registers it with the
/// reactor like any other wait, and drains+closes it once the coroutine is
/// woken.
pub struct Timer;

impl Timer {
    /// Arms a new one-shot timer for `duration` and returns its raw
    /// descriptor, already registered to fire exactly once. The caller owns
    /// the fd and is responsible for draining and closing it after waking
    /// (the scheduler does this automatically for records it knows `owns_fd`).
    pub fn arm(duration: Duration) -> io::Result<RawFd> {
        let timer = TimerFd::new(ClockId::CLOCK_MONOTONIC, TimerFlags::TFD_NONBLOCK)
            .map_err(io::Error::from)?;
        let spec = TimeSpec::from_duration(duration);
        timer
            .set(Expiration::OneShot(spec), TimerSetTimeFlags::empty())
            .map_err(io::Error::from)?;
        Ok(timer.into_raw_fd())
    }

    /// Drains the single expiration count from a fired timer fd so a
    /// subsequent `read` doesn't block; errors are ignored since the timer
    /// is about to be closed regardless.
    pub fn drain(fd: RawFd) {
        let mut buf = [0u8; 8];
        let borrowed = unsafe { std::os::fd::BorrowedFd::borrow_raw(fd) };
        let _ = unistd::read(borrowed.as_raw_fd(), &mut buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::FromRawFd;

    #[test]
    fn arm_returns_a_valid_fd_and_can_be_closed() {
        let fd = Timer::arm(Duration::from_millis(1)).expect("timer creation should succeed");
        assert!(fd >= 0);
        unsafe {
            let _ = std::os::fd::OwnedFd::from_raw_fd(fd);
        }
    }
}
