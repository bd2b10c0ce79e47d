use std::os::fd::RawFd;

use super::{CoroutineImpl, DEFAULT_STACK_SIZE};
use crate::io::Interest;

/// The coroutine record's lifecycle state (SPEC_FULL §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Ready,
    Running,
    Suspended,
    Sleeping,
    Finished,
}

/// A coroutine record: the suspendable body itself plus the bookkeeping the
/// scheduler needs while it is parked off the ready queue.
pub struct Record {
    pub(crate) body: CoroutineImpl,
    pub(crate) state: RecordState,
    /// Recorded stack-size budget; metadata only (see module docs).
    pub(crate) stack_size: usize,
    /// The descriptor this record is currently parked on, or `-1`.
    pub(crate) waiting_fd: RawFd,
    pub(crate) waiting_interest: Option<Interest>,
    /// Whether `waiting_fd` is a descriptor this record created for itself
    /// (a `sleep_ms` timer) and must therefore close once woken, as opposed
    /// to a caller-owned socket it merely suspended on.
    pub(crate) owns_fd: bool,
}

impl Record {
    pub fn new(body: CoroutineImpl) -> Self {
        Self {
            body,
            state: RecordState::Ready,
            stack_size: DEFAULT_STACK_SIZE,
            waiting_fd: -1,
            waiting_interest: None,
            owns_fd: false,
        }
    }

    pub fn state(&self) -> RecordState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_ready_with_default_stack_size() {
        let body = crate::spawn_body!({});
        let record = Record::new(body);
        assert_eq!(record.state(), RecordState::Ready);
        assert_eq!(record.stack_size, DEFAULT_STACK_SIZE);
        assert_eq!(record.waiting_fd, -1);
        assert!(!record.owns_fd);
    }
}
