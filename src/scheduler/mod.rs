//! C4's run-queue half: one [`Scheduler`] per worker thread, driving
//! coroutine records to completion and parking suspended ones either on the
//! ready queue (plain yield) or on the reactor (readiness/timer wait).
//!
//! Grounded on `src/engine/src/local/scheduler/scheduler.rs` for the overall
//! run-loop shape and the thread-local
//! `UnsafeCell<MaybeUninit<Scheduler>>` storage (needed because a running
//! coroutine calls back into the very scheduler that is resuming it — an
//! ordinary `RefCell` would panic on the reentrant borrow). Simplified
//! relative to the teacher: no separate sleeping-timer `BTreeSet`, since
//! `sleep_ms` here is just another reactor registration on a timer fd (see
//! `crate::coroutine`/`crate::io` module docs).

use std::cell::UnsafeCell;
use std::collections::VecDeque;
use std::mem::MaybeUninit;
use std::ops::CoroutineState;
use std::pin::Pin;

use slab::Slab;

use crate::coroutine::{CoroutineImpl, Record, RecordState, YieldStatus};
use crate::io::{EpollSelector, Interest, Selector, Timeout, Timer};

thread_local! {
    static LOCAL: UnsafeCell<MaybeUninit<Scheduler>> = UnsafeCell::new(MaybeUninit::uninit());
    static LOCAL_INIT: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

/// Per-thread cooperative scheduler (SPEC_FULL §3/§4.4).
pub struct Scheduler {
    ready: VecDeque<Record>,
    waiting: Slab<Record>,
    selector: EpollSelector,
}

impl Scheduler {
    fn new() -> Self {
        Self {
            ready: VecDeque::with_capacity(64),
            waiting: Slab::with_capacity(64),
            selector: EpollSelector::new().expect("failed to create epoll selector"),
        }
    }

    /// Initializes the thread-local scheduler for the calling thread. Must
    /// be called once per worker thread before [`spawn`]/[`run`].
    pub fn init() {
        LOCAL.with(|cell| unsafe { (*cell.get()).write(Scheduler::new()) });
        LOCAL_INIT.with(|flag| flag.set(true));
    }

    /// Runs `with` against the current thread's scheduler.
    ///
    /// # Panics
    /// If called before [`Scheduler::init`] on this thread.
    pub fn with<R>(with: impl FnOnce(&mut Scheduler) -> R) -> R {
        assert!(
            LOCAL_INIT.with(|flag| flag.get()),
            "Scheduler::init() must be called on this thread first"
        );
        LOCAL.with(|cell| {
            let scheduler = unsafe { (*cell.get()).assume_init_mut() };
            with(scheduler)
        })
    }

    /// Queues `body` to run on this thread's scheduler.
    pub fn spawn(&mut self, body: CoroutineImpl) {
        self.ready.push_back(Record::new(body));
    }

    /// Drives the ready queue and the reactor until both are empty (SPEC_FULL §4.4).
    pub fn run(&mut self) {
        loop {
            self.drain_ready_once();

            if self.ready.is_empty() {
                if self.waiting.is_empty() {
                    break;
                }
                self.poll_and_wake(Timeout::Block);
            } else {
                self.poll_and_wake(Timeout::Immediate);
            }
        }
    }

    fn drain_ready_once(&mut self) {
        let rounds = self.ready.len();
        for _ in 0..rounds {
            let Some(mut record) = self.ready.pop_front() else {
                break;
            };
            record.state = RecordState::Running;

            match Pin::new(&mut record.body).resume(()) {
                CoroutineState::Complete(()) => {
                    record.state = RecordState::Finished;
                }
                CoroutineState::Yielded(YieldStatus::Yield) => {
                    record.state = RecordState::Suspended;
                    self.ready.push_back(record);
                }
                CoroutineState::Yielded(YieldStatus::Never) => {
                    unreachable!("YieldStatus::Never must never actually be yielded");
                }
                CoroutineState::Yielded(YieldStatus::SleepFd(fd, interest)) => {
                    self.park(record, fd, interest, false);
                }
                CoroutineState::Yielded(YieldStatus::SleepMs(duration)) => match Timer::arm(duration) {
                    Ok(timer_fd) => self.park(record, timer_fd, Interest::Readable, true),
                    Err(_) => {
                        crate::log_warn!("timer creation failed, falling back to an un-timed yield");
                        record.state = RecordState::Suspended;
                        self.ready.push_back(record);
                    }
                },
            }
        }
    }

    fn park(&mut self, mut record: Record, fd: std::os::fd::RawFd, interest: Interest, owns_fd: bool) {
        record.state = RecordState::Sleeping;
        record.waiting_fd = fd;
        record.waiting_interest = Some(interest);
        record.owns_fd = owns_fd;
        let token = self.waiting.insert(record);
        if let Err(e) = self.selector.register(fd, interest, token) {
            crate::log_error!("fatal reactor registration error on fd {fd}: {e}");
            panic!("fatal reactor registration error: {e}");
        }
    }

    fn poll_and_wake(&mut self, timeout: Timeout) {
        let tokens = match self.selector.poll(timeout) {
            Ok(tokens) => tokens,
            Err(e) => {
                crate::log_error!("reactor poll failed: {e}");
                return;
            }
        };

        for token in tokens {
            if !self.waiting.contains(token) {
                continue;
            }
            let mut record = self.waiting.remove(token);
            let fd = record.waiting_fd;
            let _ = self.selector.deregister(fd);
            if record.owns_fd {
                Timer::drain(fd);
                let _ = nix::unistd::close(fd);
            }
            record.waiting_fd = -1;
            record.waiting_interest = None;
            record.state = RecordState::Ready;
            self.ready.push_back(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn yielding_coroutine_runs_to_completion() {
        Scheduler::init();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = ran.clone();

        Scheduler::with(|scheduler| {
            let body = crate::spawn_body!({
                yield YieldStatus::Yield;
                ran_clone.fetch_add(1, Ordering::SeqCst);
            });
            scheduler.spawn(body);
            scheduler.run();
        });

        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn two_coroutines_interleave_round_robin() {
        Scheduler::init();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let order_a = order.clone();
        let order_b = order.clone();

        Scheduler::with(|scheduler| {
            scheduler.spawn(crate::spawn_body!({
                order_a.lock().unwrap().push('a');
                yield YieldStatus::Yield;
                order_a.lock().unwrap().push('a');
            }));
            scheduler.spawn(crate::spawn_body!({
                order_b.lock().unwrap().push('b');
                yield YieldStatus::Yield;
                order_b.lock().unwrap().push('b');
            }));
            scheduler.run();
        });

        assert_eq!(*order.lock().unwrap(), vec!['a', 'b', 'a', 'b']);
    }

    #[test]
    fn empty_scheduler_exits_immediately() {
        Scheduler::init();
        Scheduler::with(|scheduler| {
            scheduler.run();
        });
    }
}
