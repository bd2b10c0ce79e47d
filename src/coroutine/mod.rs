//! C3: the coroutine record and the one vocabulary a coroutine body uses to
//! talk to the scheduler that owns it.
//!
//! Grounded on `src/engine/coroutine/coroutine.rs` (`YieldStatus`,
//! `Coroutine`/`CoroutineImpl`), generalized from the teacher's Tcp-specific
//! yield variants (which carry the I/O operation *and its result pointer*,
//! because the teacher's selector performs the syscall itself) down to the
//! spec's two generic suspension reasons, `SleepFd`/`SleepMs` — this design
//! follows `original_source/src/platform/linux/impl.c` instead, where the
//! coroutine retries its own syscall after being woken and the reactor only
//! ever reports readiness.

mod record;

pub use record::{Record, RecordState};

use std::os::fd::RawFd;
use std::ops::Coroutine as StdCoroutine;
use std::pin::Pin;
use std::time::Duration;

use crate::io::Interest;

/// Default recorded stack-size budget (SPEC_FULL §3). Kept as sizing
/// metadata on [`Record`] even though the underlying execution is a
/// compiler-managed generator state machine rather than a real dedicated
/// stack (see SPEC_FULL §9's compiler-supported-task equivalence).
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

/// The reason a coroutine suspended. The sole channel a coroutine body uses
/// to talk to the scheduler — in this runtime there is no `async`/`await`,
/// only explicit `yield`.
#[derive(Debug)]
pub enum YieldStatus {
    /// Plain cooperative yield: resume me after every other currently-ready
    /// coroutine has had a turn.
    Yield,
    /// Suspend until `fd` is ready for `interest`. The coroutine is
    /// responsible for retrying its own syscall once resumed.
    SleepFd(RawFd, Interest),
    /// Suspend for at least `duration`. Implemented by arming a one-shot
    /// timer and suspending on its readability, exactly like `SleepFd`.
    SleepMs(Duration),
    /// Never actually yielded; exists so [`crate::coro_body`] can contain a
    /// textual `yield` on code paths that never take it.
    Never,
}

/// Alias for `std::ops::Coroutine<Yield = YieldStatus, Return = ()>`. The
/// scheduler only ever drives this shape of coroutine.
pub trait Coroutine = StdCoroutine<Yield = YieldStatus, Return = ()>;

/// A boxed, pinned coroutine ready to be resumed by the scheduler that owns it.
pub type CoroutineImpl = Pin<Box<dyn Coroutine>>;
