/// Wraps a block of code as a `move` coroutine literal.
///
/// The `if true { .. } else { yield .. }` shape exists only so the block is
/// guaranteed to contain a `yield`, which is what makes the closure a
/// coroutine rather than a plain closure even on code paths that happen
/// never to suspend.
#[macro_export]
macro_rules! coro_body {
    ($code:block) => {
        #[coroutine]
        move || {
            if true {
                $code
            } else {
                yield $crate::coroutine::YieldStatus::Yield;
            }
        }
    };
}

/// Boxes and pins a coroutine body, producing a [`crate::coroutine::CoroutineImpl`].
#[macro_export]
macro_rules! spawn_body {
    ($code:block) => {
        ::std::boxed::Box::pin($crate::coro_body!($code))
    };
}
