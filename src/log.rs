//! Structured-enough logging (C9). The teacher carries no logging crate
//! anywhere in its dependency tree and logs diagnostics with bare
//! `println!`/`eprintln!`; this module keeps that mechanism but gives every
//! line a level tag and the calling thread's name so multi-worker output
//! stays attributable.
//!
//! Request logging (`log_request`) is recovered from `original_source`'s
//! `feather_log_request`, which the distilled spec dropped; the original's
//! compile-time `FEATHER_LOG` switch becomes [`crate::config::ServerConfig`]'s
//! `log_requests` runtime flag.

use std::thread;

#[doc(hidden)]
pub fn thread_tag() -> String {
    thread::current()
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| "worker".to_owned())
}

/// Logs an `info`-level line to stdout.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        println!("[info][{}] {}", $crate::log::thread_tag(), format!($($arg)*));
    };
}

/// Logs a `debug`-level line to stdout.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        println!("[debug][{}] {}", $crate::log::thread_tag(), format!($($arg)*));
    };
}

/// Logs a `warn`-level line to stderr.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        eprintln!("[warn][{}] {}", $crate::log::thread_tag(), format!($($arg)*));
    };
}

/// Logs an `error`-level line to stderr.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        eprintln!("[error][{}] {}", $crate::log::thread_tag(), format!($($arg)*));
    };
}

/// Logs one completed request: method, path, status, and elapsed time.
///
/// Grounded on `original_source/include/feather.h`'s `FEATHER_LOG_REQUEST` /
/// `feather_log_request`. The original's stray debug `printf("AAA\n")` is
/// not carried over — it reads as an accidental leftover in the source it
/// was recovered from, not an intended part of the facility.
pub fn log_request(method: &str, path: &str, status: u16, elapsed: std::time::Duration) {
    println!(
        "[info][{}] {method} {path} {status} {}us",
        thread_tag(),
        elapsed.as_micros()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn thread_tag_falls_back_when_unnamed() {
        // The test harness thread is typically unnamed.
        let tag = thread_tag();
        assert!(!tag.is_empty());
    }

    #[test]
    fn log_request_does_not_panic() {
        log_request("GET", "/home", 200, Duration::from_micros(42));
    }
}
