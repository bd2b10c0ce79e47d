//! TCP plumbing under C7/C8: thin, non-blocking, owning-fd wrappers with no
//! yielding of their own. Grounded on
//! `src/engine/src/io/sys/unix/epoll/net.rs` (socket/bind/listen/setsockopt
//! call shape, `SO_REUSEADDR`+`SO_REUSEPORT`) and
//! `src/engine/net/tcp/{listener,stream}.rs` (owning-fd-with-`Drop` shape),
//! adapted to return plain `io::Result` instead of routing every operation
//! through the selector — the retry-on-`EAGAIN`-with-`yield` loop lives in
//! the connection driver (`crate::server`), not here, per
//! `original_source/src/platform/linux/impl.c`'s division of labor.

mod listener;
mod stream;

pub use listener::TcpListener;
pub use stream::TcpStream;
