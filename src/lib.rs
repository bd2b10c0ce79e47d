#![feature(coroutines, coroutine_trait, trait_alias)]

//! A minimal HTTP/1.1 application server built on a userspace cooperative
//! coroutine runtime: a per-thread scheduler multiplexes many in-flight
//! connections over a single epoll readiness reactor, with N worker threads
//! sharing a port via `SO_REUSEPORT`.

#[macro_use]
mod macros;

pub mod config;
pub mod coroutine;
pub mod error;
pub mod http;
pub mod io;
pub mod log;
pub mod net;
pub mod router;
pub mod scheduler;
pub mod server;
pub mod util;

pub use config::ServerConfig;
pub use error::ServerError;
pub use http::method::Method;
pub use http::request::Request;
pub use http::response::Response;
pub use router::Router;
pub use server::{run, App};
