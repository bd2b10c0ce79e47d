//! Demonstrates assembling an [`App`] and calling [`run`] to serve it.
//! Run with `cargo run --bin demo` (features enabled in the crate's own
//! `Cargo.toml`, no extra flags needed).

use loomhttp::{App, Request, Response, ServerConfig};

fn index<'a>(_req: &Request<'a>) -> Response<'a> {
    Response::with_body(200, b"welcome")
}

fn greet<'a>(req: &Request<'a>) -> Response<'a> {
    match req.param(b"name") {
        Some(name) => {
            let mut response = Response::new(200);
            response.headers.set(b"Content-Type", b"text/plain");
            response.body = name;
            response
        }
        None => Response::new(400),
    }
}

fn echo<'a>(req: &Request<'a>) -> Response<'a> {
    Response::with_body(200, req.body)
}

fn main() {
    let app = App::new()
        .get("/", index)
        .get("/hello/:name", greet)
        .post("/echo", echo);

    let config = ServerConfig {
        port: 7070,
        ..Default::default()
    };

    if let Err(e) = loomhttp::run(app, config) {
        eprintln!("server exited with an error: {e}");
        std::process::exit(1);
    }
}
