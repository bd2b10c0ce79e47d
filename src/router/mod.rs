//! C6: register (method, pattern, handler) triples; match a parsed request,
//! binding path parameters into it. Grounded on
//! `original_source/src/core/feather.c`'s `feather_match_route` and
//! `strip_trailing_slash`, which is the authoritative segment-matching
//! algorithm this module is a direct Rust rendition of.

use crate::http::request::Param;
use crate::http::{Method, Request};

/// A handler produces a response synchronously; it performs no I/O of its
/// own (SPEC_FULL §4.7's handler-boundary note).
pub type HandlerFn = for<'a> fn(&Request<'a>) -> crate::http::Response<'a>;

struct Route {
    method: Method,
    pattern: &'static str,
    handler: HandlerFn,
}

/// An ordered, first-match-by-registration-order route table.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

fn strip_trailing_slash(s: &[u8]) -> &[u8] {
    if s.len() > 1 && s.last() == Some(&b'/') {
        &s[..s.len() - 1]
    } else {
        s
    }
}

fn segments(s: &[u8]) -> impl Iterator<Item = &[u8]> {
    s.split(|&b| b == b'/')
}

/// Attempts to match `pattern` against `path`, writing any captured
/// `:param` segments into `params`. Returns `true` on a full match; on a
/// parameter-array overflow (>16 captures) returns `false` ("no match"
/// rather than writing past the fixed array, SPEC_FULL §4.6/§8).
fn matches<'a>(pattern: &'static str, path: &'a [u8], params: &mut crate::util::FixedVec<Param<'a>, 16>) -> bool {
    if path == b"/" {
        return pattern == "/";
    }

    let pattern = strip_trailing_slash(pattern.as_bytes());
    let path = strip_trailing_slash(path);

    let mut pattern_segments = segments(pattern);
    let mut path_segments = segments(path);

    loop {
        let pattern_seg = pattern_segments.next();
        let path_seg = path_segments.next();

        match (pattern_seg, path_seg) {
            (None, None) => return true,
            (Some(p), Some(s)) if p.is_empty() && s.is_empty() => continue,
            (Some(_), Some(s)) if s.is_empty() => return false,
            (Some(p), Some(_)) if p.is_empty() => return false,
            (Some(p), Some(s)) => {
                if let Some(name) = p.strip_prefix(b":") {
                    if !params.push(Param { name, value: s }) {
                        return false;
                    }
                } else if p != s {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route; order is preserved (first-match semantics).
    pub fn register(&mut self, method: Method, pattern: &'static str, handler: HandlerFn) {
        self.routes.push(Route { method, pattern, handler });
    }

    /// Adds a route in a builder style and returns `self`, so a whole
    /// application can be assembled as one chained expression.
    pub fn add_route(mut self, method: Method, pattern: &'static str, handler: HandlerFn) -> Self {
        self.register(method, pattern, handler);
        self
    }

    pub fn get(self, pattern: &'static str, handler: HandlerFn) -> Self {
        self.add_route(Method::Get, pattern, handler)
    }

    pub fn post(self, pattern: &'static str, handler: HandlerFn) -> Self {
        self.add_route(Method::Post, pattern, handler)
    }

    pub fn put(self, pattern: &'static str, handler: HandlerFn) -> Self {
        self.add_route(Method::Put, pattern, handler)
    }

    pub fn delete(self, pattern: &'static str, handler: HandlerFn) -> Self {
        self.add_route(Method::Delete, pattern, handler)
    }

    pub fn patch(self, pattern: &'static str, handler: HandlerFn) -> Self {
        self.add_route(Method::Patch, pattern, handler)
    }

    /// Returns the first registered route whose method matches and whose
    /// pattern matches `request.path`, with `request.params` populated from
    /// the match. `request.params` is reset before every attempt.
    pub fn find(&self, request: &mut Request<'_>) -> Option<HandlerFn> {
        for route in &self.routes {
            if route.method != request.method {
                continue;
            }
            request.params.clear();
            if matches(route.pattern, request.path, &mut request.params) {
                return Some(route.handler);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    fn ok_handler<'a>(_req: &Request<'a>) -> Response<'a> {
        Response::new(200)
    }

    fn make_request<'a>(method: Method, path: &'a [u8]) -> Request<'a> {
        Request {
            method,
            path,
            params: Default::default(),
            headers: Default::default(),
            body: b"",
        }
    }

    #[test]
    fn matches_static_route() {
        let mut router = Router::new();
        router.register(Method::Get, "/home", ok_handler);
        let mut req = make_request(Method::Get, b"/home");
        assert!(router.find(&mut req).is_some());
    }

    #[test]
    fn captures_path_parameter() {
        let mut router = Router::new();
        router.register(Method::Get, "/user/:id", ok_handler);
        let mut req = make_request(Method::Get, b"/user/42");
        assert!(router.find(&mut req).is_some());
        assert_eq!(req.param(b"id"), Some(b"42".as_slice()));
    }

    #[test]
    fn trailing_slash_is_stripped_on_both_sides() {
        let mut router = Router::new();
        router.register(Method::Get, "/about", ok_handler);
        let mut req = make_request(Method::Get, b"/about/");
        assert!(router.find(&mut req).is_some());
    }

    #[test]
    fn root_path_matches_only_root_pattern() {
        let mut router = Router::new();
        router.register(Method::Get, "/", ok_handler);
        router.register(Method::Get, "/elsewhere", ok_handler);
        let mut req = make_request(Method::Get, b"/");
        let handler = router.find(&mut req);
        assert!(handler.is_some());
    }

    #[test]
    fn method_mismatch_does_not_match() {
        let mut router = Router::new();
        router.register(Method::Get, "/x", ok_handler);
        let mut req = make_request(Method::Post, b"/x");
        assert!(router.find(&mut req).is_none());
    }

    #[test]
    fn first_registered_match_wins() {
        fn handler_a<'a>(_req: &Request<'a>) -> Response<'a> {
            Response::new(201)
        }
        fn handler_b<'a>(_req: &Request<'a>) -> Response<'a> {
            Response::new(202)
        }

        let mut router = Router::new();
        router.register(Method::Get, "/dup", handler_a);
        router.register(Method::Get, "/dup", handler_b);

        let mut req = make_request(Method::Get, b"/dup");
        let handler = router.find(&mut req).unwrap();
        let response = handler(&req);
        assert_eq!(response.status, 201);
    }

    #[test]
    fn more_than_sixteen_params_is_no_match() {
        let pattern: &'static str =
            "/:p1/:p2/:p3/:p4/:p5/:p6/:p7/:p8/:p9/:p10/:p11/:p12/:p13/:p14/:p15/:p16/:p17";
        let mut router = Router::new();
        router.register(Method::Get, pattern, ok_handler);

        let path = "/1/2/3/4/5/6/7/8/9/10/11/12/13/14/15/16/17";
        let mut req = make_request(Method::Get, path.as_bytes());
        assert!(router.find(&mut req).is_none());
    }

    #[test]
    fn builder_style_chains_routes() {
        let router = Router::new()
            .get("/home", ok_handler)
            .post("/home", ok_handler);
        let mut get_req = make_request(Method::Get, b"/home");
        let mut post_req = make_request(Method::Post, b"/home");
        assert!(router.find(&mut get_req).is_some());
        assert!(router.find(&mut post_req).is_some());
    }

    #[test]
    fn params_never_contain_a_slash() {
        let mut router = Router::new();
        router.register(Method::Get, "/user/:id", ok_handler);
        let mut req = make_request(Method::Get, b"/user/42/extra");
        assert!(router.find(&mut req).is_none());
    }
}
