use crate::util::FixedVec;

use super::{Headers, Method};

/// A path parameter captured by the router (SPEC_FULL §3/§4.6).
#[derive(Debug, Clone, Copy)]
pub struct Param<'a> {
    pub name: &'a [u8],
    pub value: &'a [u8],
}

/// A parsed HTTP request. Every view borrows from the connection's read
/// buffer and is valid only until the handler returns (SPEC_FULL §3).
#[derive(Debug)]
pub struct Request<'a> {
    pub method: Method,
    pub path: &'a [u8],
    pub params: FixedVec<Param<'a>, 16>,
    pub headers: Headers<'a>,
    pub body: &'a [u8],
}

impl<'a> Request<'a> {
    /// Looks up a path parameter by name.
    pub fn param(&self, name: &[u8]) -> Option<&'a [u8]> {
        self.params.iter().find(|p| p.name == name).map(|p| p.value)
    }
}
