//! Well-known-slots + overflow-list header representation (SPEC_FULL §3/§9):
//! a performance shape, not a semantic one. What must be preserved is
//! case-insensitive key match, last-write-wins on set, clear-on-empty-value
//! for well-known slots, and insertion-order iteration for overflow.
//!
//! Grounded on `original_source/src/core/feather.c`'s
//! `feather_response_set_header` (case-insensitive replace-or-append over
//! the overflow array) and `original_source/include/feather.h`'s
//! `FeatherHeader`.

/// Headers shared by requests and responses. Values borrow from the
/// connection's read/write buffer (zero-copy).
#[derive(Debug, Default, Clone)]
pub struct Headers<'a> {
    pub authorization: Option<&'a [u8]>,
    pub cookie: Option<&'a [u8]>,
    pub content_type: Option<&'a [u8]>,
    pub content_length: Option<&'a [u8]>,
    pub connection: Option<&'a [u8]>,
    overflow: Vec<(&'a [u8], &'a [u8])>,
}

fn well_known_slot<'a, 'h>(
    headers: &'h mut Headers<'a>,
    key: &[u8],
) -> Option<&'h mut Option<&'a [u8]>> {
    if key.eq_ignore_ascii_case(b"authorization") {
        Some(&mut headers.authorization)
    } else if key.eq_ignore_ascii_case(b"cookie") {
        Some(&mut headers.cookie)
    } else if key.eq_ignore_ascii_case(b"content-type") {
        Some(&mut headers.content_type)
    } else if key.eq_ignore_ascii_case(b"content-length") {
        Some(&mut headers.content_length)
    } else if key.eq_ignore_ascii_case(b"connection") {
        Some(&mut headers.connection)
    } else {
        None
    }
}

impl<'a> Headers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, case-insensitively. A well-known key assigns
    /// its dedicated slot (an empty value clears it, equivalent to
    /// removal); any other key replaces the first overflow entry with a
    /// case-insensitively matching key, or appends if none matches.
    pub fn set(&mut self, key: &'a [u8], value: &'a [u8]) {
        if let Some(slot) = well_known_slot(self, key) {
            *slot = if value.is_empty() { None } else { Some(value) };
            return;
        }

        for (existing_key, existing_value) in self.overflow.iter_mut() {
            if existing_key.eq_ignore_ascii_case(key) {
                *existing_value = value;
                return;
            }
        }
        self.overflow.push((key, value));
    }

    /// Looks up a value by key, case-insensitively.
    pub fn get(&self, key: &[u8]) -> Option<&'a [u8]> {
        if key.eq_ignore_ascii_case(b"authorization") {
            return self.authorization;
        }
        if key.eq_ignore_ascii_case(b"cookie") {
            return self.cookie;
        }
        if key.eq_ignore_ascii_case(b"content-type") {
            return self.content_type;
        }
        if key.eq_ignore_ascii_case(b"content-length") {
            return self.content_length;
        }
        if key.eq_ignore_ascii_case(b"connection") {
            return self.connection;
        }
        self.overflow
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    }

    /// Iterates every set header, well-known slots first (in a fixed
    /// order), then overflow entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static [u8], &'a [u8])> + '_ {
        let well_known = [
            (b"Authorization".as_slice(), self.authorization),
            (b"Cookie".as_slice(), self.cookie),
            (b"Content-Type".as_slice(), self.content_type),
            (b"Content-Length".as_slice(), self.content_length),
            (b"Connection".as_slice(), self.connection),
        ];

        well_known
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .chain(self.overflow.iter().map(|&(k, v)| (k, v)))
    }
}
