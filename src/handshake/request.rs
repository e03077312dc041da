//! Client upgrade request.
//!
//! From [RFC-6455 Section 4.2.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2.1):
//!
//! The client's opening handshake consists of the following parts.  If
//! the server, while reading the handshake, finds that the client did
//! not send a handshake that matches the description below, the server
//! MUST stop processing the client's handshake and return an HTTP
//! response with an appropriate error code.
//!
//! Example:
//!
//! ```text
//! GET /path HTTP/1.1
//! host: www.example.com
//! upgrade: websocket
//! connection: upgrade
//! sec-websocket-key: dGhlIHNhbXBsZSBub25jZQ==
//! sec-websocket-version: 13
//! ```
//!
//! Lines may come in any order, unknown lines are ignored.

use std::io::Read;

use super::HeaderFlags;
use super::line::{read_line, LineBuf};
use super::{MAX_LINE_LENGTH, HTTP_METHOD};
use super::static_headers::*;

use crate::error::{Error, HandshakeError};

/// Upgrade request, collected line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub uri: String,
    pub sec_key: Vec<u8>,
    pub flags: HeaderFlags,
}

/// First whitespace separated token.
#[inline]
fn first_token(s: &[u8]) -> &[u8] {
    s.split(|b| *b == b' ' || *b == b'\t')
        .find(|t| !t.is_empty())
        .unwrap_or(b"")
}

/// Case insensitive prefix match, returns what follows the prefix.
#[inline]
fn strip_prefix_ignore_case<'a>(line: &'a [u8], prefix: &[u8]) -> Option<&'a [u8]> {
    if line.len() >= prefix.len() && line[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

impl Request {
    /// Empty record, no flag set.
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Classify one header line, recording what it provides.
    pub fn classify(&mut self, line: &[u8]) {
        // request line, the method is case sensitive
        if let Some(rest) = line.strip_prefix(HTTP_METHOD) {
            let uri = first_token(rest);
            let sep = matches!(rest.first(), Some(b' ' | b'\t'));
            if sep && !uri.is_empty() {
                self.uri = String::from_utf8_lossy(uri).into_owned();
                self.flags.insert(HeaderFlags::GET);
            }
        } else if strip_prefix_ignore_case(line, HEADER_HOST).is_some() {
            self.flags.insert(HeaderFlags::HOST);
        } else if let Some(v) = strip_prefix_ignore_case(line, HEADER_UPGRADE) {
            if first_token(v).eq_ignore_ascii_case(HEADER_UPGRADE_VALUE) {
                self.flags.insert(HeaderFlags::UPGRADE);
            }
        } else if strip_prefix_ignore_case(line, HEADER_CONNECTION).is_some() {
            self.flags.insert(HeaderFlags::CONNECTION);
        } else if strip_prefix_ignore_case(line, HEADER_SEC_WEBSOCKET_PROTOCOL).is_some() {
            self.flags.insert(HeaderFlags::SUBPROTOCOL);
        } else if let Some(v) = strip_prefix_ignore_case(line, HEADER_SEC_WEBSOCKET_KEY) {
            let key = first_token(v);
            if !key.is_empty() {
                self.sec_key = key.to_vec();
                self.flags.insert(HeaderFlags::SEC_WEBSOCKET_KEY);
            }
        } else if let Some(v) = strip_prefix_ignore_case(line, HEADER_SEC_WEBSOCKET_VERSION) {
            if first_token(v) == HEADER_SEC_WEBSOCKET_VERSION_VALUE {
                self.flags.insert(HeaderFlags::SEC_WEBSOCKET_VERSION);
            }
        }
    }

    /// All mandatory headers were seen.
    #[inline]
    pub const fn is_complete(&self) -> bool { self.flags.is_complete() }

    /// Whether the client asked for a subprotocol.
    #[inline]
    pub const fn wants_subprotocol(&self) -> bool { self.flags.contains(HeaderFlags::SUBPROTOCOL) }

    /// Read header lines until a blank line or the end of stream,
    /// then check that all mandatory headers are present.
    pub fn read<R: Read>(r: &mut R) -> Result<Self, Error> {
        let mut request = Request::new();
        let mut buf: LineBuf = [0; MAX_LINE_LENGTH];
        let mut lines = 0_usize;

        while let Some(n) = read_line(r, &mut buf)? {
            if n == 0 {
                break;
            }
            lines += 1;
            request.classify(&buf[..n]);
        }

        if lines == 0 && request.flags.is_empty() {
            return Err(HandshakeError::Eof.into());
        }

        if !request.is_complete() {
            return Err(HandshakeError::MissingHeaders(request.flags).into());
        }

        Ok(request)
    }
}
