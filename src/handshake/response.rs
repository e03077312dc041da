//! Server upgrade response.
//!
//! From [RFC-6455 Section 4.2.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2.2):
//!
//! ```text
//! HTTP/1.1 101 Switching Protocols
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=
//! Sec-WebSocket-Protocol: chat
//! ```
//!
//! The header order is fixed, the protocol line is only present
//! when the client asked for one.

use std::io::Write;

use super::{HTTP_STATUS_LINE, HTTP_LINE_BREAK, HTTP_HEADER_SP};
use super::key::ACCEPT_KEY_LEN;
use super::static_headers::*;

use crate::error::Error;

/// Http response presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'a> {
    pub sec_accept: &'a [u8; ACCEPT_KEY_LEN],
    pub subprotocol: Option<&'a str>,
}

macro_rules! write_header {
    ($buf: expr, $name: expr, $value: expr) => {{
        $buf.extend_from_slice($name);
        $buf.extend_from_slice(HTTP_HEADER_SP);
        $buf.extend_from_slice($value);
        $buf.extend_from_slice(HTTP_LINE_BREAK);
    }};
}

impl<'a> Response<'a> {
    /// Constructor.
    #[inline]
    pub const fn new(sec_accept: &'a [u8; ACCEPT_KEY_LEN], subprotocol: Option<&'a str>) -> Self {
        Self {
            sec_accept,
            subprotocol,
        }
    }

    /// Encode to a provided buffer, return the number of appended bytes.
    pub fn encode(&self, buf: &mut Vec<u8>) -> usize {
        let start = buf.len();

        buf.extend_from_slice(HTTP_STATUS_LINE);
        buf.extend_from_slice(HTTP_LINE_BREAK);

        write_header!(buf, RESPONSE_UPGRADE, HEADER_UPGRADE_VALUE);
        write_header!(buf, RESPONSE_CONNECTION, RESPONSE_CONNECTION_VALUE);
        write_header!(buf, RESPONSE_SEC_WEBSOCKET_ACCEPT, self.sec_accept);

        if let Some(protocol) = self.subprotocol {
            write_header!(buf, RESPONSE_SEC_WEBSOCKET_PROTOCOL, protocol.as_bytes());
        }

        // finish with CRLF
        buf.extend_from_slice(HTTP_LINE_BREAK);

        buf.len() - start
    }

    /// Encode and write in one go.
    pub fn send<W: Write>(&self, w: &mut W) -> Result<usize, Error> {
        let mut buf = Vec::with_capacity(160);
        let n = self.encode(&mut buf);
        w.write_all(&buf)?;
        Ok(n)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::test::RESPONSE;

    #[test]
    fn encode_response() {
        let response = Response::new(b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo=", None);
        let mut buf = Vec::new();
        let n = response.encode(&mut buf);
        assert_eq!(n, RESPONSE.len());
        assert_eq!(buf, RESPONSE);
    }

    #[test]
    fn encode_response_with_protocol() {
        let response = Response::new(b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo=", Some("chat"));
        let mut out = Vec::new();
        let n = response.send(&mut out).unwrap();
        assert_eq!(n, out.len());

        let expect = [
            &RESPONSE[..RESPONSE.len() - 2],
            &b"Sec-WebSocket-Protocol: chat\r\n\r\n"[..],
        ]
        .concat();
        assert_eq!(out, expect);
    }
}
