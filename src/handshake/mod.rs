//! Websocket handshake.
//!
//! Read the client's upgrade request line by line, check the
//! mandatory headers, then answer with `101 Switching Protocols`.

pub mod key;
pub mod line;
pub mod request;
pub mod response;

pub use request::Request;
pub use response::Response;
pub use key::derive_accept_key;

use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

use log::{debug, trace};

use crate::error::Error;

/// 128, including the line break
pub const MAX_LINE_LENGTH: usize = 128;

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// GET
pub const HTTP_METHOD: &[u8] = b"GET";

/// CRLF
pub const HTTP_LINE_BREAK: &[u8] = b"\r\n";

/// A colon + one SP is prefered
pub const HTTP_HEADER_SP: &[u8] = b": ";

/// HTTP/1.1 101 Switching Protocols
pub const HTTP_STATUS_LINE: &[u8] = b"HTTP/1.1 101 Switching Protocols";

/// Set of headers seen during a handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFlags(u8);

impl HeaderFlags {
    pub const GET: Self = Self(0x01);
    pub const HOST: Self = Self(0x02);
    pub const UPGRADE: Self = Self(0x04);
    pub const CONNECTION: Self = Self(0x08);
    pub const SEC_WEBSOCKET_KEY: Self = Self(0x10);
    pub const SEC_WEBSOCKET_VERSION: Self = Self(0x20);
    /// optional, does not gate success
    pub const SUBPROTOCOL: Self = Self(0x40);
    /// every mandatory header
    pub const MANDATORY: Self = Self(0x3f);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::GET, "request-line"),
        (Self::HOST, "host"),
        (Self::UPGRADE, "upgrade"),
        (Self::CONNECTION, "connection"),
        (Self::SEC_WEBSOCKET_KEY, "sec-websocket-key"),
        (Self::SEC_WEBSOCKET_VERSION, "sec-websocket-version"),
        (Self::SUBPROTOCOL, "sec-websocket-protocol"),
    ];

    #[inline]
    pub const fn empty() -> Self { Self(0) }

    #[inline]
    pub const fn bits(self) -> u8 { self.0 }

    #[inline]
    pub const fn is_empty(self) -> bool { self.0 == 0 }

    #[inline]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    #[inline]
    pub fn insert(&mut self, other: Self) { self.0 |= other.0 }

    /// All mandatory flags are set.
    #[inline]
    pub const fn is_complete(self) -> bool { self.contains(Self::MANDATORY) }

    /// Mandatory flags not yet set.
    #[inline]
    pub const fn missing(self) -> Self { Self(Self::MANDATORY.0 & !self.0) }
}

impl Display for HeaderFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        write!(f, "[")?;
        for (flag, name) in Self::NAMES.iter() {
            if self.contains(*flag) {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        write!(f, "]")
    }
}

/// Result of a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub request_uri: String,
    pub subprotocol_requested: bool,
}

/// Perform a server handshake on a stream.
///
/// `subprotocol` is advertised only if the client sent a
/// `sec-websocket-protocol` header. Nothing is written unless
/// every mandatory header is present and legal.
pub fn perform<S: Read + Write>(stream: &mut S, subprotocol: Option<&str>) -> Result<Accepted, Error> {
    let request = Request::read(stream)?;
    trace!("handshake: request headers {}", request.flags);

    let subprotocol_requested = request.wants_subprotocol();
    let sec_accept = derive_accept_key(&request.sec_key);
    let protocol = if subprotocol_requested { subprotocol } else { None };
    Response::new(&sec_accept, protocol).send(stream)?;

    debug!("handshake: upgraded {}", request.uri);
    Ok(Accepted {
        request_uri: request.uri,
        subprotocol_requested,
    })
}

/// Header names and values
#[allow(unused)]
pub mod static_headers {
    // request header prefix, matched case insensitive
    pub const HEADER_HOST: &[u8] = b"host:";
    pub const HEADER_UPGRADE: &[u8] = b"upgrade:";
    pub const HEADER_CONNECTION: &[u8] = b"connection:";
    pub const HEADER_SEC_WEBSOCKET_PROTOCOL: &[u8] = b"sec-websocket-protocol:";
    pub const HEADER_SEC_WEBSOCKET_KEY: &[u8] = b"sec-websocket-key:";
    pub const HEADER_SEC_WEBSOCKET_VERSION: &[u8] = b"sec-websocket-version:";

    // response header name
    pub const RESPONSE_UPGRADE: &[u8] = b"Upgrade";
    pub const RESPONSE_CONNECTION: &[u8] = b"Connection";
    pub const RESPONSE_SEC_WEBSOCKET_ACCEPT: &[u8] = b"Sec-WebSocket-Accept";
    pub const RESPONSE_SEC_WEBSOCKET_PROTOCOL: &[u8] = b"Sec-WebSocket-Protocol";

    // header value
    pub const HEADER_UPGRADE_VALUE: &[u8] = b"websocket";
    pub const RESPONSE_CONNECTION_VALUE: &[u8] = b"Upgrade";
    pub const HEADER_SEC_WEBSOCKET_VERSION_VALUE: &[u8] = b"13";
}
