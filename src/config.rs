//! Engine configuration.

use std::time::Duration;

/// 80
pub const DEFAULT_PORT: u16 = 80;

/// 4, the socket count of the small ethernet chips this runs on
pub const DEFAULT_MAX_CONNECTIONS: usize = 4;

/// Listening port, advertised subprotocol and read timeout.
///
/// The pool size is not here, it is the const parameter of
/// [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    port: u16,
    subprotocol: Option<String>,
    read_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            subprotocol: None,
            read_timeout: None,
        }
    }
}

impl Config {
    /// Defaults: port 80, no subprotocol, no read timeout.
    #[inline]
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub const fn port(&self) -> u16 { self.port }

    #[inline]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The single subprotocol sent back when a client requests one.
    #[inline]
    pub fn subprotocol(&self) -> Option<&str> { self.subprotocol.as_deref() }

    #[inline]
    pub fn with_subprotocol<S: Into<String>>(mut self, protocol: S) -> Self {
        self.subprotocol = Some(protocol.into());
        self
    }

    /// Applied to every accepted connection by transports that
    /// support it.
    #[inline]
    pub const fn read_timeout(&self) -> Option<Duration> { self.read_timeout }

    #[inline]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}
