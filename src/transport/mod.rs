//! Byte-stream transport the engine runs on.
//!
//! The engine never owns sockets. It asks a [`Transport`] which
//! connection is ready, and reads or writes that connection through
//! an opaque handle.

pub mod memory;

cfg_if::cfg_if! {
    if #[cfg(feature = "net")] {
        pub mod tcp;
    }
}

use std::io::{Read, Write, Result};

/// Connection source.
pub trait Transport {
    /// Connection identity.
    ///
    /// Two handles compare equal only if they refer to the very same
    /// connection, never because two connections look alike.
    type Handle: Clone + PartialEq + std::fmt::Debug;

    /// A connection with pending activity, either a brand-new one or
    /// an existing one with data to read.
    fn accept_ready(&mut self) -> Option<Self::Handle>;

    /// A read on `handle` would not block.
    fn is_data_available(&mut self, handle: &Self::Handle) -> bool;

    /// Next byte, `None` at end of stream or on failure.
    fn read_byte(&mut self, handle: &Self::Handle) -> Option<u8>;

    /// Write all bytes.
    fn write_bytes(&mut self, handle: &Self::Handle, bytes: &[u8]) -> Result<()>;

    /// Close the connection, the handle is dead afterwards.
    fn close(&mut self, handle: &Self::Handle);
}

/// One connection of a transport, as a [`Read`] + [`Write`] stream.
///
/// Reads hand out one byte at a time, so nothing beyond what the
/// caller asked for is taken from the connection.
pub struct Conn<'a, T: Transport> {
    transport: &'a mut T,
    handle: &'a T::Handle,
}

impl<'a, T: Transport> Conn<'a, T> {
    /// Constructor.
    #[inline]
    pub fn new(transport: &'a mut T, handle: &'a T::Handle) -> Self { Self { transport, handle } }

    /// The underlying handle.
    #[inline]
    pub fn handle(&self) -> &T::Handle { self.handle }
}

impl<'a, T: Transport> Read for Conn<'a, T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.transport.read_byte(self.handle) {
            Some(b) => {
                buf[0] = b;
                Ok(1)
            }
            // EOF
            None => Ok(0),
        }
    }
}

impl<'a, T: Transport> Write for Conn<'a, T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.transport.write_bytes(self.handle, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

impl<'a, T: Transport> std::fmt::Debug for Conn<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conn").field("handle", self.handle).finish()
    }
}
