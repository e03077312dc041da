//! In-memory transport.
//!
//! Every connection is a pair of byte queues. Pushing bytes to a
//! connection marks it ready, the way a socket layer reports a
//! readable client. A connection with unread input stays ready until
//! it is drained. Useful for tests and for running the engine on a
//! host without a network stack.

use std::collections::VecDeque;
use std::io::{Error, ErrorKind, Result};

use super::Transport;

/// Connection identity, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHandle(usize);

#[derive(Debug, Default)]
struct Pipe {
    input: VecDeque<u8>,
    output: Vec<u8>,
    closed: bool,
}

/// Queue backed [`Transport`].
#[derive(Debug, Default)]
pub struct MemoryTransport {
    pipes: Vec<Pipe>,
    ready: VecDeque<MemoryHandle>,
    // round robin start of the pending input scan
    cursor: usize,
}

impl MemoryTransport {
    /// Constructor.
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Open a new connection, it is reported once it has data
    /// or is notified.
    pub fn connect(&mut self) -> MemoryHandle {
        self.pipes.push(Pipe::default());
        MemoryHandle(self.pipes.len() - 1)
    }

    /// Queue inbound bytes and mark the connection ready.
    /// Ignored once the connection is closed.
    pub fn push(&mut self, handle: &MemoryHandle, data: &[u8]) {
        if let Some(pipe) = self.pipe_mut(handle) {
            pipe.input.extend(data);
            if !self.ready.contains(handle) {
                self.ready.push_back(*handle);
            }
        }
    }

    /// Mark the connection ready without queueing data.
    pub fn notify(&mut self, handle: &MemoryHandle) {
        if self.pipe(handle).is_some_and(|p| !p.closed) {
            self.ready.push_back(*handle);
        }
    }

    /// Drain everything written to the connection so far.
    pub fn take_output(&mut self, handle: &MemoryHandle) -> Vec<u8> {
        self.pipes
            .get_mut(handle.0)
            .map(|p| std::mem::take(&mut p.output))
            .unwrap_or_default()
    }

    /// Bytes queued but not yet read.
    pub fn pending_input(&self, handle: &MemoryHandle) -> usize {
        self.pipes.get(handle.0).map_or(0, |p| p.input.len())
    }

    /// Whether [`Transport::close`] was called on the connection.
    pub fn is_closed(&self, handle: &MemoryHandle) -> bool {
        self.pipes.get(handle.0).map_or(true, |p| p.closed)
    }

    #[inline]
    fn pipe(&self, handle: &MemoryHandle) -> Option<&Pipe> { self.pipes.get(handle.0) }

    #[inline]
    fn pipe_mut(&mut self, handle: &MemoryHandle) -> Option<&mut Pipe> {
        self.pipes.get_mut(handle.0).filter(|p| !p.closed)
    }
}

impl Transport for MemoryTransport {
    type Handle = MemoryHandle;

    fn accept_ready(&mut self) -> Option<MemoryHandle> {
        while let Some(handle) = self.ready.pop_front() {
            if !self.is_closed(&handle) {
                return Some(handle);
            }
        }

        // level triggered: anything left unread is still ready
        let n = self.pipes.len();
        for i in 0..n {
            let idx = (self.cursor + i) % n;
            let pipe = &self.pipes[idx];
            if !pipe.closed && !pipe.input.is_empty() {
                self.cursor = idx + 1;
                return Some(MemoryHandle(idx));
            }
        }
        None
    }

    fn is_data_available(&mut self, handle: &MemoryHandle) -> bool {
        self.pipe_mut(handle).is_some_and(|p| !p.input.is_empty())
    }

    fn read_byte(&mut self, handle: &MemoryHandle) -> Option<u8> {
        self.pipe_mut(handle).and_then(|p| p.input.pop_front())
    }

    fn write_bytes(&mut self, handle: &MemoryHandle, bytes: &[u8]) -> Result<()> {
        match self.pipe_mut(handle) {
            Some(pipe) => {
                pipe.output.extend_from_slice(bytes);
                Ok(())
            }
            None => Err(Error::new(ErrorKind::NotConnected, "connection closed")),
        }
    }

    fn close(&mut self, handle: &MemoryHandle) {
        if let Some(pipe) = self.pipes.get_mut(handle.0) {
            pipe.closed = true;
            pipe.input.clear();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ready_order() {
        let mut transport = MemoryTransport::new();
        let a = transport.connect();
        let b = transport.connect();
        assert_ne!(a, b);
        assert_eq!(transport.accept_ready(), None);

        transport.push(&b, b"1");
        transport.push(&a, b"2");
        transport.push(&b, b"3");
        assert_eq!(transport.accept_ready(), Some(b));
        assert_eq!(transport.accept_ready(), Some(a));
        assert_eq!(transport.read_byte(&a), Some(b'2'));
        assert_eq!(transport.read_byte(&b), Some(b'1'));
        assert_eq!(transport.read_byte(&b), Some(b'3'));
        assert_eq!(transport.accept_ready(), None);

        // an explicit notify is reported even without data
        transport.notify(&a);
        assert_eq!(transport.accept_ready(), Some(a));
        assert_eq!(transport.accept_ready(), None);
    }

    #[test]
    fn unread_input_stays_ready() {
        let mut transport = MemoryTransport::new();
        let a = transport.connect();
        let b = transport.connect();

        transport.push(&a, b"ab");
        transport.push(&b, b"c");
        assert_eq!(transport.accept_ready(), Some(a));
        assert_eq!(transport.accept_ready(), Some(b));

        // nothing read yet, both come back round robin
        assert_eq!(transport.accept_ready(), Some(a));
        assert_eq!(transport.accept_ready(), Some(b));
        assert_eq!(transport.accept_ready(), Some(a));

        transport.read_byte(&a);
        transport.read_byte(&a);
        assert_eq!(transport.accept_ready(), Some(b));
        assert_eq!(transport.accept_ready(), Some(b));

        transport.close(&b);
        assert_eq!(transport.accept_ready(), None);
    }

    #[test]
    fn closed_connection() {
        let mut transport = MemoryTransport::new();
        let a = transport.connect();
        transport.push(&a, b"data");
        transport.close(&a);

        assert!(transport.is_closed(&a));
        assert_eq!(transport.accept_ready(), None);
        assert!(!transport.is_data_available(&a));
        assert_eq!(transport.read_byte(&a), None);
        assert!(transport.write_bytes(&a, b"x").is_err());

        transport.push(&a, b"more");
        assert_eq!(transport.pending_input(&a), 0);
    }
}
