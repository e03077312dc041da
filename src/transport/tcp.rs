//! `std::net` transport.
//!
//! The listener is polled without blocking. Accepted streams are
//! blocking, bounded by the configured read timeout, so that a client
//! stalling mid-frame cannot hold the engine forever.

use std::io::{Read, Write, Result, ErrorKind};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, trace};

use super::Transport;
use crate::config::Config;

/// Connection identity, assigned on accept and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

/// Tcp listener plus its accepted connections.
#[derive(Debug)]
pub struct TcpTransport {
    listener: TcpListener,
    streams: Vec<(ConnId, TcpStream)>,
    next_id: u64,
    // round robin start of the readiness scan
    cursor: usize,
    read_timeout: Option<Duration>,
}

impl TcpTransport {
    /// Listen on all interfaces, on the configured port.
    pub fn bind(config: &Config) -> Result<Self> {
        Self::bind_addr(("0.0.0.0", config.port()), config.read_timeout())
    }

    /// Listen on a specific address.
    pub fn bind_addr<A: ToSocketAddrs>(addr: A, read_timeout: Option<Duration>) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        debug!("tcp: listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            streams: Vec::new(),
            next_id: 0,
            cursor: 0,
            read_timeout,
        })
    }

    /// Bound address.
    #[inline]
    pub fn local_addr(&self) -> Result<SocketAddr> { self.listener.local_addr() }

    /// Number of live connections, bound to a slot or not.
    #[inline]
    pub fn connections(&self) -> usize { self.streams.len() }

    /// Drop a connection the engine could not take.
    #[inline]
    pub fn reject(&mut self, id: &ConnId) { self.close(id) }

    fn stream(&mut self, id: &ConnId) -> Option<&mut TcpStream> {
        self.streams
            .iter_mut()
            .find(|(x, _)| x == id)
            .map(|(_, s)| s)
    }

    fn register(&mut self, stream: TcpStream, peer: SocketAddr) -> Result<ConnId> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(self.read_timeout)?;
        stream.set_nodelay(true)?;

        let id = ConnId(self.next_id);
        self.next_id += 1;
        trace!("tcp: accepted {} as {:?}", peer, id);

        self.streams.push((id, stream));
        Ok(id)
    }
}

/// Readable, or at end of stream.
fn readable(stream: &TcpStream) -> bool {
    let mut b = [0_u8; 1];
    if stream.set_nonblocking(true).is_err() {
        return false;
    }
    let ready = match stream.peek(&mut b) {
        Ok(_) => true,
        Err(ref e) if e.kind() == ErrorKind::WouldBlock => false,
        // a read will report it
        Err(_) => true,
    };
    let _ = stream.set_nonblocking(false);
    ready
}

impl Transport for TcpTransport {
    type Handle = ConnId;

    fn accept_ready(&mut self) -> Option<ConnId> {
        match self.listener.accept() {
            Ok((stream, peer)) => match self.register(stream, peer) {
                Ok(id) => return Some(id),
                Err(e) => debug!("tcp: failed to set up {}: {}", peer, e),
            },
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => debug!("tcp: accept failed: {}", e),
        }

        let n = self.streams.len();
        for i in 0..n {
            let idx = (self.cursor + i) % n;
            let (id, stream) = &self.streams[idx];
            if readable(stream) {
                self.cursor = idx + 1;
                return Some(*id);
            }
        }
        None
    }

    fn is_data_available(&mut self, id: &ConnId) -> bool { self.stream(id).is_some_and(|s| readable(s)) }

    fn read_byte(&mut self, id: &ConnId) -> Option<u8> {
        let stream = self.stream(id)?;
        let mut b = [0_u8; 1];
        match stream.read(&mut b) {
            Ok(1) => Some(b[0]),
            Ok(_) => None,
            Err(e) => {
                trace!("tcp: read from {:?} failed: {}", id, e);
                None
            }
        }
    }

    fn write_bytes(&mut self, id: &ConnId, bytes: &[u8]) -> Result<()> {
        match self.stream(id) {
            Some(stream) => stream.write_all(bytes),
            None => Err(ErrorKind::NotConnected.into()),
        }
    }

    fn close(&mut self, id: &ConnId) {
        if let Some(pos) = self.streams.iter().position(|(x, _)| x == id) {
            let (_, stream) = self.streams.swap_remove(pos);
            let _ = stream.shutdown(Shutdown::Both);
            trace!("tcp: closed {:?}", id);
        }
    }
}
