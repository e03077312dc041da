//! Websocket server engine.
//!
//! One [`Engine`] owns a [`Transport`] and a fixed table of `N` slots.
//! The caller polls it; each poll handles at most one ready
//! connection and reports one [`Outcome`].
//!
//! ```text
//! CLOSED --handshake ok--> OPEN --close / error--> CLOSED
//! ```

mod send;
mod outcome;

pub use outcome::{Outcome, Handler};

use log::{debug, trace, warn};

use crate::config::{Config, DEFAULT_MAX_CONNECTIONS};
use crate::error::{Error, FrameError};
use crate::frame::{self, CloseCode, OpCode};
use crate::handshake;
use crate::slot::{Binding, SlotTable, State};
use crate::transport::{Conn, Transport};

/// Poll driven websocket server.
pub struct Engine<T: Transport, const N: usize = DEFAULT_MAX_CONNECTIONS> {
    transport: T,
    slots: SlotTable<T::Handle, N>,
    config: Config,
}

impl<T: Transport, const N: usize> std::fmt::Debug for Engine<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("slots", &self.slots)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Transport, const N: usize> Engine<T, N> {
    /// Constructor, every slot starts closed.
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            slots: SlotTable::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config { &self.config }

    #[inline]
    pub fn transport(&self) -> &T { &self.transport }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T { &mut self.transport }

    /// State of a slot, `None` if out of range.
    #[inline]
    pub fn state(&self, slot: usize) -> Option<State> { self.slots.state(slot) }

    /// Handle bound to a slot.
    #[inline]
    pub fn handle(&self, slot: usize) -> Option<&T::Handle> { self.slots.handle(slot) }

    /// Indexes of open slots.
    #[inline]
    pub fn open_slots(&self) -> impl Iterator<Item = usize> + '_ { self.slots.open_slots() }

    /// Handle at most one ready connection.
    pub fn poll(&mut self) -> Outcome<T::Handle> {
        let handle = match self.transport.accept_ready() {
            Some(h) => h,
            None => return Outcome::NoEvent,
        };

        match self.slots.match_or_allocate(&handle) {
            Ok(Binding::Existing(slot)) => self.on_ready(slot, handle),
            Ok(Binding::New(slot)) => self.on_connect(slot, handle),
            Err(_) => {
                warn!("engine: no free slot for {:?}", handle);
                Outcome::CapacityExhausted(handle)
            }
        }
    }

    /// [`poll`](Self::poll), then invoke the matching callback.
    pub fn poll_with<C: Handler + ?Sized>(&mut self, handler: &mut C) -> Outcome<T::Handle> {
        let outcome = self.poll();
        outcome.dispatch(handler);
        outcome
    }

    /// Brand-new connection, bound to a closed slot: handshake.
    fn on_connect(&mut self, slot: usize, handle: T::Handle) -> Outcome<T::Handle> {
        trace!("engine: {:?} bound to slot {}", handle, slot);

        let result = {
            let mut conn = Conn::new(&mut self.transport, &handle);
            handshake::perform(&mut conn, self.config.subprotocol())
        };

        match result {
            Ok(accepted) => {
                self.slots.transition(slot, State::Open);
                debug!("engine: slot {} open at {}", slot, accepted.request_uri);
                Outcome::Connected {
                    slot,
                    request_uri: accepted.request_uri,
                    subprotocol_requested: accepted.subprotocol_requested,
                }
            }
            Err(reason) => {
                debug!("engine: slot {} handshake rejected: {}", slot, reason);
                self.fail(slot);
                Outcome::ProtocolError { slot, reason }
            }
        }
    }

    /// Known connection: read one frame.
    fn on_ready(&mut self, slot: usize, handle: T::Handle) -> Outcome<T::Handle> {
        // leave the slot alone, the event is unexplained
        if self.slots.state(slot) != Some(State::Open) || !self.transport.is_data_available(&handle) {
            debug!("engine: slot {} ready without data", slot);
            return Outcome::ProtocolError {
                slot,
                reason: Error::StateMismatch(slot),
            };
        }

        let result = {
            let mut conn = Conn::new(&mut self.transport, &handle);
            frame::decode(&mut conn)
        };

        let frame = match result {
            Ok(frame) => frame,
            Err(reason) => {
                debug!("engine: slot {} decode failed: {}", slot, reason);
                self.fail(slot);
                return Outcome::ProtocolError { slot, reason };
            }
        };

        if !frame.masked {
            debug!("engine: slot {} sent an unmasked frame", slot);
        }
        trace!(
            "engine: slot {} received {:?}, {} bytes",
            slot,
            frame.opcode,
            frame.payload.len()
        );

        match frame.opcode {
            OpCode::Text | OpCode::Binary => Outcome::MessageReceived {
                slot,
                opcode: frame.opcode,
                payload: frame.payload,
            },
            OpCode::Close => {
                if let Err(e) = self.send_close(slot, CloseCode::Normal) {
                    debug!("engine: slot {} close echo failed: {}", slot, e);
                }
                debug!("engine: slot {} closed by peer", slot);
                Outcome::Closed { slot }
            }
            OpCode::Unsupported(b) => {
                self.fail(slot);
                Outcome::ProtocolError {
                    slot,
                    reason: FrameError::UnsupportedOpCode(b).into(),
                }
            }
        }
    }

    /// Collapse a slot to closed and drop its connection.
    fn fail(&mut self, slot: usize) {
        if let Some(handle) = self.slots.transition(slot, State::Closed) {
            self.transport.close(&handle);
        }
    }
}
