use crate::error::Error;
use crate::frame::{OpCode, Payload};

/// What a single [`poll`](super::Engine::poll) observed.
#[derive(Debug)]
pub enum Outcome<H> {
    /// nothing is ready
    NoEvent,

    /// handshake succeeded, the slot is open;
    /// `subprotocol_requested` tells whether the client asked for a subprotocol,
    /// which was then advertised if one is configured
    Connected {
        slot: usize,
        request_uri: String,
        subprotocol_requested: bool,
    },

    /// a text or binary frame arrived, the slot stays open
    MessageReceived {
        slot: usize,
        opcode: OpCode,
        payload: Payload,
    },

    /// the peer closed, the close was echoed, the slot is closed
    Closed { slot: usize },

    /// handshake or frame failure, or an event the slot cannot explain
    ProtocolError { slot: usize, reason: Error },

    /// a new connection found no free slot, it is left to the caller
    CapacityExhausted(H),
}

impl<H> Outcome<H> {
    /// Slot the outcome refers to.
    #[inline]
    pub const fn slot(&self) -> Option<usize> {
        use Outcome::*;
        match self {
            Connected { slot, .. }
            | MessageReceived { slot, .. }
            | Closed { slot }
            | ProtocolError { slot, .. } => Some(*slot),
            NoEvent | CapacityExhausted(_) => None,
        }
    }

    #[inline]
    pub const fn is_event(&self) -> bool { !matches!(self, Outcome::NoEvent) }

    /// Forward to the matching callback.
    pub fn dispatch<C: Handler + ?Sized>(&self, handler: &mut C) {
        use Outcome::*;
        match self {
            NoEvent => {}
            Connected { slot, request_uri, .. } => handler.on_open(*slot, request_uri),
            MessageReceived {
                slot,
                opcode,
                payload,
            } => handler.on_message(*slot, *opcode, payload),
            Closed { slot } => handler.on_close(*slot),
            ProtocolError { slot, reason } => handler.on_error(Some(*slot), reason),
            CapacityExhausted(_) => handler.on_error(None, &Error::CapacityExhausted),
        }
    }
}

/// Callbacks, every one of them optional.
///
/// Invoked from [`poll_with`](super::Engine::poll_with) before it returns.
pub trait Handler {
    fn on_open(&mut self, _slot: usize, _request_uri: &str) {}

    fn on_message(&mut self, _slot: usize, _opcode: OpCode, _payload: &[u8]) {}

    fn on_close(&mut self, _slot: usize) {}

    /// `slot` is `None` when no slot was free.
    fn on_error(&mut self, _slot: Option<usize>, _reason: &Error) {}
}
