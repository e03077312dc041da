use log::{debug, warn};

use super::Engine;

use crate::error::Error;
use crate::frame::{Frame, CloseCode, OpCode};
use crate::slot::State;
use crate::transport::{Conn, Transport};

impl<T: Transport, const N: usize> Engine<T, N> {
    /// Send one frame to an open slot, return the number of bytes written.
    ///
    /// A payload above [`MAX_PAYLOAD_LEN`](crate::frame::MAX_PAYLOAD_LEN)
    /// is rejected before anything is written.
    pub fn send(&mut self, slot: usize, opcode: OpCode, payload: &[u8]) -> Result<usize, Error> {
        let frame = Frame::new(opcode, payload)?;
        self.send_frame(slot, &frame)
    }

    /// Send a text frame.
    #[inline]
    pub fn send_text(&mut self, slot: usize, text: &str) -> Result<usize, Error> {
        self.send(slot, OpCode::Text, text.as_bytes())
    }

    /// Send a binary frame.
    #[inline]
    pub fn send_binary(&mut self, slot: usize, data: &[u8]) -> Result<usize, Error> {
        self.send(slot, OpCode::Binary, data)
    }

    /// Send the same frame to every open slot, return how many got it.
    ///
    /// A slot whose transport fails is closed and skipped.
    pub fn broadcast(&mut self, opcode: OpCode, payload: &[u8]) -> Result<usize, Error> {
        let frame = Frame::new(opcode, payload)?;

        let mut sent = 0;
        for slot in 0..N {
            if self.slots.state(slot) != Some(State::Open) {
                continue;
            }
            match self.send_frame(slot, &frame) {
                Ok(_) => sent += 1,
                Err(e) => {
                    warn!("engine: broadcast to slot {} failed: {}", slot, e);
                    self.fail(slot);
                }
            }
        }
        Ok(sent)
    }

    /// Send a close frame with `code`, then close the connection.
    ///
    /// The slot ends up closed whatever its state was. If it was not
    /// open nothing is written and [`Error::NotOpen`] is returned.
    pub fn send_close(&mut self, slot: usize, code: CloseCode) -> Result<usize, Error> {
        let state = self.slots.state(slot).ok_or(Error::InvalidSlot(slot))?;

        let result = if state == State::Open {
            self.send_frame(slot, &Frame::close(code))
        } else {
            Err(Error::NotOpen(slot))
        };

        debug!("engine: slot {} closing with {:?}", slot, code);
        self.fail(slot);
        result
    }

    fn send_frame(&mut self, slot: usize, frame: &Frame) -> Result<usize, Error> {
        match self.slots.state(slot) {
            Some(State::Open) => {}
            Some(State::Closed) => return Err(Error::NotOpen(slot)),
            None => return Err(Error::InvalidSlot(slot)),
        }
        let handle = self.slots.handle(slot).ok_or(Error::NotOpen(slot))?;

        let mut conn = Conn::new(&mut self.transport, handle);
        frame.encode(&mut conn)
    }
}
