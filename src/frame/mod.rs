//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5),
//! restricted to single, unfragmented frames with a 7-bit length.
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Masking-key, if MASK set   |
//! |I|S|S|S|  (4)  |A|     (7)     |                               |
//! |N|V|V|V|       |S|  (0 - 125)  |                               |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------+ - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! +---------------------------------------------------------------+
//! ```
//!

pub mod flag;
pub mod length;
pub mod mask;
pub mod close;
pub mod payload;

pub use flag::{Fin, OpCode};
pub use length::PayloadLen;
pub use mask::Mask;
pub use close::CloseCode;
pub use payload::Payload;

use std::io::{Read, Write, ErrorKind};

use crate::error::{Error, FrameError};

/// 125, the largest payload a 7-bit length can carry.
pub const MAX_PAYLOAD_LEN: usize = 125;

/// 2 + 4, two flag bytes and a mask key.
pub const MAX_HEAD_LEN: usize = 6;

/// Websocket frame head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: Fin,
    pub opcode: OpCode,
    pub mask: Mask,
    pub length: PayloadLen,
}

impl FrameHead {
    /// Constructor.
    #[inline]
    pub const fn new(fin: Fin, opcode: OpCode, mask: Mask, length: PayloadLen) -> Self {
        Self {
            fin,
            opcode,
            mask,
            length,
        }
    }

    /// Encode to provided buffer, returns the count of written bytes.
    pub fn encode(&self, buf: &mut [u8; MAX_HEAD_LEN]) -> usize {
        // fin, opcode
        buf[0] = self.fin as u8 | self.opcode.to_flag();

        // mask, payload length
        buf[1] = self.mask.to_flag() | self.length.to_flag();

        // mask key
        match &self.mask {
            Mask::Key(k) => {
                buf[2..6].copy_from_slice(k);
                6
            }
            Mask::None => 2,
        }
    }

    /// Read a frame head from the stream.
    ///
    /// The first byte is checked before the second one is read,
    /// so a fragmented frame is rejected after a single byte.
    pub fn decode<R: Read>(r: &mut R) -> Result<Self, Error> {
        let mut b = [0_u8; 2];

        // fin, opcode
        read_exact(r, &mut b[..1])?;
        let fin = Fin::from_flag(b[0]);
        if fin == Fin::N {
            return Err(FrameError::Fragmented.into());
        }
        let opcode = OpCode::from_flag(b[0]);

        // mask, payload length
        read_exact(r, &mut b[1..])?;
        let length = PayloadLen::from_flag(b[1])?;

        let mask = if Mask::is_set(b[1]) {
            let mut key = [0_u8; 4];
            read_exact(r, &mut key)?;
            Mask::Key(key)
        } else {
            Mask::None
        };

        Ok(FrameHead {
            fin,
            opcode,
            mask,
            length,
        })
    }
}

/// A complete, unmasked frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub opcode: OpCode,
    /// whether the peer masked it
    pub masked: bool,
    pub payload: Payload,
}

impl Frame {
    /// Build an outgoing frame, fails if the payload is too large.
    pub fn new(opcode: OpCode, payload: &[u8]) -> Result<Self, FrameError> {
        Ok(Self {
            opcode,
            masked: false,
            payload: Payload::new_with_data(payload)?,
        })
    }

    /// Close frame carrying a status code.
    pub fn close(code: CloseCode) -> Self {
        let mut payload = Payload::with_len(2);
        payload.as_mut().copy_from_slice(&code.to_bytes());
        Self {
            opcode: OpCode::Close,
            masked: false,
            payload,
        }
    }

    /// Status code of a close frame, if present.
    pub fn close_code(&self) -> Option<CloseCode> {
        match (self.opcode, &*self.payload) {
            (OpCode::Close, [hi, lo, ..]) => Some(u16::from_be_bytes([*hi, *lo]).into()),
            _ => None,
        }
    }

    /// Read one frame, unmasking its payload if a mask key is present.
    ///
    /// Unmasked client frames are tolerated.
    pub fn decode<R: Read>(r: &mut R) -> Result<Self, Error> {
        let head = FrameHead::decode(r)?;

        let mut payload = Payload::with_len(head.length.to_flag());
        read_exact(r, payload.as_mut())?;

        let masked = match head.mask {
            Mask::Key(key) => {
                mask::apply_mask(key, payload.as_mut());
                true
            }
            Mask::None => false,
        };

        Ok(Self {
            opcode: head.opcode,
            masked,
            payload,
        })
    }

    /// Write as a server frame (never masked), returns the count of written bytes.
    pub fn encode<W: Write>(&self, w: &mut W) -> Result<usize, Error> {
        self.encode_with(w, Mask::None)
    }

    /// Write as a client frame, masked with `key`.
    pub fn encode_masked<W: Write>(&self, w: &mut W, key: [u8; 4]) -> Result<usize, Error> {
        self.encode_with(w, Mask::Key(key))
    }

    fn encode_with<W: Write>(&self, w: &mut W, mask: Mask) -> Result<usize, Error> {
        let length = PayloadLen::from_num(self.payload.len())?;
        let head = FrameHead::new(Fin::Y, self.opcode, mask, length);

        // assemble the whole frame, then issue a single write
        let mut buf = [0_u8; MAX_HEAD_LEN + MAX_PAYLOAD_LEN];
        let mut head_buf = [0_u8; MAX_HEAD_LEN];
        let head_n = head.encode(&mut head_buf);
        buf[..head_n].copy_from_slice(&head_buf[..head_n]);

        let total = head_n + self.payload.len();
        let data = &mut buf[head_n..total];
        data.copy_from_slice(&self.payload);
        if let Mask::Key(key) = mask {
            mask::apply_mask(key, data);
        }

        w.write_all(&buf[..total])?;
        Ok(total)
    }
}

/// Encode a server frame straight from a slice.
///
/// Payloads above [`MAX_PAYLOAD_LEN`] are rejected before
/// anything is written.
#[inline]
pub fn encode<W: Write>(w: &mut W, opcode: OpCode, payload: &[u8]) -> Result<usize, Error> {
    Frame::new(opcode, payload)?.encode(w)
}

/// Encode a close frame with a status code.
#[inline]
pub fn encode_close<W: Write>(w: &mut W, code: CloseCode) -> Result<usize, Error> {
    Frame::close(code).encode(w)
}

/// Decode a frame from the stream.
#[inline]
pub fn decode<R: Read>(r: &mut R) -> Result<Frame, Error> { Frame::decode(r) }

#[inline]
fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), Error> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => Error::Frame(FrameError::Eof),
        _ => Error::Io(e),
    })
}
