use std::fmt::{Display, Formatter};

use crate::frame::MAX_PAYLOAD_LEN;

#[derive(Debug, PartialEq, Eq)]
pub enum FrameError {
    /// fin bit clear, continuation is not supported
    Fragmented,

    /// 7-bit length above 125, extended length is not implemented
    ExtendedLength,

    /// opcode other than text, binary or close
    UnsupportedOpCode(u8),

    /// outgoing payload above 125 bytes, nothing was written
    PayloadTooLarge(usize),

    /// stream ended in the middle of a frame
    Eof,
}

impl FrameError {
    /// Fragmented or extended-length frame.
    #[inline]
    pub const fn is_unsupported_framing(&self) -> bool {
        matches!(self, FrameError::Fragmented | FrameError::ExtendedLength)
    }
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            Fragmented => write!(f, "Unsupported framing: fragmented frame"),
            ExtendedLength => write!(f, "Unsupported framing: extended payload length"),
            UnsupportedOpCode(b) => write!(f, "Unsupported opcode: {:#04x}", b),
            PayloadTooLarge(n) => write!(
                f,
                "Payload too large: {} bytes, at most {} allowed",
                n, MAX_PAYLOAD_LEN
            ),
            Eof => write!(f, "Stream ended inside a frame"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
