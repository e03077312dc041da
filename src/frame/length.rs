//! Payload length.

use super::MAX_PAYLOAD_LEN;
use crate::error::FrameError;

/// Payload length.
///
/// Only the 7-bit form is implemented, 0 - 125.
/// The 16-bit and 64-bit extensions (flag 126, 127) are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLen(u8);

impl PayloadLen {
    /// Parse from number.
    #[inline]
    pub const fn from_num(n: usize) -> Result<Self, FrameError> {
        if n > MAX_PAYLOAD_LEN {
            Err(FrameError::PayloadTooLarge(n))
        } else {
            Ok(PayloadLen(n as u8))
        }
    }

    /// Convert to number.
    #[inline]
    pub const fn to_num(self) -> usize { self.0 as usize }

    /// Read the low 7 bits of the second frame byte.
    #[inline]
    pub const fn from_flag(b: u8) -> Result<Self, FrameError> {
        match b & 0x7f {
            126 | 127 => Err(FrameError::ExtendedLength),
            b => Ok(PayloadLen(b)),
        }
    }

    /// Generate the flag byte, which is the real length.
    #[inline]
    pub const fn to_flag(self) -> u8 { self.0 }
}
