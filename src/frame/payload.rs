//! Payload buffer on stack.

use std::ops::Deref;

use super::MAX_PAYLOAD_LEN;
use crate::error::FrameError;

/// Owned frame payload, at most [`MAX_PAYLOAD_LEN`] bytes,
/// kept on stack.
#[derive(Clone, Copy)]
pub struct Payload {
    len: u8,
    buf: [u8; MAX_PAYLOAD_LEN],
}

impl Payload {
    /// Empty payload.
    #[inline]
    pub const fn new() -> Self {
        Self {
            len: 0,
            buf: [0; MAX_PAYLOAD_LEN],
        }
    }

    /// Copy from a slice.
    #[inline]
    pub fn new_with_data(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge(data.len()));
        }
        let mut payload = Self::new();
        payload.buf[..data.len()].copy_from_slice(data);
        payload.len = data.len() as u8;
        Ok(payload)
    }

    /// Zeroed payload of `len` bytes, to be filled by a reader.
    #[inline]
    pub(crate) const fn with_len(len: u8) -> Self {
        let mut payload = Self::new();
        payload.len = len;
        payload
    }

    #[inline]
    pub const fn len(&self) -> usize { self.len as usize }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.len == 0 }

    /// Readable as utf-8 text.
    #[inline]
    pub fn as_str(&self) -> Option<&str> { std::str::from_utf8(self).ok() }
}

impl Default for Payload {
    fn default() -> Self { Self::new() }
}

impl Deref for Payload {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] { &self.buf[..self.len as usize] }
}

impl AsMut<[u8]> for Payload {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] { &mut self.buf[..self.len as usize] }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool { **self == **other }
}

impl Eq for Payload {}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_str() {
            Some(s) => f.debug_tuple("Payload").field(&s).finish(),
            None => f.debug_tuple("Payload").field(&&**self).finish(),
        }
    }
}
