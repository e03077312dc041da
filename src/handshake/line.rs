//! CRLF terminated header lines.

use std::io::Read;

use super::MAX_LINE_LENGTH;
use crate::error::{Error, HandshakeError};

/// Header line buffer.
pub type LineBuf = [u8; MAX_LINE_LENGTH];

/// Read one header line into `buf`, byte by byte, so that nothing
/// after the line is consumed from the stream.
///
/// Returns the length of the line without its line break,
/// or `None` when the stream ends before a line break is seen.
/// A line (line break included) longer than [`MAX_LINE_LENGTH`]
/// yields [`HandshakeError::LineTooLong`].
pub fn read_line<R: Read>(r: &mut R, buf: &mut LineBuf) -> Result<Option<usize>, Error> {
    let mut n = 0;
    let mut b = [0_u8; 1];

    loop {
        if r.read(&mut b)? == 0 {
            return Ok(None);
        }

        if b[0] == b'\n' {
            // tolerate a bare LF
            let len = if n > 0 && buf[n - 1] == b'\r' { n - 1 } else { n };
            return Ok(Some(len));
        }

        // one slot is kept for the trailing LF
        if n + 1 >= MAX_LINE_LENGTH {
            return Err(HandshakeError::LineTooLong.into());
        }

        buf[n] = b[0];
        n += 1;
    }
}
