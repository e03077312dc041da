use std::fmt::{Display, Formatter};

use crate::handshake::HeaderFlags;

/// Every variant is a malformed upgrade request,
/// the variant records which check failed.
#[derive(Debug, PartialEq, Eq)]
pub enum HandshakeError {
    /// a header line exceeds [`MAX_LINE_LENGTH`](crate::handshake::MAX_LINE_LENGTH)
    LineTooLong,

    /// one or more mandatory headers are absent or hold an illegal value,
    /// carries the flags that were seen
    MissingHeaders(HeaderFlags),

    /// stream ended before anything was read
    Eof,
}

impl Display for HandshakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HandshakeError::*;
        match self {
            LineTooLong => write!(f, "Malformed request: header line too long"),

            MissingHeaders(seen) => write!(
                f,
                "Malformed request: missing or illegal headers {}",
                seen.missing()
            ),

            Eof => write!(f, "Malformed request: empty request"),
        }
    }
}

impl std::error::Error for HandshakeError {}
