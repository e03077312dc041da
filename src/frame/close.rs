//! Close status code.

/// A websocket close code, sent as the 2-byte payload of a close frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CloseCode {
    /// 1000, the purpose of the connection has been fulfilled.
    Normal,
    /// 1001, an endpoint is going away.
    Away,
    /// 1002, an endpoint received a frame it could not parse.
    Protocol,
    /// 1003, an endpoint received a type of data it cannot accept.
    Unsupported,
    /// 1008, generic policy violation.
    Policy,
    /// 1009, a message is too big to process.
    Size,
    /// 1011, the server hit an unexpected condition.
    Error,
    /// Anything else.
    Other(u16),
}

impl From<u16> for CloseCode {
    fn from(code: u16) -> Self {
        use CloseCode::*;
        match code {
            1000 => Normal,
            1001 => Away,
            1002 => Protocol,
            1003 => Unsupported,
            1008 => Policy,
            1009 => Size,
            1011 => Error,
            code => Other(code),
        }
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        use CloseCode::*;
        match code {
            Normal => 1000,
            Away => 1001,
            Protocol => 1002,
            Unsupported => 1003,
            Policy => 1008,
            Size => 1009,
            Error => 1011,
            Other(code) => code,
        }
    }
}

impl CloseCode {
    /// Big endian, as it goes on the wire.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] { u16::from(self).to_be_bytes() }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn close_code() {
        for v in [1000_u16, 1001, 1002, 1003, 1008, 1009, 1011, 4000] {
            assert_eq!(u16::from(CloseCode::from(v)), v);
        }
        assert_eq!(CloseCode::Normal.to_bytes(), [0x03, 0xe8]);
        assert_eq!(CloseCode::from(3000), CloseCode::Other(3000));
    }
}
