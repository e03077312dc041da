//! Fin flag and opcode.

/// Fin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fin {
    /// a byte with its leading bit set
    Y = 0x80,

    /// a byte with its leading bit clear
    N = 0x00,
}

/// Frame opcode.
///
/// Only text, binary and close frames are understood,
/// anything else is carried as [`OpCode::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// denotes a text frame, 0x01
    Text,
    /// denotes a binary frame, 0x02
    Binary,
    /// denotes a connection close, 0x08
    Close,
    /// any other value of the low 4 bits
    Unsupported(u8),
}

impl Fin {
    /// Parse from byte, only the leading bit is inspected.
    #[inline]
    pub const fn from_flag(b: u8) -> Self {
        if b & 0x80 == 0x80 {
            Fin::Y
        } else {
            Fin::N
        }
    }
}

impl OpCode {
    /// Parse from byte.
    #[inline]
    pub const fn from_flag(b: u8) -> Self {
        use OpCode::*;
        match b & 0x0f {
            0x01 => Text,
            0x02 => Binary,
            0x08 => Close,
            b => Unsupported(b),
        }
    }

    /// Generate the low 4 bits of the first frame byte.
    #[inline]
    pub const fn to_flag(self) -> u8 {
        use OpCode::*;
        match self {
            Text => 0x01,
            Binary => 0x02,
            Close => 0x08,
            Unsupported(b) => b & 0x0f,
        }
    }

    /// Text or binary.
    #[inline]
    pub const fn is_data(self) -> bool { matches!(self, OpCode::Text | OpCode::Binary) }
}
