//! Key exchange.

use super::GUID;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha1::{Digest, Sha1};

/// 28, base64 of a 20-byte sha1 digest.
pub const ACCEPT_KEY_LEN: usize = 28;

/// Derive `sec-websocket-accept` from `sec-websocket-key`.
///
/// The raw key is used as received, without decoding or trimming.
#[inline]
pub fn derive_accept_key(sec_key: &[u8]) -> [u8; ACCEPT_KEY_LEN] {
    let mut sha1 = Sha1::default();
    sha1.update(sec_key);
    sha1.update(GUID);
    let input = sha1.finalize();
    let mut output = [0_u8; ACCEPT_KEY_LEN];
    // 20 bytes always encode to exactly 28
    STANDARD.encode_slice(input, &mut output).unwrap();
    output
}

/// Generate a new `sec-websocket-key`, for driving the server from a test client.
#[inline]
pub fn new_sec_key() -> String {
    let input: [u8; 16] = rand::random();
    STANDARD.encode(input)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derive_sec_key() {
        assert_eq!(
            &derive_accept_key(b"dGhlIHNhbXBsZSBub25jZQ=="),
            b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }

    #[test]
    fn generate_sec_key() {
        for _ in 0..=64 {
            let key = new_sec_key();
            assert_eq!(key.len(), 24);
            assert!(derive_accept_key(key.as_bytes())
                .iter()
                .all(|b| b.is_ascii_graphic()));
        }
    }
}
