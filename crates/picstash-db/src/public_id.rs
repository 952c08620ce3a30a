//! Public identifiers: the 128 bits of an image's primary key written in
//! base62, left-padded to a fixed width. Callers only ever see these tokens.

use uuid::Uuid;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// 62^22 > 2^128 > 62^21.
pub const ENCODED_LEN: usize = 22;

pub fn encode(id: Uuid) -> String {
    let mut value = id.as_u128();
    let mut buf = [b'0'; ENCODED_LEN];

    for slot in buf.iter_mut().rev() {
        *slot = ALPHABET[(value % 62) as usize];
        value /= 62;
    }

    // Every byte comes from ALPHABET.
    buf.iter().map(|&b| b as char).collect()
}

/// `None` when the token cannot be the encoding of any key. Only the
/// padded form is accepted, so each key has exactly one token.
pub fn decode(token: &str) -> Option<Uuid> {
    if token.len() != ENCODED_LEN {
        return None;
    }

    let mut value: u128 = 0;
    for byte in token.bytes() {
        let digit = digit_value(byte)?;
        value = value.checked_mul(62)?.checked_add(digit as u128)?;
    }

    Some(Uuid::from_u128(value))
}

fn digit_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'Z' => Some(byte - b'A' + 10),
        b'a'..=b'z' => Some(byte - b'a' + 36),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width() {
        assert_eq!(encode(Uuid::nil()), "0".repeat(ENCODED_LEN));
        assert_eq!(encode(Uuid::max()).len(), ENCODED_LEN);
        assert_eq!(encode(Uuid::new_v4()).len(), ENCODED_LEN);
    }

    #[test]
    fn digit_positions() {
        assert_eq!(encode(Uuid::from_u128(61)), format!("{}z", "0".repeat(21)));
        assert_eq!(encode(Uuid::from_u128(62)), format!("{}10", "0".repeat(20)));
    }

    #[test]
    fn decodes_what_it_encodes() {
        for id in [Uuid::nil(), Uuid::max(), Uuid::from_u128(62), Uuid::new_v4(), Uuid::new_v4()] {
            assert_eq!(decode(&encode(id)), Some(id));
        }
    }

    #[test]
    fn one_token_per_key() {
        assert_eq!(decode("10"), None);
        assert_eq!(decode(&"0".repeat(ENCODED_LEN - 1)), None);
        assert_eq!(decode(&format!("{}10", "0".repeat(20))), Some(Uuid::from_u128(62)));
    }

    #[test]
    fn rejects_foreign_tokens() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("nonexistent-token"), None);
        assert_eq!(decode("abc def"), None);
        assert_eq!(decode(&"0".repeat(ENCODED_LEN + 1)), None);
        // Valid characters, but past 2^128.
        assert_eq!(decode(&"z".repeat(ENCODED_LEN)), None);
    }
}
