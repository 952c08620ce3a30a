use sha2::{Digest, Sha256};

/// One-way digest used both to store and to verify passwords.
/// Lower-case hex of SHA-256, 64 characters. Stored hashes depend on this
/// staying byte-stable.
pub fn hash_password(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_digest() {
        assert_eq!(
            hash_password("d3v3l0p3r7890$"),
            "10078ab05c7f309252ad377791ecb2be3801e2a95e0edbbe9f81e98c1a732f49"
        );
    }

    #[test]
    fn deterministic() {
        assert_eq!(hash_password("hunter22"), hash_password("hunter22"));
        assert_ne!(hash_password("hunter22"), hash_password("hunter23"));
    }

    #[test]
    fn fixed_length_hex() {
        for input in ["", "a", "a much longer passphrase with spaces"] {
            let digest = hash_password(input);
            assert_eq!(digest.len(), 64);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
