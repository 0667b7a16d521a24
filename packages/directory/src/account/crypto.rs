//! Credential hashing and access-code generation.
//!
//! Salts are 16 bytes from the OS CSPRNG, hex-encoded. Hashes are SHA-256
//! over `salt || credential`, rendered as lowercase hex. Access codes are
//! 6 characters drawn uniformly from the 62-symbol alphanumeric alphabet.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

const SALT_BYTES: usize = 16;
const CODE_LENGTH: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fresh per-account salt (hex-encoded).
pub(crate) fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a credential with an account's salt.
pub(crate) fn hash_credential(salt: &str, credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(credential.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a one-time access code.
pub(crate) fn generate_access_code() -> String {
    let mut code = String::with_capacity(CODE_LENGTH);
    for _ in 0..CODE_LENGTH {
        let index = OsRng.gen_range(0..CODE_ALPHABET.len());
        code.push(CODE_ALPHABET[index] as char);
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salt_is_hex_of_sixteen_bytes() {
        let salt = generate_salt();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn salts_are_unique_per_call() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn hash_is_deterministic_lowercase_hex() {
        let hash = hash_credential("00ff", "testPass");
        assert_eq!(hash, hash_credential("00ff", "testPass"));
        assert_eq!(hash.len(), 64);
        assert!(hash
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_depends_on_salt_and_credential() {
        let hash = hash_credential("00ff", "testPass");
        assert_ne!(hash, hash_credential("00fe", "testPass"));
        assert_ne!(hash, hash_credential("00ff", "testpass"));
    }

    #[test]
    fn hash_is_never_the_literal_credential() {
        assert_ne!(hash_credential("00ff", "testPass"), "testPass");
    }

    #[test]
    fn access_code_is_six_alphanumeric_characters() {
        let code = generate_access_code();
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn access_codes_vary_between_calls() {
        // 62^6 possibilities; a repeat here points at a broken generator.
        assert_ne!(generate_access_code(), generate_access_code());
    }
}
