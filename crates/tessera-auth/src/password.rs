//! Password hashing and constant-time verification.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a per-password random salt,
//! encoded as `hex(salt)$hex(derived_key)`. The `$` delimiter cannot
//! appear in hex output, so splitting is unambiguous.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// KDF iteration count (OWASP-recommended floor for PBKDF2-SHA256).
const PBKDF2_ITERATIONS: u32 = 390_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Hash a password with a freshly generated 16-byte random salt.
///
/// Two calls with the same password produce different encodings.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let key = derive_key(password, &salt);
    format!("{}${}", hex::encode(salt), hex::encode(key))
}

/// Verify a plaintext password against a stored encoding.
///
/// Malformed encodings (missing delimiter, non-hex parts) verify as
/// `false` rather than erroring. The digest comparison is
/// constant-time to avoid timing side channels.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Some((salt_hex, digest_hex)) = encoded.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(digest) = hex::decode(digest_hex) else {
        return false;
    };

    let derived = derive_key(password, &salt);
    derived.as_slice().ct_eq(&digest).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("Secret123!");
        assert!(verify_password("Secret123!", &hash));
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("Secret123!");
        assert!(!verify_password("secret123!", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn salt_is_randomized() {
        let h1 = hash_password("Secret123!");
        let h2 = hash_password("Secret123!");
        assert_ne!(h1, h2);
        // Both still verify against the original password.
        assert!(verify_password("Secret123!", &h1));
        assert!(verify_password("Secret123!", &h2));
    }

    #[test]
    fn encoding_shape() {
        let hash = hash_password("pw");
        let (salt_hex, digest_hex) = hash.split_once('$').unwrap();
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert_eq!(digest_hex.len(), KEY_LEN * 2);
        assert!(hash.chars().filter(|c| *c == '$').count() == 1);
    }

    #[test]
    fn malformed_encodings_verify_as_false() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "no-delimiter"));
        assert!(!verify_password("pw", "nothex$cafebabe"));
        assert!(!verify_password("pw", "cafebabe$nothex"));
        assert!(!verify_password("pw", "$"));
    }

    #[test]
    fn truncated_digest_does_not_match() {
        let hash = hash_password("pw");
        let truncated = &hash[..hash.len() - 2];
        assert!(!verify_password("pw", truncated));
    }
}
