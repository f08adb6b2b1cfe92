//! One-time handover codes
//!
//! An OTP is 4 cryptographically random bytes rendered as 8 lowercase hex
//! characters: fixed length, printable, easy to read out at handover. What
//! gets persisted for verification is a salted SHA-256 digest in the form
//! `hex(salt):hex(digest)`; verification recomputes the digest and compares
//! it with a constant-time primitive so that timing does not leak how many
//! prefix characters matched.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// OTP length in random bytes (8 hex chars on the wire)
const OTP_BYTES: usize = 4;

/// Salt length in bytes
const SALT_BYTES: usize = 16;

/// Generate a fresh random OTP
pub fn generate() -> String {
    let mut bytes = [0u8; OTP_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compute the salted hash of an OTP with a fresh random salt
pub fn hash(otp: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_with_salt(&salt, otp);
    format!("{}:{}", hex::encode(salt), hex::encode(digest))
}

/// Verify a candidate OTP against a stored `hex(salt):hex(digest)` value
///
/// Returns `false` for malformed stored values rather than erroring; a
/// record that cannot be parsed can never verify.
pub fn verify(candidate: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once(':') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };
    let computed = digest_with_salt(&salt, candidate);
    ring::constant_time::verify_slices_are_equal(&computed, &expected).is_ok()
}

fn digest_with_salt(salt: &[u8], otp: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(otp.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_fixed_length_printable_hex() {
        for _ in 0..32 {
            let otp = generate();
            assert_eq!(otp.len(), OTP_BYTES * 2);
            assert!(otp.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn hash_round_trips() {
        let otp = generate();
        let stored = hash(&otp);
        assert!(verify(&otp, &stored));
        assert!(!verify("00000000", &stored));
    }

    #[test]
    fn same_otp_hashes_differently_per_order() {
        let otp = generate();
        assert_ne!(hash(&otp), hash(&otp));
    }

    #[test]
    fn malformed_stored_values_never_verify() {
        assert!(!verify("a1b2c3d4", "no-separator"));
        assert!(!verify("a1b2c3d4", "zz:zz"));
        assert!(!verify("a1b2c3d4", ""));
    }
}
