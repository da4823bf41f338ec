//! Ed25519 secret key handling.

use std::fmt::{self, Debug};
use std::str::FromStr;

use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};

use crate::error::ParseKeyError;

/// Length of an ed25519 seed in bytes.
pub const SEED_LEN: usize = 32;

/// Length of an ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// An ed25519 secret key.
///
/// Accepts the 32-byte seed form, or the 64-byte `seed || public key` form
/// used by some wallet files (only the seed half is kept).
///
/// The key material never appears in `Debug` output.
#[derive(Clone)]
pub struct SecretKey {
    inner: SigningKey,
}

impl SecretKey {
    /// Create a secret key from a 32-byte seed.
    pub fn from_seed(seed: [u8; SEED_LEN]) -> Self {
        Self {
            inner: SigningKey::from_bytes(&seed),
        }
    }

    /// Create a secret key from raw bytes (32-byte seed or 64-byte seed || public key).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        match bytes.len() {
            SEED_LEN | 64 => {
                let mut seed = [0u8; SEED_LEN];
                seed.copy_from_slice(&bytes[..SEED_LEN]);
                Ok(Self::from_seed(seed))
            }
            other => Err(ParseKeyError::InvalidLength(other)),
        }
    }

    /// Parse a hex-encoded secret key.
    pub fn from_hex(s: &str) -> Result<Self, ParseKeyError> {
        let bytes = hex::decode(s.trim()).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Get the public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.inner.verifying_key().to_bytes()
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.inner.sign(message).to_bytes()
    }
}

impl FromStr for SecretKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(public: {})", hex::encode(self.public_key_bytes()))
    }
}

/// Verify an ed25519 signature against raw public key bytes.
pub fn verify_signature(public_key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
        return false;
    };
    key.verify(message, &signature).is_ok()
}
