use crate::Sha256;
use secp256k1::{ecdsa, Message, SecretKey, SECP256K1};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Seed: {0} does not derive a valid secp256k1 secret key")]
    InvalidSeed(String),
    #[error("Failed to sign data: {0}")]
    Signing(String),
}

/// The key that locks a transaction output. Only the holder of the matching private key can
/// authorize spending the output.
#[derive(Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    pub fn new(public_key: secp256k1::PublicKey) -> Self {
        Self(public_key)
    }

    /// Returns true iff `proof` is a DER-encoded ECDSA signature by this key over the
    /// SHA-256 digest of `data`.
    /// A proof that cannot be parsed is reported as invalid, never as an error.
    pub fn verify(&self, data: &[u8], proof: &[u8]) -> bool {
        let signature = match ecdsa::Signature::from_der(proof) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        let message = match Message::from_digest_slice(Sha256::digest(data).as_slice()) {
            Ok(message) => message,
            Err(_) => return false,
        };
        SECP256K1
            .verify_ecdsa(&message, &signature, &self.0)
            .is_ok()
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0.serialize()))
    }
}

/// A secp256k1 signing key.
#[derive(Clone)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    /// Deterministically derives a key from the SHA-256 digest of `seed`.
    pub fn from_seed(seed: &[u8]) -> Result<Self, KeyError> {
        let digest = Sha256::digest(seed);
        SecretKey::from_slice(digest.as_slice())
            .map(Self)
            .map_err(|_| KeyError::InvalidSeed(hex::encode(seed)))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(secp256k1::PublicKey::from_secret_key_global(&self.0))
    }

    /// Signs the SHA-256 digest of `data` and returns the DER-encoded signature.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, KeyError> {
        let message = Message::from_digest_slice(Sha256::digest(data).as_slice())
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        let signature = SECP256K1.sign_ecdsa(&message, &self.0);
        Ok(signature.serialize_der().to_vec())
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Never print the secret itself.
        write!(f, "PrivateKey({})", self.public_key())
    }
}

/// Checks that `proof` authorizes `data` on behalf of `public_key`.
pub fn verify_signature(public_key: &PublicKey, data: &[u8], proof: &[u8]) -> bool {
    public_key.verify(data, proof)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let key = PrivateKey::from_seed(b"alice").unwrap();
        let signature = key.sign(b"spend output 0").unwrap();
        assert!(verify_signature(
            &key.public_key(),
            b"spend output 0",
            &signature
        ));
    }

    #[test]
    fn verify_fails_for_other_data() {
        let key = PrivateKey::from_seed(b"alice").unwrap();
        let signature = key.sign(b"spend output 0").unwrap();
        assert!(!verify_signature(
            &key.public_key(),
            b"spend output 1",
            &signature
        ));
    }

    #[test]
    fn verify_fails_for_other_key() {
        let alice = PrivateKey::from_seed(b"alice").unwrap();
        let bob = PrivateKey::from_seed(b"bob").unwrap();
        let signature = alice.sign(b"data").unwrap();
        assert!(!verify_signature(&bob.public_key(), b"data", &signature));
    }

    #[test]
    fn malformed_proof_is_invalid() {
        let key = PrivateKey::from_seed(b"alice").unwrap();
        assert!(!verify_signature(&key.public_key(), b"data", &[]));
        assert!(!verify_signature(&key.public_key(), b"data", &[0x30, 0x01, 0xff]));
    }

    #[test]
    fn keys_from_the_same_seed_are_equal() {
        let first = PrivateKey::from_seed(b"carol").unwrap();
        let second = PrivateKey::from_seed(b"carol").unwrap();
        assert_eq!(first.public_key(), second.public_key());
        assert_eq!(first.public_key().to_string().len(), 66);
    }
}
