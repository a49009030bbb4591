//! Key management for mandate signing

use crate::{CryptoError, CryptoResult};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// An Ed25519 key pair held by a payer
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create from existing signing key bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(bytes);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Get the signing key (private - never expose)
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Get the verifying key (public)
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Get the public key as hex string
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key.as_bytes())
    }

    /// Get the public key wrapper
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_keypair(self)
    }
}

/// Public key reference (safe to share)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    /// Hex-encoded Ed25519 public key
    pub key: String,
}

impl PublicKey {
    /// Create from a key pair
    pub fn from_keypair(keypair: &KeyPair) -> Self {
        Self {
            key: keypair.public_key_hex(),
        }
    }

    /// Create from a hex string as received on the wire
    pub fn from_hex(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Parse the verifying key
    pub fn to_verifying_key(&self) -> CryptoResult<VerifyingKey> {
        let bytes =
            hex::decode(&self.key).map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;

        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyFormat(
                "Public key must be 32 bytes".to_string(),
            ));
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&bytes);

        VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let keypair = KeyPair::generate();
        assert_eq!(keypair.public_key_hex().len(), 64); // 32 bytes = 64 hex chars
    }

    #[test]
    fn test_keypair_from_bytes() {
        let keypair1 = KeyPair::generate();
        let bytes = keypair1.signing_key.to_bytes();
        let keypair2 = KeyPair::from_bytes(&bytes);

        assert_eq!(keypair1.public_key_hex(), keypair2.public_key_hex());
    }

    #[test]
    fn test_public_key_roundtrip() {
        let keypair = KeyPair::generate();
        let public = PublicKey::from_keypair(&keypair);
        let verifying = public.to_verifying_key().unwrap();

        assert_eq!(keypair.verifying_key(), &verifying);
    }

    #[test]
    fn test_malformed_public_key_rejected() {
        assert!(PublicKey::from_hex("not-hex").to_verifying_key().is_err());
        assert!(PublicKey::from_hex("abcd").to_verifying_key().is_err());
    }
}
