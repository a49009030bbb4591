//! Challenge signing and verification

use crate::{CryptoError, CryptoResult, KeyPair, PublicKey};
use ed25519_dalek::{Signature as Ed25519Signature, Signer, Verifier};
use serde::{Deserialize, Serialize};

/// A detached signature over challenge bytes
///
/// The public key travels separately in the payment request, so the
/// signature itself is just the hex-encoded 64 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSignature(pub String);

impl ChallengeSignature {
    /// Sign raw challenge bytes
    pub fn sign(keypair: &KeyPair, challenge: &[u8]) -> CryptoResult<Self> {
        let signature = keypair
            .signing_key()
            .try_sign(challenge)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        Ok(Self(hex::encode(signature.to_bytes())))
    }

    /// Create from a hex string as received on the wire
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The hex encoding
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Verify against challenge bytes under the supplied public key
    ///
    /// A well-formed signature that simply does not match yields
    /// `Ok(false)`; a malformed signature or key is an error.
    pub fn verify(&self, public_key: &PublicKey, challenge: &[u8]) -> CryptoResult<bool> {
        let signature_bytes = hex::decode(&self.0)
            .map_err(|e| CryptoError::InvalidSignatureFormat(e.to_string()))?;

        if signature_bytes.len() != 64 {
            return Err(CryptoError::InvalidSignatureFormat(
                "Signature must be 64 bytes".to_string(),
            ));
        }

        let mut sig_array = [0u8; 64];
        sig_array.copy_from_slice(&signature_bytes);

        let signature = Ed25519Signature::from_bytes(&sig_array);
        let verifying_key = public_key.to_verifying_key()?;

        match verifying_key.verify(challenge, &signature) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let keypair = KeyPair::generate();
        let challenge = b"provender-mandate-v1|mandate_x|cart_y|payer|1000|USD|300|0";

        let signature = ChallengeSignature::sign(&keypair, challenge).unwrap();
        assert!(signature
            .verify(&keypair.public_key(), challenge)
            .unwrap());
    }

    #[test]
    fn test_mutated_challenge_fails() {
        let keypair = KeyPair::generate();
        let challenge = b"challenge-bytes";

        let signature = ChallengeSignature::sign(&keypair, challenge).unwrap();
        assert!(!signature
            .verify(&keypair.public_key(), b"challenge-bytez")
            .unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let keypair1 = KeyPair::generate();
        let keypair2 = KeyPair::generate();
        let challenge = b"challenge-bytes";

        let signature = ChallengeSignature::sign(&keypair1, challenge).unwrap();
        assert!(!signature
            .verify(&keypair2.public_key(), challenge)
            .unwrap());
    }

    #[test]
    fn test_malformed_signature_is_error() {
        let keypair = KeyPair::generate();
        let garbage = ChallengeSignature::from_hex("zzzz");
        assert!(garbage.verify(&keypair.public_key(), b"x").is_err());

        let short = ChallengeSignature::from_hex("abcd");
        assert!(short.verify(&keypair.public_key(), b"x").is_err());
    }
}
