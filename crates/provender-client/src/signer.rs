//! Mandate signer
//!
//! Holds the payer's Ed25519 keypair for the life of the process and
//! signs raw challenge bytes, never their hex form.

use crate::{ClientResult, IssuedMandate, PaymentOpened, SettlementClient};
use provender_crypto::{ChallengeSignature, KeyPair};

/// Caller-side signing identity
#[derive(Clone)]
pub struct MandateSigner {
    keypair: KeyPair,
}

impl MandateSigner {
    /// Generate an ephemeral process-lifetime keypair
    pub fn ephemeral() -> Self {
        Self {
            keypair: KeyPair::generate(),
        }
    }

    /// Use an existing keypair
    pub fn with_keypair(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// The payer's public key, hex-encoded
    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    /// Sign raw challenge bytes, returning the hex-encoded signature
    pub fn sign(&self, challenge: &[u8]) -> ClientResult<String> {
        let signature = ChallengeSignature::sign(&self.keypair, challenge)?;
        Ok(signature.as_hex().to_string())
    }

    /// Sign an issued mandate's challenge and submit the payment
    pub async fn sign_and_pay(
        &self,
        settlement: &SettlementClient,
        mandate: &IssuedMandate,
    ) -> ClientResult<PaymentOpened> {
        let challenge = mandate.challenge_bytes()?;
        let signature = self.sign(&challenge)?;
        settlement
            .pay(&mandate.mandate_id, &signature, &self.public_key_hex())
            .await
    }
}
