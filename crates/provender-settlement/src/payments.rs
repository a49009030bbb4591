//! Payment settlement
//!
//! Verifies a signed mandate, consumes it atomically, opens a
//! `processing` payment, and hands resolution to the configured
//! [`crate::SettlementBackend`] on a background task.

use crate::{MandateStore, PaymentStore, SettlementBackend, SettlementOutcome};
use chrono::Utc;
use provender_crypto::{ChallengeSignature, PublicKey};
use provender_store::modify;
use provender_types::{
    Mandate, MandateId, MandateStatus, Payment, PaymentId, PaymentStatus, ProvenderError, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// A payment request presenting a signed mandate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub mandate_id: MandateId,
    /// Hex-encoded Ed25519 signature over the mandate's challenge bytes
    pub signature: String,
    /// Hex-encoded Ed25519 public key of the payer
    pub public_key: String,
}

/// What the atomic mandate-use step decided
enum UseAttempt {
    Consumed(Mandate),
    Expired(Mandate),
    WrongState(MandateStatus),
    SignatureMismatch,
}

/// Settlement-side payment handling
#[derive(Clone)]
pub struct PaymentSettlement {
    mandates: MandateStore,
    payments: PaymentStore,
    backend: Arc<dyn SettlementBackend>,
}

impl PaymentSettlement {
    pub fn new(
        mandates: MandateStore,
        payments: PaymentStore,
        backend: Arc<dyn SettlementBackend>,
    ) -> Self {
        Self {
            mandates,
            payments,
            backend,
        }
    }

    /// Verify and consume a mandate, returning the opened payment
    ///
    /// The mandate status check, TTL check, signature verification, and
    /// the `Active -> Used` transition all happen inside one atomic store
    /// update, so a mandate can never back two payments.
    pub async fn pay(&self, request: PayRequest) -> Result<Payment> {
        if request.signature.trim().is_empty() {
            return Err(ProvenderError::invalid_request(
                "signature",
                "signature is required",
            ));
        }
        if request.public_key.trim().is_empty() {
            return Err(ProvenderError::invalid_request(
                "publicKey",
                "public key is required",
            ));
        }

        let signature = ChallengeSignature::from_hex(&request.signature);
        let public_key = PublicKey::from_hex(&request.public_key);
        let now = Utc::now();

        let attempt = modify(&*self.mandates, &request.mandate_id, |mandate| {
            if mandate.status != MandateStatus::Active {
                return Ok((mandate.clone(), UseAttempt::WrongState(mandate.status)));
            }
            if mandate.is_expired(now) {
                let mut expired = mandate.clone();
                expired.status = MandateStatus::Expired;
                return Ok((expired.clone(), UseAttempt::Expired(expired)));
            }
            let valid = signature
                .verify(&public_key, &mandate.challenge)
                .map_err(|e| ProvenderError::InvalidSignature {
                    reason: e.to_string(),
                })?;
            if !valid {
                return Ok((mandate.clone(), UseAttempt::SignatureMismatch));
            }
            let mut used = mandate.clone();
            used.status = MandateStatus::Used;
            Ok((used.clone(), UseAttempt::Consumed(used)))
        })
        .await
        .ok_or_else(|| ProvenderError::MandateNotFound {
            mandate_id: request.mandate_id.to_string(),
        })??;

        let mandate = match attempt {
            UseAttempt::Consumed(mandate) => mandate,
            UseAttempt::Expired(mandate) => {
                return Err(ProvenderError::MandateExpired {
                    mandate_id: mandate.id.to_string(),
                    expired_at: mandate.expires_at().to_rfc3339(),
                });
            }
            UseAttempt::WrongState(status) => {
                return Err(ProvenderError::InvalidMandateState {
                    mandate_id: request.mandate_id.to_string(),
                    status: status.to_string(),
                });
            }
            UseAttempt::SignatureMismatch => {
                return Err(ProvenderError::InvalidSignature {
                    reason: "signature does not match the mandate challenge".to_string(),
                });
            }
        };

        let payment = Payment {
            id: PaymentId::new(),
            mandate_id: mandate.id.clone(),
            status: PaymentStatus::Processing,
            amount: mandate.amount,
            created_at: now,
            updated_at: now,
            transaction_ref: Some(format!("txn_{}", Uuid::new_v4().simple())),
            failure_reason: None,
        };

        self.payments.put(payment.id.clone(), payment.clone()).await;
        info!(
            payment_id = %payment.id,
            mandate_id = %mandate.id,
            amount = %payment.amount,
            "payment opened, settlement pending"
        );

        self.spawn_resolution(payment.clone());
        Ok(payment)
    }

    /// Fetch a payment status snapshot
    pub async fn get_payment(&self, payment_id: &PaymentId) -> Result<Payment> {
        self.payments
            .get(payment_id)
            .await
            .ok_or_else(|| ProvenderError::PaymentNotFound {
                payment_id: payment_id.to_string(),
            })
    }

    /// Resolve the payment on a background task, independently of the
    /// request/response cycle
    fn spawn_resolution(&self, payment: Payment) {
        let payments = self.payments.clone();
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let outcome = backend.submit(&payment).await;
            let (status, reason) = match outcome {
                SettlementOutcome::Completed => (PaymentStatus::Completed, None),
                SettlementOutcome::Failed { reason } => (PaymentStatus::Failed, Some(reason)),
            };
            let resolved = modify(&*payments, &payment.id, |current| {
                let mut resolved = current.clone();
                resolved.resolve(status, reason.clone());
                Ok::<_, ProvenderError>((resolved.clone(), resolved.status))
            })
            .await;
            match resolved {
                Some(Ok(final_status)) => {
                    info!(payment_id = %payment.id, status = %final_status, "payment resolved")
                }
                _ => warn!(payment_id = %payment.id, "payment vanished before resolution"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MandateIssuer, MandateRequest, SettlementService, SimulatedBackend};
    use provender_crypto::KeyPair;
    use provender_types::{Amount, CartId, Currency};
    use std::time::Duration;

    fn service(success_probability: f64) -> SettlementService {
        SettlementService::new(Arc::new(SimulatedBackend::new(
            Duration::from_millis(20),
            success_probability,
        )))
    }

    async fn issue(issuer: &MandateIssuer, ttl_seconds: i64) -> provender_types::Mandate {
        issuer
            .issue(MandateRequest {
                cart_id: CartId::new(),
                payer_ref: "payer-1".to_string(),
                amount: Amount::from_major(250, Currency::USD),
                ttl_seconds,
                metadata: None,
            })
            .await
            .unwrap()
    }

    fn signed_request(mandate: &provender_types::Mandate, keypair: &KeyPair) -> PayRequest {
        let signature = ChallengeSignature::sign(keypair, &mandate.challenge).unwrap();
        PayRequest {
            mandate_id: mandate.id.clone(),
            signature: signature.as_hex().to_string(),
            public_key: keypair.public_key_hex(),
        }
    }

    async fn wait_for_terminal(settlement: &PaymentSettlement, id: &PaymentId) -> Payment {
        for _ in 0..50 {
            let payment = settlement.get_payment(id).await.unwrap();
            if payment.status.is_terminal() {
                return payment;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("payment never resolved");
    }

    #[tokio::test]
    async fn test_valid_signature_opens_processing_payment() {
        let service = service(1.0);
        let keypair = KeyPair::generate();
        let mandate = issue(&service.issuer, 300).await;

        let payment = service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Processing);
        assert_eq!(payment.amount, mandate.amount);
        assert!(payment.transaction_ref.is_some());

        // the mandate was consumed atomically
        let used = service.issuer.get(&mandate.id).await.unwrap();
        assert_eq!(used.status, MandateStatus::Used);
    }

    #[tokio::test]
    async fn test_payment_resolves_completed() {
        let service = service(1.0);
        let keypair = KeyPair::generate();
        let mandate = issue(&service.issuer, 300).await;
        let payment = service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap();

        let resolved = wait_for_terminal(&service.payments, &payment.id).await;
        assert_eq!(resolved.status, PaymentStatus::Completed);
        assert!(resolved.failure_reason.is_none());
        assert!(resolved.updated_at >= resolved.created_at);
    }

    #[tokio::test]
    async fn test_payment_resolves_failed_with_reason() {
        let service = service(0.0);
        let keypair = KeyPair::generate();
        let mandate = issue(&service.issuer, 300).await;
        let payment = service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap();

        let resolved = wait_for_terminal(&service.payments, &payment.id).await;
        assert_eq!(resolved.status, PaymentStatus::Failed);
        assert!(resolved.failure_reason.is_some());
    }

    #[tokio::test]
    async fn test_terminal_status_is_idempotent() {
        let service = service(1.0);
        let keypair = KeyPair::generate();
        let mandate = issue(&service.issuer, 300).await;
        let payment = service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap();

        let first = wait_for_terminal(&service.payments, &payment.id).await;
        let second = service.payments.get_payment(&payment.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_mandate_single_use() {
        let service = service(1.0);
        let keypair = KeyPair::generate();
        let mandate = issue(&service.issuer, 300).await;

        service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap();
        let err = service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvenderError::InvalidMandateState { .. }));
    }

    #[tokio::test]
    async fn test_expired_mandate_rejected_and_transitioned() {
        let service = service(1.0);
        let keypair = KeyPair::generate();
        let mandate = issue(&service.issuer, -60).await;

        let err = service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvenderError::MandateExpired { .. }));

        let stored = service.issuer.get(&mandate.id).await.unwrap();
        assert_eq!(stored.status, MandateStatus::Expired);
    }

    #[tokio::test]
    async fn test_wrong_key_rejected_without_consuming() {
        let service = service(1.0);
        let signer = KeyPair::generate();
        let other = KeyPair::generate();
        let mandate = issue(&service.issuer, 300).await;

        let signature = ChallengeSignature::sign(&signer, &mandate.challenge).unwrap();
        let err = service
            .payments
            .pay(PayRequest {
                mandate_id: mandate.id.clone(),
                signature: signature.as_hex().to_string(),
                public_key: other.public_key_hex(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProvenderError::InvalidSignature { .. }));

        // a bad signature must not consume the mandate
        let stored = service.issuer.get(&mandate.id).await.unwrap();
        assert_eq!(stored.status, MandateStatus::Active);
    }

    #[tokio::test]
    async fn test_used_mandate_never_reverts_to_expired() {
        let service = service(1.0);
        let keypair = KeyPair::generate();
        let mandate = issue(&service.issuer, 1).await;

        service
            .payments
            .pay(signed_request(&mandate, &keypair))
            .await
            .unwrap();

        // let the expiry timer fire after the mandate was consumed
        tokio::time::sleep(Duration::from_millis(1_300)).await;
        let stored = service.issuer.get(&mandate.id).await.unwrap();
        assert_eq!(stored.status, MandateStatus::Used);
    }

    #[tokio::test]
    async fn test_unknown_mandate() {
        let service = service(1.0);
        let keypair = KeyPair::generate();
        let err = service
            .payments
            .pay(PayRequest {
                mandate_id: MandateId::new(),
                signature: "ab".repeat(64),
                public_key: keypair.public_key_hex(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProvenderError::MandateNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let service = service(1.0);
        let err = service
            .payments
            .pay(PayRequest {
                mandate_id: MandateId::new(),
                signature: String::new(),
                public_key: "aa".repeat(32),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProvenderError::InvalidRequest { .. }));
    }
}
