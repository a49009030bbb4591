//! Mandate issuer
//!
//! Issues payment authorization challenges bound to one cart, payer, and
//! amount. Each mandate schedules its own expiry timer; the timer only
//! ever moves `Active` to `Expired`, so a used mandate can never be
//! flipped back.

use crate::MandateStore;
use chrono::Utc;
use provender_crypto::build_challenge;
use provender_store::modify;
use provender_types::{
    Amount, CartId, Mandate, MandateId, MandateStatus, ProvenderError, Result,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// A mandate creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandateRequest {
    pub cart_id: CartId,
    pub payer_ref: String,
    pub amount: Amount,
    pub ttl_seconds: i64,
    pub metadata: Option<serde_json::Value>,
}

/// Settlement-side mandate issuance
#[derive(Clone)]
pub struct MandateIssuer {
    mandates: MandateStore,
}

impl MandateIssuer {
    pub fn new(mandates: MandateStore) -> Self {
        Self { mandates }
    }

    /// Issue a mandate and schedule its expiry
    pub async fn issue(&self, request: MandateRequest) -> Result<Mandate> {
        if request.payer_ref.trim().is_empty() {
            return Err(ProvenderError::invalid_request(
                "payerRef",
                "payer reference is required",
            ));
        }
        if request.amount.minor <= 0 {
            return Err(ProvenderError::invalid_request(
                "amount",
                "amount must be positive",
            ));
        }

        let id = MandateId::new();
        let created_at = Utc::now();
        let challenge = build_challenge(
            &id,
            &request.cart_id,
            &request.payer_ref,
            &request.amount,
            request.ttl_seconds,
            created_at.timestamp_millis(),
        );

        let mandate = Mandate {
            id: id.clone(),
            cart_id: request.cart_id,
            payer_ref: request.payer_ref,
            amount: request.amount,
            ttl_seconds: request.ttl_seconds,
            challenge,
            created_at,
            status: MandateStatus::Active,
            metadata: request.metadata,
        };

        self.mandates.put(id.clone(), mandate.clone()).await;
        info!(mandate_id = %id, amount = %mandate.amount, ttl_seconds = mandate.ttl_seconds, "mandate issued");

        if request.ttl_seconds > 0 {
            self.schedule_expiry(id, request.ttl_seconds as u64);
        }

        Ok(mandate)
    }

    /// Fetch a mandate, applying the lazy expiry transition first
    pub async fn get(&self, mandate_id: &MandateId) -> Result<Mandate> {
        let now = Utc::now();
        modify(&*self.mandates, mandate_id, |mandate| {
            let mut mandate = mandate.clone();
            if mandate.status == MandateStatus::Active && mandate.is_expired(now) {
                mandate.status = MandateStatus::Expired;
            }
            Ok::<_, ProvenderError>((mandate.clone(), mandate))
        })
        .await
        .ok_or_else(|| ProvenderError::MandateNotFound {
            mandate_id: mandate_id.to_string(),
        })?
    }

    fn schedule_expiry(&self, mandate_id: MandateId, ttl_seconds: u64) {
        let mandates = self.mandates.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(ttl_seconds)).await;
            let expired = modify(&*mandates, &mandate_id, |mandate| {
                if mandate.status != MandateStatus::Active {
                    // consumed in the meantime; leave it alone
                    return Ok::<_, ProvenderError>((mandate.clone(), false));
                }
                let mut expired = mandate.clone();
                expired.status = MandateStatus::Expired;
                Ok((expired, true))
            })
            .await;
            if let Some(Ok(true)) = expired {
                debug!(mandate_id = %mandate_id, "mandate expired by timer");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provender_store::MemoryStore;
    use provender_types::Currency;
    use std::sync::Arc;

    fn issuer() -> MandateIssuer {
        MandateIssuer::new(Arc::new(MemoryStore::new()))
    }

    fn request(ttl_seconds: i64) -> MandateRequest {
        MandateRequest {
            cart_id: CartId::new(),
            payer_ref: "payer-1".to_string(),
            amount: Amount::from_major(250, Currency::USD),
            ttl_seconds,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_issue_and_get() {
        let issuer = issuer();
        let mandate = issuer.issue(request(300)).await.unwrap();
        assert_eq!(mandate.status, MandateStatus::Active);
        assert!(!mandate.challenge.is_empty());

        let fetched = issuer.get(&mandate.id).await.unwrap();
        assert_eq!(fetched, mandate);
    }

    #[tokio::test]
    async fn test_challenge_binds_mandate_identity() {
        let issuer = issuer();
        let a = issuer.issue(request(300)).await.unwrap();
        let b = issuer.issue(request(300)).await.unwrap();
        assert_ne!(a.challenge, b.challenge);
    }

    #[tokio::test]
    async fn test_empty_payer_rejected() {
        let issuer = issuer();
        let mut bad = request(300);
        bad.payer_ref = "  ".to_string();
        assert!(matches!(
            issuer.issue(bad).await.unwrap_err(),
            ProvenderError::InvalidRequest { .. }
        ));
    }

    #[tokio::test]
    async fn test_past_ttl_expires_lazily_on_get() {
        let issuer = issuer();
        let mandate = issuer.issue(request(-60)).await.unwrap();
        // creation succeeds, but any read sees it expired
        let fetched = issuer.get(&mandate.id).await.unwrap();
        assert_eq!(fetched.status, MandateStatus::Expired);
    }

    #[tokio::test]
    async fn test_timer_expires_active_mandate() {
        let issuer = issuer();
        let mandate = issuer.issue(request(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1_300)).await;
        let fetched = issuer.get(&mandate.id).await.unwrap();
        assert_eq!(fetched.status, MandateStatus::Expired);
    }

    #[tokio::test]
    async fn test_unknown_mandate() {
        let issuer = issuer();
        assert!(matches!(
            issuer.get(&MandateId::new()).await.unwrap_err(),
            ProvenderError::MandateNotFound { .. }
        ));
    }
}
