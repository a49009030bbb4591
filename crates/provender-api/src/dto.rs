//! Wire DTOs
//!
//! Request bodies are camelCase JSON. Money arrives as integer minor
//! units plus an optional ISO currency code (USD when absent); responses
//! carry the full structured `Amount`.

use chrono::{DateTime, Utc};
use provender_settlement::MandateRequest;
use provender_types::{
    Amount, CartId, CatalogFilter, CatalogItem, Currency, Mandate, ProvenderError, Result,
};
use provender_vendor::{CounterOffer, ItemAdjustment};
use serde::{Deserialize, Serialize};

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

// ============================================================================
// Vendor surface
// ============================================================================

/// `POST /api/v1/catalog/query`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQueryRequest {
    pub categories: Option<Vec<String>>,
    pub dietary: Option<Vec<String>>,
    /// Unit-price ceiling in minor units
    pub max_budget: Option<i64>,
}

impl CatalogQueryRequest {
    /// Convert to a filter in the vendor's currency
    pub fn into_filter(self, currency: Currency) -> CatalogFilter {
        CatalogFilter {
            categories: self.categories,
            dietary: self.dietary,
            max_budget: self.max_budget.map(|minor| Amount::from_minor(minor, currency)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogQueryResponse {
    pub items: Vec<CatalogItem>,
}

/// Counter-offer as it arrives on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterOfferRequest {
    /// Proposed new total in minor units
    pub target_total: Option<i64>,
    pub adjusted_items: Option<Vec<ItemAdjustment>>,
    pub notes: Option<String>,
}

impl CounterOfferRequest {
    /// Convert to the engine's counter-offer in the vendor's currency
    pub fn into_offer(self, currency: Currency) -> CounterOffer {
        CounterOffer {
            target_total: self
                .target_total
                .map(|minor| Amount::from_minor(minor, currency)),
            adjusted_items: self.adjusted_items,
            notes: self.notes,
        }
    }
}

/// `POST /api/v1/negotiate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiateRequest {
    pub quote_id: String,
    pub counter_offer: CounterOfferRequest,
}

/// `POST /api/v1/cart/lock`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLockRequest {
    pub quote_id: String,
}

// ============================================================================
// Settlement surface
// ============================================================================

/// `POST /api/v1/mandate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMandateRequest {
    pub cart_id: String,
    pub payer_ref: String,
    /// Authorized amount in minor units
    pub amount: i64,
    /// ISO 4217 code; USD when absent
    pub currency: Option<String>,
    pub ttl_seconds: i64,
    pub metadata: Option<serde_json::Value>,
}

impl CreateMandateRequest {
    /// Validate and convert to an issuer request
    pub fn into_request(self) -> Result<MandateRequest> {
        let cart_id = CartId::parse(&self.cart_id)
            .map_err(|_| ProvenderError::invalid_request("cartId", "malformed cart id"))?;
        let currency = match self.currency {
            Some(code) => Currency::parse(&code)?,
            None => Currency::default(),
        };
        Ok(MandateRequest {
            cart_id,
            payer_ref: self.payer_ref,
            amount: Amount::from_minor(self.amount, currency),
            ttl_seconds: self.ttl_seconds,
            metadata: self.metadata,
        })
    }
}

/// Mandate fields safe to return after creation, plus the challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandateCreatedResponse {
    pub mandate_id: String,
    pub cart_id: String,
    pub payer_ref: String,
    pub amount: Amount,
    pub ttl_seconds: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: String,
    /// Hex-encoded challenge bytes to sign
    pub challenge: String,
}

impl MandateCreatedResponse {
    pub fn from_mandate(mandate: &Mandate) -> Self {
        Self {
            mandate_id: mandate.id.to_string(),
            cart_id: mandate.cart_id.to_string(),
            payer_ref: mandate.payer_ref.clone(),
            amount: mandate.amount,
            ttl_seconds: mandate.ttl_seconds,
            created_at: mandate.created_at,
            expires_at: mandate.expires_at(),
            status: mandate.status.to_string(),
            challenge: hex::encode(&mandate.challenge),
        }
    }
}

/// Mandate public fields; the challenge is only returned at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandatePublicResponse {
    pub mandate_id: String,
    pub cart_id: String,
    pub payer_ref: String,
    pub amount: Amount,
    pub ttl_seconds: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: String,
}

impl MandatePublicResponse {
    pub fn from_mandate(mandate: &Mandate) -> Self {
        Self {
            mandate_id: mandate.id.to_string(),
            cart_id: mandate.cart_id.to_string(),
            payer_ref: mandate.payer_ref.clone(),
            amount: mandate.amount,
            ttl_seconds: mandate.ttl_seconds,
            created_at: mandate.created_at,
            expires_at: mandate.expires_at(),
            status: mandate.status.to_string(),
        }
    }
}

/// `POST /api/v1/pay`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequestBody {
    pub mandate_id: String,
    /// Hex-encoded Ed25519 signature over the challenge bytes
    pub signature: String,
    /// Hex-encoded Ed25519 public key
    pub public_key: String,
}

/// Immediate answer to `POST /api/v1/pay`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub payment_id: String,
    pub status: String,
    pub amount: Amount,
    pub transaction_ref: Option<String>,
    pub processed_at: DateTime<Utc>,
}

/// `GET /api/v1/payment/status?paymentId=...`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusQuery {
    pub payment_id: Option<String>,
}
