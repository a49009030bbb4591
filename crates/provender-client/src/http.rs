//! Typed HTTP clients for the vendor and settlement surfaces
//!
//! The wire shapes mirror the server DTOs: camelCase JSON, request money
//! in minor units, structured amounts in responses.

use crate::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use provender_types::{Amount, Cart, CatalogItem, Payment, Quote, VendorId};
use provender_vendor::{ItemAdjustment, QuoteRequest};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error body every provender service answers with
#[derive(Debug, Clone, Deserialize)]
struct WireError {
    error: String,
    code: String,
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let status = status.as_u16();
    match response.json::<WireError>().await {
        Ok(body) => Err(ClientError::Api {
            status,
            code: body.code,
            message: body.error,
        }),
        Err(_) => Err(ClientError::Api {
            status,
            code: "UNKNOWN".to_string(),
            message: "unparseable error body".to_string(),
        }),
    }
}

// ============================================================================
// Vendor client
// ============================================================================

/// Catalog query as sent on the wire
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub categories: Option<Vec<String>>,
    pub dietary: Option<Vec<String>>,
    /// Unit-price ceiling in minor units
    pub max_budget: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogItems {
    items: Vec<CatalogItem>,
}

/// Counter-offer as sent on the wire
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterOfferBody {
    /// Proposed new total in minor units
    pub target_total: Option<i64>,
    pub adjusted_items: Option<Vec<ItemAdjustment>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct NegotiateBody<'a> {
    quote_id: &'a str,
    counter_offer: &'a CounterOfferBody,
}

/// Negotiation answer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationReply {
    pub accepted: bool,
    pub revised_quote: Option<Quote>,
    pub message: String,
    pub max_discount_bps: i64,
    pub requested_discount_bps: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartLockBody<'a> {
    quote_id: &'a str,
}

/// Client for one vendor endpoint
#[derive(Debug, Clone)]
pub struct VendorClient {
    vendor: VendorId,
    base_url: String,
    client: Client,
}

impl VendorClient {
    /// Build a client with a 10 s request timeout
    pub fn new(vendor: VendorId, base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            vendor,
            base_url: base_url.into(),
            client,
        })
    }

    /// The vendor this client talks to
    pub fn vendor(&self) -> &VendorId {
        &self.vendor
    }

    /// Query the vendor's catalog
    pub async fn query_catalog(&self, query: &CatalogQuery) -> ClientResult<Vec<CatalogItem>> {
        let url = format!("{}/api/v1/catalog/query", self.base_url);
        let response = self.client.post(&url).json(query).send().await?;
        Ok(decode::<CatalogItems>(response).await?.items)
    }

    /// Request a quote
    pub async fn create_quote(&self, request: &QuoteRequest) -> ClientResult<Quote> {
        let url = format!("{}/api/v1/quote", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        decode(response).await
    }

    /// Counter-offer against a quote
    pub async fn negotiate(
        &self,
        quote_id: &str,
        offer: &CounterOfferBody,
    ) -> ClientResult<NegotiationReply> {
        let url = format!("{}/api/v1/negotiate", self.base_url);
        let body = NegotiateBody {
            quote_id,
            counter_offer: offer,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        decode(response).await
    }

    /// Lock a quote into a cart
    pub async fn lock_cart(&self, quote_id: &str) -> ClientResult<Cart> {
        let url = format!("{}/api/v1/cart/lock", self.base_url);
        let body = CartLockBody { quote_id };
        let response = self.client.post(&url).json(&body).send().await?;
        decode(response).await
    }
}

// ============================================================================
// Settlement client
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MandateBody<'a> {
    cart_id: &'a str,
    payer_ref: &'a str,
    /// minor units
    amount: i64,
    currency: &'a str,
    ttl_seconds: i64,
    metadata: Option<&'a serde_json::Value>,
}

/// A freshly issued mandate with its decoded challenge bytes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedMandate {
    pub mandate_id: String,
    pub cart_id: String,
    pub payer_ref: String,
    pub amount: Amount,
    pub ttl_seconds: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: String,
    /// Hex-encoded challenge as received
    pub challenge: String,
}

impl IssuedMandate {
    /// The raw challenge bytes to sign
    pub fn challenge_bytes(&self) -> ClientResult<Vec<u8>> {
        hex::decode(&self.challenge)
            .map_err(|e| ClientError::InvalidResponse(format!("bad challenge hex: {e}")))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayBody<'a> {
    mandate_id: &'a str,
    signature: &'a str,
    public_key: &'a str,
}

/// Immediate payment answer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOpened {
    pub payment_id: String,
    pub status: String,
    pub amount: Amount,
    pub transaction_ref: Option<String>,
    pub processed_at: DateTime<Utc>,
}

/// Client for the settlement endpoint
#[derive(Debug, Clone)]
pub struct SettlementClient {
    base_url: String,
    client: Client,
}

impl SettlementClient {
    /// Build a client with a 10 s request timeout
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Create a mandate for a cart and amount
    pub async fn create_mandate(
        &self,
        cart_id: &str,
        payer_ref: &str,
        amount: &Amount,
        ttl_seconds: i64,
        metadata: Option<&serde_json::Value>,
    ) -> ClientResult<IssuedMandate> {
        let url = format!("{}/api/v1/mandate", self.base_url);
        let body = MandateBody {
            cart_id,
            payer_ref,
            amount: amount.minor,
            currency: amount.currency.code(),
            ttl_seconds,
            metadata,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        decode(response).await
    }

    /// Present a signed mandate
    pub async fn pay(
        &self,
        mandate_id: &str,
        signature_hex: &str,
        public_key_hex: &str,
    ) -> ClientResult<PaymentOpened> {
        let url = format!("{}/api/v1/pay", self.base_url);
        let body = PayBody {
            mandate_id,
            signature: signature_hex,
            public_key: public_key_hex,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        decode(response).await
    }

    /// Fetch a payment status snapshot
    pub async fn payment_status(&self, payment_id: &str) -> ClientResult<Payment> {
        let url = format!(
            "{}/api/v1/payment/status?paymentId={payment_id}",
            self.base_url
        );
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }
}
