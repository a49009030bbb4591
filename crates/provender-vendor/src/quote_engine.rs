//! Quote engine
//!
//! Turns a set of requested line items into a priced quote: SKU
//! resolution, minimum-quantity clamping, volume discount, split payment
//! terms, delivery window, and expiration.

use crate::{QuoteStore, VendorProfile};
use chrono::{DateTime, Utc};
use provender_catalog::CatalogStore;
use provender_types::{
    Amount, DeliveryWindow, PaymentTerms, ProvenderError, Quote, QuoteId, QuoteLineItem, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// One requested line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub sku: String,
    pub quantity: u32,
}

/// A quote request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Requested lines, in order
    pub items: Vec<LineItemRequest>,
    /// Delivery date hint; defaults to now
    pub delivery_date: Option<DateTime<Utc>>,
    /// Advisory headcount, recorded but not priced
    pub headcount: Option<u32>,
}

/// Vendor-side quote creation
#[derive(Clone)]
pub struct QuoteEngine {
    profile: Arc<VendorProfile>,
    catalog: Arc<CatalogStore>,
    quotes: QuoteStore,
}

impl QuoteEngine {
    pub fn new(profile: Arc<VendorProfile>, catalog: Arc<CatalogStore>, quotes: QuoteStore) -> Self {
        Self {
            profile,
            catalog,
            quotes,
        }
    }

    /// Price a request and store the resulting quote
    pub async fn create_quote(&self, request: QuoteRequest) -> Result<Quote> {
        if request.items.is_empty() {
            return Err(ProvenderError::invalid_request(
                "items",
                "at least one line item is required",
            ));
        }

        let mut line_items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let item = self.catalog.get(&line.sku)?;
            let quantity = line.quantity.max(item.effective_min_quantity());
            line_items.push(QuoteLineItem::new(&item.sku, quantity, item.unit_price)?);
        }

        let mut total = Amount::zero(self.profile.currency);
        for line in &line_items {
            total = total.checked_add(&line.line_total)?;
        }

        // Volume discount applies once, to the final total only.
        if let Some(discount) = &self.profile.volume_discount {
            if total > discount.threshold {
                total = total.apply_bps(discount.retention_bps)?;
            }
        }

        let payment_terms = match self.profile.split_initial_percent {
            Some(percent) => Some(PaymentTerms::split(&total, percent)?),
            None => None,
        };

        let now = Utc::now();
        let quote = Quote {
            id: QuoteId::new(),
            vendor: self.profile.id.clone(),
            line_items,
            total,
            delivery_window: self.delivery_window(request.delivery_date.unwrap_or(now))?,
            expires_at: now + self.profile.quote_validity,
            payment_terms,
        };

        debug!(
            vendor = %self.profile.id,
            quote_id = %quote.id,
            total = %quote.total,
            headcount = ?request.headcount,
            "quote created"
        );

        self.quotes.put(quote.id.clone(), quote.clone()).await;
        Ok(quote)
    }

    /// Fetch a stored quote
    pub async fn get_quote(&self, quote_id: &QuoteId) -> Result<Quote> {
        self.quotes
            .get(quote_id)
            .await
            .ok_or_else(|| ProvenderError::QuoteNotFound {
                quote_id: quote_id.to_string(),
            })
    }

    /// Next day at the vendor's delivery hours
    fn delivery_window(&self, requested: DateTime<Utc>) -> Result<DeliveryWindow> {
        let hours = self.profile.delivery_hours;
        let day = requested
            .date_naive()
            .succ_opt()
            .ok_or_else(|| ProvenderError::internal("delivery date out of range"))?;
        let at_hour = |hour: u32| {
            day.and_hms_opt(hour, 0, 0)
                .map(|dt| dt.and_utc())
                .ok_or_else(|| ProvenderError::internal("delivery hour out of range"))
        };
        Ok(DeliveryWindow {
            start: at_hour(hours.start_hour)?,
            end: at_hour(hours.end_hour)?,
        })
    }
}
