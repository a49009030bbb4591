//! Negotiation engine
//!
//! Accepts or rejects a counter-offer against a stored quote. The target
//! total is only a negotiating anchor: when adjusted quantities are
//! supplied, the recomputed line-item sum supersedes it.

use crate::{QuoteStore, VendorProfile};
use provender_store::modify;
use provender_types::{Amount, ProvenderError, Quote, QuoteId, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Quantity adjustment for one quote line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAdjustment {
    pub sku: String,
    pub new_quantity: u32,
}

/// A counter-offer against an existing quote
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterOffer {
    /// Proposed new total; defaults to the current total
    pub target_total: Option<Amount>,
    /// Quantity adjustments to apply on acceptance
    pub adjusted_items: Option<Vec<ItemAdjustment>>,
    /// Free-form notes, recorded only
    pub notes: Option<String>,
}

/// Outcome of a negotiation round
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationOutcome {
    pub accepted: bool,
    /// The revised quote when accepted
    pub revised_quote: Option<Quote>,
    pub message: String,
    /// The vendor's tolerance, for the caller's next attempt
    pub max_discount_bps: i64,
    /// The discount the counter-offer implied
    pub requested_discount_bps: i64,
}

/// Vendor-side counter-offer handling
#[derive(Clone)]
pub struct NegotiationEngine {
    profile: Arc<VendorProfile>,
    quotes: QuoteStore,
}

impl NegotiationEngine {
    pub fn new(profile: Arc<VendorProfile>, quotes: QuoteStore) -> Self {
        Self { profile, quotes }
    }

    /// Decide a counter-offer and, on acceptance, replace the stored quote
    /// in place under the same ID
    pub async fn counter_offer(
        &self,
        quote_id: &QuoteId,
        offer: CounterOffer,
    ) -> Result<NegotiationOutcome> {
        let max_discount_bps = self.profile.max_discount_bps;

        let outcome = modify(&*self.quotes, quote_id, |quote| {
            let requested_total = offer.target_total.unwrap_or(quote.total);
            let requested_discount_bps = quote.total.discount_bps_to(&requested_total)?;

            if requested_discount_bps > max_discount_bps {
                // rejection leaves the stored quote untouched
                return Ok((
                    quote.clone(),
                    NegotiationOutcome {
                        accepted: false,
                        revised_quote: None,
                        message: format!(
                            "Requested discount {:.1}% exceeds the maximum {:.1}%",
                            requested_discount_bps as f64 / 100.0,
                            max_discount_bps as f64 / 100.0,
                        ),
                        max_discount_bps,
                        requested_discount_bps,
                    },
                ));
            }

            let mut revised = quote.clone();
            match &offer.adjusted_items {
                Some(adjustments) if !adjustments.is_empty() => {
                    for adjustment in adjustments {
                        revised
                            .line_item_mut(&adjustment.sku)?
                            .adjust_quantity(adjustment.new_quantity)?;
                    }
                    // adjusted quantities supersede the target total
                    revised.total = revised.line_item_sum()?;
                }
                _ => {
                    revised.total = requested_total;
                }
            }

            if let Some(terms) = &mut revised.payment_terms {
                terms.recompute(&revised.total)?;
            }

            let outcome = NegotiationOutcome {
                accepted: true,
                revised_quote: Some(revised.clone()),
                message: "Counter-offer accepted".to_string(),
                max_discount_bps,
                requested_discount_bps,
            };
            Ok((revised, outcome))
        })
        .await
        .ok_or_else(|| ProvenderError::QuoteNotFound {
            quote_id: quote_id.to_string(),
        })??;

        info!(
            vendor = %self.profile.id,
            quote_id = %quote_id,
            accepted = outcome.accepted,
            requested_discount_bps = outcome.requested_discount_bps,
            notes = ?offer.notes,
            "counter-offer decided"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineItemRequest, QuoteEngine, QuoteRequest};
    use provender_catalog::CatalogStore;
    use provender_store::MemoryStore;
    use provender_types::{CatalogItem, Currency, VendorId};

    fn usd(major: i64) -> Amount {
        Amount::from_major(major, Currency::USD)
    }

    async fn setup() -> (QuoteEngine, NegotiationEngine, Quote) {
        let profile = Arc::new(VendorProfile::standard());
        let vendor = profile.id.clone();
        let catalog = CatalogStore::new(
            vendor.clone(),
            vec![CatalogItem {
                sku: "SKU-Y".to_string(),
                name: "Juice".to_string(),
                unit_price: usd(50),
                category: "beverages".to_string(),
                dietary_tags: vec![],
                min_quantity: None,
                vendor,
            }],
        );
        let quotes: QuoteStore = Arc::new(MemoryStore::new());
        let quote_engine = QuoteEngine::new(profile.clone(), Arc::new(catalog), quotes.clone());
        let negotiation = NegotiationEngine::new(profile, quotes);

        // 8 x 50.00 = 400.00, below the volume threshold
        let quote = quote_engine
            .create_quote(QuoteRequest {
                items: vec![LineItemRequest {
                    sku: "SKU-Y".to_string(),
                    quantity: 8,
                }],
                ..Default::default()
            })
            .await
            .unwrap();
        (quote_engine, negotiation, quote)
    }

    #[tokio::test]
    async fn test_accept_within_tolerance() {
        let (engine, negotiation, quote) = setup().await;
        // 400 -> 360 is a 10% discount, within the 15% tolerance
        let outcome = negotiation
            .counter_offer(
                &quote.id,
                CounterOffer {
                    target_total: Some(usd(360)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(outcome.accepted);
        assert_eq!(outcome.requested_discount_bps, 1_000);
        let stored = engine.get_quote(&quote.id).await.unwrap();
        assert_eq!(stored.total, usd(360));
        assert_eq!(stored.id, quote.id);
    }

    #[tokio::test]
    async fn test_reject_beyond_tolerance_leaves_quote_unchanged() {
        let (engine, negotiation, quote) = setup().await;
        // 400 -> 328 is an 18% discount, beyond the 15% tolerance
        let outcome = negotiation
            .counter_offer(
                &quote.id,
                CounterOffer {
                    target_total: Some(usd(328)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!outcome.accepted);
        assert_eq!(outcome.requested_discount_bps, 1_800);
        assert_eq!(outcome.max_discount_bps, 1_500);
        assert_eq!(engine.get_quote(&quote.id).await.unwrap().total, quote.total);
    }

    #[tokio::test]
    async fn test_adjusted_items_supersede_target_total() {
        let (engine, negotiation, quote) = setup().await;
        let outcome = negotiation
            .counter_offer(
                &quote.id,
                CounterOffer {
                    target_total: Some(usd(360)),
                    adjusted_items: Some(vec![ItemAdjustment {
                        sku: "SKU-Y".to_string(),
                        new_quantity: 6,
                    }]),
                    notes: None,
                },
            )
            .await
            .unwrap();

        assert!(outcome.accepted);
        // 6 x 50.00, not the 360.00 anchor
        let stored = engine.get_quote(&quote.id).await.unwrap();
        assert_eq!(stored.total, usd(300));
        assert_eq!(stored.line_items[0].quantity, 6);
        assert_eq!(stored.line_items[0].unit_price, usd(50));
    }

    #[tokio::test]
    async fn test_split_terms_recomputed_on_acceptance() {
        let (engine, negotiation, quote) = setup().await;
        negotiation
            .counter_offer(
                &quote.id,
                CounterOffer {
                    target_total: Some(usd(360)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let terms = engine.get_quote(&quote.id).await.unwrap().payment_terms.unwrap();
        assert_eq!(terms.initial_payment, usd(108));
        assert_eq!(terms.delivery_payment, usd(252));
    }

    #[tokio::test]
    async fn test_exact_tolerance_is_accepted() {
        let (_, negotiation, quote) = setup().await;
        // 400 -> 340 is exactly 15%
        let outcome = negotiation
            .counter_offer(
                &quote.id,
                CounterOffer {
                    target_total: Some(usd(340)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.accepted);
    }

    #[tokio::test]
    async fn test_unknown_quote() {
        let (_, negotiation, _) = setup().await;
        let err = negotiation
            .counter_offer(&QuoteId::new(), CounterOffer::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProvenderError::QuoteNotFound { .. }));
    }

    #[tokio::test]
    async fn test_adjustment_for_unknown_sku_fails() {
        let (engine, negotiation, quote) = setup().await;
        let err = negotiation
            .counter_offer(
                &quote.id,
                CounterOffer {
                    adjusted_items: Some(vec![ItemAdjustment {
                        sku: "SKU-NOPE".to_string(),
                        new_quantity: 2,
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProvenderError::UnknownSku { .. }));
        // failed adjustment leaves the quote untouched
        assert_eq!(engine.get_quote(&quote.id).await.unwrap(), quote);
    }
}
