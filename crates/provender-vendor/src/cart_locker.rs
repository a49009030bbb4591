//! Cart locker
//!
//! Converts an accepted quote into a time-locked cart reservation. The
//! cart is a value snapshot: later quote mutation never reaches a locked
//! cart. Lock expiry is enforced lazily on every read, so a missed timer
//! can never leave a stale reservation payable.

use crate::{CartStore, QuoteStore, VendorProfile};
use chrono::Utc;
use provender_store::modify;
use provender_types::{Cart, CartId, CartStatus, ProvenderError, QuoteId, Result};
use std::sync::Arc;
use tracing::info;

/// Vendor-side cart reservation
#[derive(Clone)]
pub struct CartLocker {
    profile: Arc<VendorProfile>,
    quotes: QuoteStore,
    carts: CartStore,
}

impl CartLocker {
    pub fn new(profile: Arc<VendorProfile>, quotes: QuoteStore, carts: CartStore) -> Self {
        Self {
            profile,
            quotes,
            carts,
        }
    }

    /// Lock a quote into a cart
    ///
    /// Fails with `QuoteNotFound` for unknown IDs and `QuoteExpired` for
    /// quotes past their expiration. Does not invalidate the source quote.
    pub async fn lock(&self, quote_id: &QuoteId) -> Result<Cart> {
        let quote = self
            .quotes
            .get(quote_id)
            .await
            .ok_or_else(|| ProvenderError::QuoteNotFound {
                quote_id: quote_id.to_string(),
            })?;

        let now = Utc::now();
        if quote.is_expired(now) {
            return Err(ProvenderError::QuoteExpired {
                quote_id: quote_id.to_string(),
                expired_at: quote.expires_at.to_rfc3339(),
            });
        }

        let cart = Cart {
            id: CartId::new(),
            quote_id: quote.id.clone(),
            vendor: quote.vendor.clone(),
            total: quote.total,
            line_items: quote.line_items.clone(),
            delivery_window: quote.delivery_window,
            locked_until: now + self.profile.lock_duration,
            status: CartStatus::Locked,
            payment_terms: quote.payment_terms.clone(),
        };

        info!(
            vendor = %self.profile.id,
            cart_id = %cart.id,
            quote_id = %quote_id,
            locked_until = %cart.locked_until,
            "cart locked"
        );

        self.carts.put(cart.id.clone(), cart.clone()).await;
        Ok(cart)
    }

    /// Fetch a cart, transitioning it to `Expired` first if its lock
    /// window has elapsed
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart> {
        let now = Utc::now();
        modify(&*self.carts, cart_id, |cart| {
            let mut cart = cart.clone();
            if cart.status == CartStatus::Locked && cart.is_lock_expired(now) {
                cart.status = CartStatus::Expired;
            }
            Ok::<_, ProvenderError>((cart.clone(), cart))
        })
        .await
        .ok_or_else(|| ProvenderError::CartNotFound {
            cart_id: cart_id.to_string(),
        })?
    }

    /// Explicitly release a locked cart
    pub async fn release(&self, cart_id: &CartId) -> Result<Cart> {
        // run the lazy expiry transition first
        let current = self.get_cart(cart_id).await?;
        if current.status != CartStatus::Locked {
            return Err(ProvenderError::CartNotLocked {
                cart_id: cart_id.to_string(),
                status: current.status.to_string(),
            });
        }

        modify(&*self.carts, cart_id, |cart| {
            if cart.status != CartStatus::Locked {
                return Err(ProvenderError::CartNotLocked {
                    cart_id: cart_id.to_string(),
                    status: cart.status.to_string(),
                });
            }
            let mut released = cart.clone();
            released.status = CartStatus::Released;
            Ok((released.clone(), released))
        })
        .await
        .ok_or_else(|| ProvenderError::CartNotFound {
            cart_id: cart_id.to_string(),
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineItemRequest, QuoteEngine, QuoteRequest, Vendor};
    use chrono::Duration;
    use provender_catalog::CatalogStore;
    use provender_types::{Amount, CatalogItem, Currency, VendorId};

    fn vendor_with(profile: VendorProfile) -> Vendor {
        let id = profile.id.clone();
        let catalog = CatalogStore::new(
            id.clone(),
            vec![CatalogItem {
                sku: "SKU-Y".to_string(),
                name: "Juice".to_string(),
                unit_price: Amount::from_major(50, Currency::USD),
                category: "beverages".to_string(),
                dietary_tags: vec![],
                min_quantity: None,
                vendor: id,
            }],
        );
        Vendor::new(profile, catalog)
    }

    async fn quote_for(engine: &QuoteEngine) -> provender_types::Quote {
        engine
            .create_quote(QuoteRequest {
                items: vec![LineItemRequest {
                    sku: "SKU-Y".to_string(),
                    quantity: 2,
                }],
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_lock_snapshots_quote() {
        let vendor = vendor_with(VendorProfile::standard());
        let quote = quote_for(&vendor.quote_engine).await;

        let cart = vendor.cart_locker.lock(&quote.id).await.unwrap();
        assert_eq!(cart.quote_id, quote.id);
        assert_eq!(cart.total, quote.total);
        assert_eq!(cart.status, CartStatus::Locked);
        assert!(cart.locked_until > Utc::now());

        // later quote mutation must not reach the cart
        let outcome = vendor
            .negotiation
            .counter_offer(
                &quote.id,
                crate::CounterOffer {
                    target_total: Some(Amount::from_major(90, Currency::USD)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.accepted);
        let cart_after = vendor.cart_locker.get_cart(&cart.id).await.unwrap();
        assert_eq!(cart_after.total, quote.total);
    }

    #[tokio::test]
    async fn test_lock_unknown_quote() {
        let vendor = vendor_with(VendorProfile::standard());
        let err = vendor.cart_locker.lock(&QuoteId::new()).await.unwrap_err();
        assert!(matches!(err, ProvenderError::QuoteNotFound { .. }));
    }

    #[tokio::test]
    async fn test_lock_expired_quote_rejected() {
        let mut profile = VendorProfile::standard();
        profile.quote_validity = Duration::seconds(-1);
        let vendor = vendor_with(profile);
        let quote = quote_for(&vendor.quote_engine).await;

        let err = vendor.cart_locker.lock(&quote.id).await.unwrap_err();
        assert!(matches!(err, ProvenderError::QuoteExpired { .. }));
    }

    #[tokio::test]
    async fn test_lazy_lock_expiry_on_read() {
        let mut profile = VendorProfile::standard();
        profile.lock_duration = Duration::seconds(-1);
        let vendor = vendor_with(profile);
        let quote = quote_for(&vendor.quote_engine).await;

        let cart = vendor.cart_locker.lock(&quote.id).await.unwrap();
        let fetched = vendor.cart_locker.get_cart(&cart.id).await.unwrap();
        assert_eq!(fetched.status, CartStatus::Expired);

        // and an expired cart cannot be released
        let err = vendor.cart_locker.release(&cart.id).await.unwrap_err();
        assert!(matches!(err, ProvenderError::CartNotLocked { .. }));
    }

    #[tokio::test]
    async fn test_release() {
        let vendor = vendor_with(VendorProfile::standard());
        let quote = quote_for(&vendor.quote_engine).await;
        let cart = vendor.cart_locker.lock(&quote.id).await.unwrap();

        let released = vendor.cart_locker.release(&cart.id).await.unwrap();
        assert_eq!(released.status, CartStatus::Released);

        let err = vendor.cart_locker.release(&cart.id).await.unwrap_err();
        assert!(matches!(err, ProvenderError::CartNotLocked { .. }));
    }
}
