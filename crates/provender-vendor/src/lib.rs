//! Provender Vendor - Vendor-side pricing and reservation engines
//!
//! One `Vendor` per vendor process, bundling:
//! - `QuoteEngine`: line-item requests into priced quotes
//! - `NegotiationEngine`: counter-offers against stored quotes
//! - `CartLocker`: accepted quotes into time-locked cart reservations
//!
//! Within one vendor process every quote/cart is only ever touched by the
//! single in-order request handler for that ID; the engines still route
//! all mutations through the store's compare-and-swap so the same code is
//! correct under real parallelism.

pub mod cart_locker;
pub mod negotiation;
pub mod profile;
pub mod quote_engine;

pub use cart_locker::*;
pub use negotiation::*;
pub use profile::*;
pub use quote_engine::*;

use provender_catalog::CatalogStore;
use provender_store::{MemoryStore, Store};
use provender_types::{Cart, CartId, Quote, QuoteId};
use std::sync::Arc;

/// Shared handle to the quote map
pub type QuoteStore = Arc<dyn Store<QuoteId, Quote>>;
/// Shared handle to the cart map
pub type CartStore = Arc<dyn Store<CartId, Cart>>;

/// One vendor's engines wired over shared stores
#[derive(Clone)]
pub struct Vendor {
    pub profile: Arc<VendorProfile>,
    pub catalog: Arc<CatalogStore>,
    pub quote_engine: QuoteEngine,
    pub negotiation: NegotiationEngine,
    pub cart_locker: CartLocker,
}

impl Vendor {
    /// Assemble a vendor over in-memory stores
    pub fn new(profile: VendorProfile, catalog: CatalogStore) -> Self {
        let quotes: QuoteStore = Arc::new(MemoryStore::new());
        let carts: CartStore = Arc::new(MemoryStore::new());
        Self::with_stores(profile, catalog, quotes, carts)
    }

    /// Assemble a vendor over injected stores
    pub fn with_stores(
        profile: VendorProfile,
        catalog: CatalogStore,
        quotes: QuoteStore,
        carts: CartStore,
    ) -> Self {
        let profile = Arc::new(profile);
        let catalog = Arc::new(catalog);
        Self {
            quote_engine: QuoteEngine::new(profile.clone(), catalog.clone(), quotes.clone()),
            negotiation: NegotiationEngine::new(profile.clone(), quotes.clone()),
            cart_locker: CartLocker::new(profile.clone(), quotes, carts),
            profile,
            catalog,
        }
    }
}
