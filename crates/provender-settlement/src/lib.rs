//! Provender Settlement - Mandate issuance and payment settlement
//!
//! The settlement process owns mandates and payments. A mandate is issued
//! with a challenge the payer must sign; presenting a valid signature
//! consumes the mandate atomically and opens a `processing` payment that
//! a pluggable [`SettlementBackend`] later resolves to a terminal state.
//!
//! Mandate TTL is enforced twice: a scheduled timer flips still-active
//! mandates to `expired`, and every use re-checks the clock. The lazy
//! check is authoritative; the timer is only an eager mirror.

pub mod backend;
pub mod issuer;
pub mod payments;

pub use backend::*;
pub use issuer::*;
pub use payments::*;

use provender_store::{MemoryStore, Store};
use provender_types::{Mandate, MandateId, Payment, PaymentId};
use std::sync::Arc;

/// Shared handle to the mandate map
pub type MandateStore = Arc<dyn Store<MandateId, Mandate>>;
/// Shared handle to the payment map
pub type PaymentStore = Arc<dyn Store<PaymentId, Payment>>;

/// The settlement process: issuer and payment engine over shared stores
#[derive(Clone)]
pub struct SettlementService {
    pub issuer: MandateIssuer,
    pub payments: PaymentSettlement,
}

impl SettlementService {
    /// Assemble over in-memory stores
    pub fn new(backend: Arc<dyn SettlementBackend>) -> Self {
        let mandates: MandateStore = Arc::new(MemoryStore::new());
        let payment_store: PaymentStore = Arc::new(MemoryStore::new());
        Self {
            issuer: MandateIssuer::new(mandates.clone()),
            payments: PaymentSettlement::new(mandates, payment_store, backend),
        }
    }

    /// Assemble with the default simulated backend
    pub fn simulated() -> Self {
        Self::new(Arc::new(SimulatedBackend::default()))
    }
}
