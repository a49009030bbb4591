//! Pluggable settlement rail
//!
//! The mandate/payment contract never changes with the rail: a backend
//! receives an opened payment and eventually reports a terminal outcome.
//! The simulated default stands in for a real integration.

use async_trait::async_trait;
use provender_types::Payment;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Terminal outcome reported by a settlement rail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    Completed,
    Failed { reason: String },
}

/// A settlement rail
#[async_trait]
pub trait SettlementBackend: Send + Sync {
    /// Settle one payment; resolves once the rail has a terminal answer
    async fn submit(&self, payment: &Payment) -> SettlementOutcome;
}

/// Simulated rail: fixed delay, then success with probability `p`
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
    success_probability: f64,
}

impl SimulatedBackend {
    pub fn new(delay: Duration, success_probability: f64) -> Self {
        Self {
            delay,
            success_probability,
        }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            success_probability: 0.9,
        }
    }
}

#[async_trait]
impl SettlementBackend for SimulatedBackend {
    async fn submit(&self, payment: &Payment) -> SettlementOutcome {
        tokio::time::sleep(self.delay).await;
        let roll: f64 = rand::thread_rng().gen();
        let outcome = if roll < self.success_probability {
            SettlementOutcome::Completed
        } else {
            SettlementOutcome::Failed {
                reason: "settlement rail declined the transfer".to_string(),
            }
        };
        debug!(payment_id = %payment.id, ?outcome, "simulated settlement resolved");
        outcome
    }
}
