//! Settlement waiter
//!
//! Polls payment status on a fixed interval until the payment reaches a
//! terminal state or a hard wall-clock timeout elapses. The timeout is
//! independent of the settlement process's own resolution delay.

use crate::{ClientError, ClientResult, SettlementClient};
use provender_types::{Payment, PaymentStatus};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Bounded settlement polling
#[derive(Debug, Clone)]
pub struct SettlementWaiter {
    poll_interval: Duration,
    timeout: Duration,
}

impl SettlementWaiter {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// Wait until the payment completes
    ///
    /// Resolves with the completed payment; `failed` and timeout both
    /// reject. `cancelled` is treated like `failed`.
    pub async fn wait_for_completion(
        &self,
        settlement: &SettlementClient,
        payment_id: &str,
    ) -> ClientResult<Payment> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let payment = settlement.payment_status(payment_id).await?;
            match payment.status {
                PaymentStatus::Completed => return Ok(payment),
                PaymentStatus::Failed | PaymentStatus::Cancelled => {
                    return Err(ClientError::PaymentFailed {
                        payment_id: payment_id.to_string(),
                        reason: payment
                            .failure_reason
                            .unwrap_or_else(|| payment.status.to_string()),
                    });
                }
                PaymentStatus::Pending | PaymentStatus::Processing => {
                    debug!(payment_id, status = %payment.status, "payment still settling");
                }
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(ClientError::ConfirmationTimeout {
                    payment_id: payment_id.to_string(),
                    waited_secs: self.timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

impl Default for SettlementWaiter {
    /// 2 s polls, 30 s overall timeout
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let waiter = SettlementWaiter::default();
        assert_eq!(waiter.poll_interval, Duration::from_secs(2));
        assert_eq!(waiter.timeout, Duration::from_secs(30));
    }
}
