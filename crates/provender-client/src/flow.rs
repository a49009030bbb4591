//! Procurement flow orchestration
//!
//! One run: compare vendors, optionally negotiate, lock the winning
//! cart, then mandate-sign-pay-confirm each payment portion. The report
//! always carries the steps executed so far; a flow-fatal failure is a
//! structured outcome, never a silent partial success.

use crate::{
    ClientError, ClientResult, CounterOfferBody, MandateSigner, QuoteComparison, SettlementClient,
    SettlementWaiter, VendorClient, VendorComparator,
};
use chrono::{DateTime, Utc};
use provender_audit::{AuditLevel, AuditSink, NotificationEvent, NotificationKind, NotificationSink};
use provender_types::{Amount, Cart, FlowId, Quote, BPS_SCALE};
use provender_vendor::QuoteRequest;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Flow configuration
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// The line items to buy
    pub quote_request: QuoteRequest,
    /// Payer reference carried on every mandate
    pub payer_ref: String,
    /// Counter-offer discount to attempt against the winning quote, in
    /// bps; `None` skips negotiation
    pub target_discount_bps: Option<i64>,
    /// TTL for every issued mandate
    pub mandate_ttl_seconds: i64,
}

/// One executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStep {
    pub name: String,
    pub at: DateTime<Utc>,
    pub detail: serde_json::Value,
}

/// How the flow ended
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "result")]
pub enum FlowOutcome {
    Completed {
        vendor: String,
        total: Amount,
        payment_ids: Vec<String>,
    },
    Failed {
        code: String,
        error: String,
    },
}

/// The full run report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub flow_id: FlowId,
    pub steps: Vec<FlowStep>,
    pub outcome: FlowOutcome,
}

/// End-to-end procurement orchestration
pub struct ProcurementFlow {
    comparator: VendorComparator,
    settlement: SettlementClient,
    signer: MandateSigner,
    waiter: SettlementWaiter,
    audit: Arc<dyn AuditSink>,
    notifications: Arc<dyn NotificationSink>,
}

impl ProcurementFlow {
    pub fn new(
        comparator: VendorComparator,
        settlement: SettlementClient,
        signer: MandateSigner,
        waiter: SettlementWaiter,
        audit: Arc<dyn AuditSink>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            comparator,
            settlement,
            signer,
            waiter,
            audit,
            notifications,
        }
    }

    /// Run the flow to completion or structured failure
    pub async fn run(&self, config: FlowConfig) -> FlowReport {
        let flow_id = FlowId::new();
        let mut steps = Vec::new();

        match self.run_inner(&flow_id, &config, &mut steps).await {
            Ok(outcome) => {
                self.notifications
                    .notify(NotificationEvent::new(
                        NotificationKind::PaymentConfirmation,
                        serde_json::to_value(&outcome).unwrap_or_default(),
                    ))
                    .await;
                FlowReport {
                    flow_id,
                    steps,
                    outcome,
                }
            }
            Err(e) => {
                let outcome = FlowOutcome::Failed {
                    code: e.code().to_string(),
                    error: e.to_string(),
                };
                self.audit
                    .append(
                        &flow_id,
                        "flow.failed",
                        json!({"code": e.code(), "error": e.to_string()}),
                        AuditLevel::Error,
                    )
                    .await;
                self.notifications
                    .notify(NotificationEvent::new(
                        NotificationKind::Error,
                        json!({"code": e.code(), "error": e.to_string()}),
                    ))
                    .await;
                FlowReport {
                    flow_id,
                    steps,
                    outcome,
                }
            }
        }
    }

    async fn run_inner(
        &self,
        flow_id: &FlowId,
        config: &FlowConfig,
        steps: &mut Vec<FlowStep>,
    ) -> ClientResult<FlowOutcome> {
        // 1. Compare all vendors
        let comparison = self.comparator.compare_quotes(&config.quote_request).await?;
        self.record(
            flow_id,
            steps,
            "quote.compared",
            json!({
                "vendorsQueried": comparison.results.len(),
                "bestVendor": comparison.best.vendor,
                "bestTotal": comparison.best.total,
                "savings": comparison.savings,
                "percentageSaved": comparison.percentage_saved,
            }),
        )
        .await;
        self.notifications
            .notify(NotificationEvent::new(
                NotificationKind::SnackOptions,
                serde_json::to_value(&comparison).unwrap_or_default(),
            ))
            .await;

        let vendor_client = self.vendor_client_for(&comparison)?;

        // 2. Optional negotiation against the winning quote
        let quote = match config.target_discount_bps {
            Some(discount_bps) => {
                self.negotiate(flow_id, steps, vendor_client, &comparison.best, discount_bps)
                    .await?
            }
            None => comparison.best.clone(),
        };

        // 3. Lock the cart
        let cart = vendor_client.lock_cart(&quote.id.to_string()).await?;
        self.record(
            flow_id,
            steps,
            "cart.locked",
            json!({"cartId": cart.id, "lockedUntil": cart.locked_until, "total": cart.total}),
        )
        .await;
        self.notifications
            .notify(NotificationEvent::new(
                NotificationKind::ApprovalRequest,
                json!({"cartId": cart.id, "vendor": cart.vendor, "total": cart.total}),
            ))
            .await;

        // 4. One mandate per payment portion
        let payment_ids = self.settle_cart(flow_id, steps, config, &cart).await?;

        info!(flow_id = %flow_id, vendor = %cart.vendor, total = %cart.total, "flow completed");
        Ok(FlowOutcome::Completed {
            vendor: cart.vendor.to_string(),
            total: cart.total,
            payment_ids,
        })
    }

    async fn negotiate(
        &self,
        flow_id: &FlowId,
        steps: &mut Vec<FlowStep>,
        vendor_client: &VendorClient,
        quote: &Quote,
        discount_bps: i64,
    ) -> ClientResult<Quote> {
        let target = quote.total.apply_bps(BPS_SCALE - discount_bps)?;
        let reply = vendor_client
            .negotiate(
                &quote.id.to_string(),
                &CounterOfferBody {
                    target_total: Some(target.minor),
                    ..Default::default()
                },
            )
            .await?;

        if reply.accepted {
            let revised = reply.revised_quote.ok_or_else(|| {
                ClientError::InvalidResponse("accepted negotiation without a revised quote".into())
            })?;
            self.record(
                flow_id,
                steps,
                "negotiation.accepted",
                json!({"quoteId": revised.id, "total": revised.total}),
            )
            .await;
            Ok(revised)
        } else {
            // rejection is not flow-fatal: proceed at the quoted price
            self.record(
                flow_id,
                steps,
                "negotiation.rejected",
                json!({
                    "message": reply.message,
                    "maxDiscountBps": reply.max_discount_bps,
                    "requestedDiscountBps": reply.requested_discount_bps,
                }),
            )
            .await;
            Ok(quote.clone())
        }
    }

    async fn settle_cart(
        &self,
        flow_id: &FlowId,
        steps: &mut Vec<FlowStep>,
        config: &FlowConfig,
        cart: &Cart,
    ) -> ClientResult<Vec<String>> {
        let portions: Vec<(&str, Amount)> = match &cart.payment_terms {
            Some(terms) => vec![
                ("initial", terms.initial_payment),
                ("delivery", terms.delivery_payment),
            ],
            None => vec![("full", cart.total)],
        };

        let mut payment_ids = Vec::with_capacity(portions.len());
        for (portion, amount) in portions {
            let metadata = json!({"portion": portion, "flowId": flow_id});
            let mandate = self
                .settlement
                .create_mandate(
                    &cart.id.to_string(),
                    &config.payer_ref,
                    &amount,
                    config.mandate_ttl_seconds,
                    Some(&metadata),
                )
                .await?;
            self.record(
                flow_id,
                steps,
                "mandate.issued",
                json!({"mandateId": mandate.mandate_id, "portion": portion, "amount": amount}),
            )
            .await;

            let payment = self.signer.sign_and_pay(&self.settlement, &mandate).await?;
            self.record(
                flow_id,
                steps,
                "payment.submitted",
                json!({"paymentId": payment.payment_id, "status": payment.status}),
            )
            .await;

            let confirmed = self
                .waiter
                .wait_for_completion(&self.settlement, &payment.payment_id)
                .await?;
            self.record(
                flow_id,
                steps,
                "payment.confirmed",
                json!({"paymentId": confirmed.id, "status": confirmed.status}),
            )
            .await;
            payment_ids.push(payment.payment_id);
        }
        Ok(payment_ids)
    }

    fn vendor_client_for<'a>(&'a self, comparison: &QuoteComparison) -> ClientResult<&'a VendorClient> {
        self.comparator
            .vendors()
            .iter()
            .find(|client| client.vendor() == &comparison.best.vendor)
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!(
                    "winning vendor {} has no configured client",
                    comparison.best.vendor
                ))
            })
    }

    async fn record(
        &self,
        flow_id: &FlowId,
        steps: &mut Vec<FlowStep>,
        name: &str,
        detail: serde_json::Value,
    ) {
        self.audit
            .append(flow_id, name, detail.clone(), AuditLevel::Info)
            .await;
        steps.push(FlowStep {
            name: name.to_string(),
            at: Utc::now(),
            detail,
        });
    }
}
