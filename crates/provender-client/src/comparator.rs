//! Multi-vendor comparison
//!
//! Queries every vendor concurrently. A vendor that errors is excluded
//! and annotated, never selected; only "zero vendors succeeded" fails the
//! comparison as a whole. Selection is by value (minimum total), so the
//! order in which vendors answer never affects the result.

use crate::{CatalogQuery, ClientError, ClientResult, VendorClient};
use futures::future::join_all;
use provender_types::{Amount, CatalogItem, Quote, VendorId};
use provender_vendor::QuoteRequest;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One vendor's catalog answer; an unreachable vendor contributes an
/// empty item list plus its error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCatalog {
    pub vendor: VendorId,
    pub items: Vec<CatalogItem>,
    pub error: Option<String>,
}

/// One vendor's quote attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorQuote {
    pub vendor: VendorId,
    pub quote: Option<Quote>,
    pub error: Option<String>,
}

/// The comparison result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteComparison {
    /// Every vendor's attempt, valid or not
    pub results: Vec<VendorQuote>,
    /// The cheapest valid quote
    pub best: Quote,
    /// Worst valid total minus best total
    pub savings: Amount,
    /// savings / worst total, in percent (0 when best == worst)
    pub percentage_saved: f64,
}

/// Concurrent fan-out over a set of vendor endpoints
#[derive(Debug, Clone)]
pub struct VendorComparator {
    vendors: Vec<VendorClient>,
}

impl VendorComparator {
    pub fn new(vendors: Vec<VendorClient>) -> Self {
        Self { vendors }
    }

    /// The configured vendor clients
    pub fn vendors(&self) -> &[VendorClient] {
        &self.vendors
    }

    /// Query every catalog concurrently; partial failure is tolerated
    pub async fn compare_catalogs(&self, query: &CatalogQuery) -> Vec<VendorCatalog> {
        let futures = self.vendors.iter().map(|client| async move {
            match client.query_catalog(query).await {
                Ok(items) => VendorCatalog {
                    vendor: client.vendor().clone(),
                    items,
                    error: None,
                },
                Err(e) => {
                    warn!(vendor = %client.vendor(), error = %e, "catalog query failed");
                    VendorCatalog {
                        vendor: client.vendor().clone(),
                        items: vec![],
                        error: Some(e.to_string()),
                    }
                }
            }
        });
        join_all(futures).await
    }

    /// Request one quote per vendor concurrently and pick the cheapest
    pub async fn compare_quotes(&self, request: &QuoteRequest) -> ClientResult<QuoteComparison> {
        let futures = self.vendors.iter().map(|client| async move {
            match client.create_quote(request).await {
                Ok(quote) => VendorQuote {
                    vendor: client.vendor().clone(),
                    quote: Some(quote),
                    error: None,
                },
                Err(e) => {
                    warn!(vendor = %client.vendor(), error = %e, "quote request failed");
                    VendorQuote {
                        vendor: client.vendor().clone(),
                        quote: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        });
        let results = join_all(futures).await;

        let valid: Vec<&Quote> = results.iter().filter_map(|r| r.quote.as_ref()).collect();
        let best = valid
            .iter()
            .min_by_key(|quote| quote.total.minor)
            .copied()
            .cloned()
            .ok_or(ClientError::NoQuotesAvailable {
                attempted: results.len(),
            })?;
        let worst_minor = valid
            .iter()
            .map(|quote| quote.total.minor)
            .max()
            .unwrap_or(best.total.minor);

        let savings = Amount::from_minor(worst_minor - best.total.minor, best.total.currency);
        let percentage_saved = if worst_minor > best.total.minor {
            savings.minor as f64 / worst_minor as f64 * 100.0
        } else {
            0.0
        };

        Ok(QuoteComparison {
            results,
            best,
            savings,
            percentage_saved,
        })
    }
}
