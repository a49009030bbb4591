//! Provender Audit - Append-only audit trail and notifications
//!
//! Both sinks are external collaborators with a narrow contract: the
//! audit trail records what a flow did, the notification sink tells a
//! human about it. Neither may block or fail the core flow, so the trait
//! surfaces are infallible and implementations swallow their own faults.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use provender_types::FlowId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Severity of an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
}

/// One append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The flow this entry belongs to
    pub flow_id: FlowId,
    /// Event name, e.g. "quote.compared" or "payment.confirmed"
    pub event: String,
    /// Free-form structured payload
    pub data: serde_json::Value,
    /// Severity
    pub level: AuditLevel,
    /// Append time
    pub timestamp: DateTime<Utc>,
    /// Hash of the previous entry (empty for the first)
    pub previous_hash: String,
    /// Hash over this entry's content and the previous hash
    pub hash: String,
}

impl AuditEntry {
    /// Compute the chained hash of this entry
    pub fn compute_hash(&self) -> String {
        let content = format!(
            "{}:{}:{}:{}:{}",
            self.previous_hash,
            self.flow_id,
            self.timestamp.timestamp_millis(),
            self.event,
            self.data
        );
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify the entry hash
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }
}

/// Append-only audit sink
///
/// Appending never blocks or fails the caller.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, flow_id: &FlowId, event: &str, data: serde_json::Value, level: AuditLevel);
}

/// In-memory hash-chained audit log
#[derive(Clone, Default)]
pub struct MemoryAuditLog {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    /// Entries for one flow
    pub async fn entries_for(&self, flow_id: &FlowId) -> Vec<AuditEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| &e.flow_id == flow_id)
            .cloned()
            .collect()
    }

    /// Verify the whole chain
    pub async fn verify_chain(&self) -> bool {
        let entries = self.entries.read().await;
        let mut previous = String::new();
        for entry in entries.iter() {
            if entry.previous_hash != previous || !entry.verify() {
                return false;
            }
            previous = entry.hash.clone();
        }
        true
    }
}

#[async_trait]
impl AuditSink for MemoryAuditLog {
    async fn append(&self, flow_id: &FlowId, event: &str, data: serde_json::Value, level: AuditLevel) {
        let mut entries = self.entries.write().await;
        let previous_hash = entries.last().map(|e| e.hash.clone()).unwrap_or_default();
        let mut entry = AuditEntry {
            flow_id: flow_id.clone(),
            event: event.to_string(),
            data,
            level,
            timestamp: Utc::now(),
            previous_hash,
            hash: String::new(),
        };
        entry.hash = entry.compute_hash();
        entries.push(entry);
    }
}

/// Audit sink that only writes to the process log
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(&self, flow_id: &FlowId, event: &str, data: serde_json::Value, level: AuditLevel) {
        match level {
            AuditLevel::Info => info!(flow_id = %flow_id, event, %data, "audit"),
            AuditLevel::Warn => warn!(flow_id = %flow_id, event, %data, "audit"),
            AuditLevel::Error => error!(flow_id = %flow_id, event, %data, "audit"),
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Typed notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SnackOptions,
    ApprovalRequest,
    PaymentConfirmation,
    Error,
}

/// A notification event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl NotificationEvent {
    pub fn new(kind: NotificationKind, payload: serde_json::Value) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Notification delivery; failure must not abort the core flow, so
/// implementations log delivery problems locally instead of returning them
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: NotificationEvent);
}

/// Notification sink that only writes to the process log
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(&self, event: NotificationEvent) {
        info!(kind = ?event.kind, payload = %event.payload, "notification");
    }
}
