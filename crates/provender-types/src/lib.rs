//! Provender Types - Canonical domain types for vendor procurement
//!
//! This crate contains all foundational types for Provender with zero
//! dependencies on other provender crates. It defines the complete type
//! system for:
//!
//! - Identity types (QuoteId, CartId, MandateId, PaymentId, VendorId)
//! - Currency and amount types in integer minor units
//! - Catalog items and dietary filtering
//! - Quotes, carts, and negotiated payment terms
//! - Payment mandates and settlement records
//!
//! # Lifecycle
//!
//! ```text
//! Quote → (Negotiation) → Cart lock → Mandate → Payment → Settlement
//! ```

pub mod identity;
pub mod money;
pub mod catalog;
pub mod quote;
pub mod cart;
pub mod mandate;
pub mod payment;
pub mod error;

pub use identity::*;
pub use money::*;
pub use catalog::*;
pub use quote::*;
pub use cart::*;
pub use mandate::*;
pub use payment::*;
pub use error::*;

/// Version of the Provender types schema
pub const TYPES_VERSION: &str = "0.1.0";
