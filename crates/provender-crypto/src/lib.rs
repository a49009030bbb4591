//! Provender Crypto - Mandate authorization primitives
//!
//! This crate provides:
//! - Ed25519 key generation and management
//! - Signing and verification of mandate challenges
//! - Deterministic challenge payload encoding
//!
//! # Security Invariant
//!
//! Signatures are always made and verified over the raw challenge bytes,
//! never over an encoded string form, so transport encoding can never
//! cause a signature mismatch.

pub mod challenge;
pub mod keys;
pub mod signature;

pub use challenge::*;
pub use keys::*;
pub use signature::*;

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
