//! Deterministic mandate challenge encoding
//!
//! The challenge binds a signature to exactly one mandate: it encodes the
//! mandate's own identity and terms, so a signature can never be replayed
//! against a different mandate.

use provender_types::{Amount, CartId, MandateId};

/// Encoding version tag; bump on any change to the field layout
const CHALLENGE_PREFIX: &str = "provender-mandate-v1";

/// Build the challenge bytes for a mandate
///
/// Layout is a pipe-delimited canonical string:
/// `provender-mandate-v1|{mandate}|{cart}|{payer}|{minor}|{currency}|{ttl}|{issuedAtMillis}`
pub fn build_challenge(
    mandate_id: &MandateId,
    cart_id: &CartId,
    payer_ref: &str,
    amount: &Amount,
    ttl_seconds: i64,
    issued_at_millis: i64,
) -> Vec<u8> {
    format!(
        "{CHALLENGE_PREFIX}|{mandate_id}|{cart_id}|{payer_ref}|{}|{}|{ttl_seconds}|{issued_at_millis}",
        amount.minor, amount.currency,
    )
    .into_bytes()
}
