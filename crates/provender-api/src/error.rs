//! API error handling
//!
//! Every handler converts domain errors to the taxonomy's status codes at
//! the boundary; nothing crosses the wire as anything other than a
//! structured JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use provender_types::ProvenderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// A domain error carried to the HTTP boundary
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ProvenderError);

/// Structured error body: `{"error": message, "code": CODE}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
}

impl ApiError {
    /// Map the taxonomy onto HTTP status codes
    ///
    /// Business-rule rejections (expired mandate, bad signature, expired
    /// quote) surface as 400 with an explanatory body, not as 5xx faults.
    pub fn status_code(&self) -> StatusCode {
        use ProvenderError::*;
        match &self.0 {
            InvalidRequest { .. }
            | UnknownSku { .. }
            | QuoteExpired { .. }
            | CartLockExpired { .. }
            | CartNotLocked { .. }
            | InvalidMandateState { .. }
            | MandateExpired { .. }
            | InvalidSignature { .. }
            | CurrencyMismatch { .. } => StatusCode::BAD_REQUEST,

            QuoteNotFound { .. }
            | CartNotFound { .. }
            | MandateNotFound { .. }
            | PaymentNotFound { .. } => StatusCode::NOT_FOUND,

            AmountOverflow
            | NoQuotesAvailable { .. }
            | ConfirmationTimeout { .. }
            | VendorUnreachable { .. }
            | Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "internal error");
        }
        let body = ErrorBody {
            // internal faults get a generic message; the detail stays in the log
            error: if status == StatusCode::INTERNAL_SERVER_ERROR {
                "internal error".to_string()
            } else {
                self.0.to_string()
            },
            code: self.0.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError(ProvenderError::QuoteNotFound {
            quote_id: "quote_x".to_string(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let expired = ApiError(ProvenderError::MandateExpired {
            mandate_id: "mandate_x".to_string(),
            expired_at: "now".to_string(),
        });
        assert_eq!(expired.status_code(), StatusCode::BAD_REQUEST);

        let internal = ApiError(ProvenderError::internal("boom"));
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
