//! Provender API - JSON-over-HTTP surface
//!
//! Two routers, mirroring the two process roles:
//!
//! ```text
//! vendor:      /api/v1/
//!              ├── /catalog/query      POST
//!              ├── /quote              POST
//!              ├── /quote/:id          GET
//!              ├── /negotiate          POST
//!              ├── /cart/lock          POST
//!              ├── /cart/:id           GET
//!              └── /cart/:id/release   POST
//!
//! settlement:  /api/v1/
//!              ├── /mandate            POST
//!              ├── /mandate/:id        GET
//!              ├── /pay                POST
//!              └── /payment/status     GET
//! ```
//!
//! Both expose `/api/v1/health`. Error bodies are always
//! `{"error": message, "code": CODE}` with the taxonomy's status codes.

pub mod dto;
pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult, ErrorBody};

use axum::{
    routing::{get, post},
    Router,
};
use provender_settlement::SettlementService;
use provender_vendor::Vendor;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the router for one vendor process
pub fn vendor_router(vendor: Vendor) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::vendor::health))
        .route("/api/v1/catalog/query", post(handlers::vendor::catalog_query))
        .route("/api/v1/quote", post(handlers::vendor::quote_create))
        .route("/api/v1/quote/:id", get(handlers::vendor::quote_get))
        .route("/api/v1/negotiate", post(handlers::vendor::negotiate))
        .route("/api/v1/cart/lock", post(handlers::vendor::cart_lock))
        .route("/api/v1/cart/:id", get(handlers::vendor::cart_get))
        .route("/api/v1/cart/:id/release", post(handlers::vendor::cart_release))
        .with_state(vendor)
}

/// Build the router for the settlement process
pub fn settlement_router(service: SettlementService) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::settlement::health))
        .route("/api/v1/mandate", post(handlers::settlement::mandate_create))
        .route("/api/v1/mandate/:id", get(handlers::settlement::mandate_get))
        .route("/api/v1/pay", post(handlers::settlement::pay))
        .route("/api/v1/payment/status", get(handlers::settlement::payment_status))
        .with_state(service)
}

/// Standard middleware stack: request tracing and permissive CORS
pub fn with_middleware(router: Router) -> Router {
    router.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
