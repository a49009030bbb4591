//! Vendor-surface handlers: catalog, quotes, negotiation, carts

use crate::dto::{
    CartLockRequest, CatalogQueryRequest, CatalogQueryResponse, HealthResponse, NegotiateRequest,
};
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use provender_types::{Cart, CartId, ProvenderError, Quote, QuoteId};
use provender_vendor::{NegotiationOutcome, QuoteRequest, Vendor};

/// Liveness check
pub async fn health(State(vendor): State<Vendor>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: format!("vendor:{}", vendor.profile.id),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/v1/catalog/query`
pub async fn catalog_query(
    State(vendor): State<Vendor>,
    Json(request): Json<CatalogQueryRequest>,
) -> ApiResult<Json<CatalogQueryResponse>> {
    let filter = request.into_filter(vendor.profile.currency);
    Ok(Json(CatalogQueryResponse {
        items: vendor.catalog.query(&filter),
    }))
}

/// `POST /api/v1/quote`
pub async fn quote_create(
    State(vendor): State<Vendor>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<Json<Quote>> {
    let quote = vendor.quote_engine.create_quote(request).await?;
    Ok(Json(quote))
}

/// `GET /api/v1/quote/:id`
pub async fn quote_get(
    State(vendor): State<Vendor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Quote>> {
    let quote_id = parse_quote_id(&id)?;
    let quote = vendor.quote_engine.get_quote(&quote_id).await?;
    Ok(Json(quote))
}

/// `POST /api/v1/negotiate`
pub async fn negotiate(
    State(vendor): State<Vendor>,
    Json(request): Json<NegotiateRequest>,
) -> ApiResult<Json<NegotiationOutcome>> {
    let quote_id = parse_quote_id(&request.quote_id)?;
    let offer = request.counter_offer.into_offer(vendor.profile.currency);
    let outcome = vendor.negotiation.counter_offer(&quote_id, offer).await?;
    Ok(Json(outcome))
}

/// `POST /api/v1/cart/lock`
pub async fn cart_lock(
    State(vendor): State<Vendor>,
    Json(request): Json<CartLockRequest>,
) -> ApiResult<Json<Cart>> {
    let quote_id = parse_quote_id(&request.quote_id)?;
    let cart = vendor.cart_locker.lock(&quote_id).await?;
    Ok(Json(cart))
}

/// `GET /api/v1/cart/:id`
pub async fn cart_get(
    State(vendor): State<Vendor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Cart>> {
    let cart_id = parse_cart_id(&id)?;
    let cart = vendor.cart_locker.get_cart(&cart_id).await?;
    Ok(Json(cart))
}

/// `POST /api/v1/cart/:id/release`
pub async fn cart_release(
    State(vendor): State<Vendor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Cart>> {
    let cart_id = parse_cart_id(&id)?;
    let cart = vendor.cart_locker.release(&cart_id).await?;
    Ok(Json(cart))
}

// A malformed ID can never name a stored entity, so it reads as not-found.
fn parse_quote_id(raw: &str) -> Result<QuoteId, ApiError> {
    QuoteId::parse(raw).map_err(|_| {
        ApiError(ProvenderError::QuoteNotFound {
            quote_id: raw.to_string(),
        })
    })
}

fn parse_cart_id(raw: &str) -> Result<CartId, ApiError> {
    CartId::parse(raw).map_err(|_| {
        ApiError(ProvenderError::CartNotFound {
            cart_id: raw.to_string(),
        })
    })
}
