//! Settlement-surface handlers: mandates and payments

use crate::dto::{
    CreateMandateRequest, HealthResponse, MandateCreatedResponse, MandatePublicResponse,
    PayRequestBody, PayResponse, PaymentStatusQuery,
};
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use provender_settlement::{PayRequest, SettlementService};
use provender_types::{MandateId, Payment, PaymentId, ProvenderError};

/// Liveness check
pub async fn health(State(_service): State<SettlementService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "settlement".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/v1/mandate`
pub async fn mandate_create(
    State(service): State<SettlementService>,
    Json(request): Json<CreateMandateRequest>,
) -> ApiResult<Json<MandateCreatedResponse>> {
    let mandate = service.issuer.issue(request.into_request()?).await?;
    Ok(Json(MandateCreatedResponse::from_mandate(&mandate)))
}

/// `GET /api/v1/mandate/:id`
pub async fn mandate_get(
    State(service): State<SettlementService>,
    Path(id): Path<String>,
) -> ApiResult<Json<MandatePublicResponse>> {
    let mandate_id = parse_mandate_id(&id)?;
    let mandate = service.issuer.get(&mandate_id).await?;
    Ok(Json(MandatePublicResponse::from_mandate(&mandate)))
}

/// `POST /api/v1/pay`
pub async fn pay(
    State(service): State<SettlementService>,
    Json(request): Json<PayRequestBody>,
) -> ApiResult<Json<PayResponse>> {
    let mandate_id = parse_mandate_id(&request.mandate_id)?;
    let payment = service
        .payments
        .pay(PayRequest {
            mandate_id,
            signature: request.signature,
            public_key: request.public_key,
        })
        .await?;
    Ok(Json(PayResponse {
        payment_id: payment.id.to_string(),
        status: payment.status.to_string(),
        amount: payment.amount,
        transaction_ref: payment.transaction_ref.clone(),
        processed_at: payment.created_at,
    }))
}

/// `GET /api/v1/payment/status?paymentId=...`
pub async fn payment_status(
    State(service): State<SettlementService>,
    Query(query): Query<PaymentStatusQuery>,
) -> ApiResult<Json<Payment>> {
    let raw = query.payment_id.ok_or_else(|| {
        ApiError(ProvenderError::invalid_request(
            "paymentId",
            "query parameter is required",
        ))
    })?;
    let payment_id = PaymentId::parse(&raw).map_err(|_| {
        ApiError(ProvenderError::PaymentNotFound {
            payment_id: raw.clone(),
        })
    })?;
    let payment = service.payments.get_payment(&payment_id).await?;
    Ok(Json(payment))
}

fn parse_mandate_id(raw: &str) -> Result<MandateId, ApiError> {
    MandateId::parse(raw).map_err(|_| {
        ApiError(ProvenderError::MandateNotFound {
            mandate_id: raw.to_string(),
        })
    })
}
