// src/handlers/payments.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query_cache::{CacheEntity, QueryKey},
        responses::{list_or_notice, CreatedResponse, ListResponse},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::payment::{CreatePaymentPayload, PaymentFilter},
};

const PAYMENT_WRITES: &[CacheEntity] = &[CacheEntity::Payments, CacheEntity::Orders, CacheEntity::Reports];

#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    params(PaymentFilter),
    responses(
        (status = 200, description = "Pagamentos registrados", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<PaymentFilter>,
) -> Json<ListResponse> {
    let service = &app_state.payment_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Payments, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "payment", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/payments/pending",
    tag = "Payments",
    responses(
        (status = 200, description = "Pedidos com saldo em aberto", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_pending_payments(State(app_state): State<AppState>, locale: Locale) -> Json<ListResponse> {
    let service = &app_state.payment_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Payments, "pending"), || service.list_pending())
        .await;

    list_or_notice(result, "payment", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = CreatedResponse),
        (status = 400, description = "Valor não positivo ou acima do saldo"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .payment_service
        .record(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(PAYMENT_WRITES);
    tracing::debug!("Pagamento {} registrado por {}", id, session.user.email);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    delete,
    path = "/api/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 204, description = "Pagamento removido e saldo ajustado"),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .payment_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(PAYMENT_WRITES);
    tracing::info!("Pagamento {} removido por {}", id, session.user.email);

    Ok(StatusCode::NO_CONTENT)
}
