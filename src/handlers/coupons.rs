// src/handlers/coupons.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query_cache::{CacheEntity, QueryKey},
        responses::{list_or_notice, CreatedResponse, ListResponse, SuccessResponse},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::coupon::{
        CouponFilter, CouponQuote, CreateCouponPayload, ReferralCoupon, UpdateCouponPayload, ValidateCouponPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/coupons",
    tag = "Coupons",
    params(CouponFilter),
    responses(
        (status = 200, description = "Cupons de indicação", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_coupons(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<CouponFilter>,
) -> Json<ListResponse> {
    let service = &app_state.coupon_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Coupons, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "coupon", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/coupons/{id}",
    tag = "Coupons",
    params(("id" = Uuid, Path, description = "ID do cupom")),
    responses(
        (status = 200, description = "Cupom", body = ReferralCoupon),
        (status = 404, description = "Cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = &app_state.coupon_service;
    let coupon = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Coupons, id.to_string()), || service.get(id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(coupon))
}

#[utoipa::path(
    post,
    path = "/api/coupons",
    tag = "Coupons",
    request_body = CreateCouponPayload,
    responses(
        (status = 201, description = "Cupom criado", body = CreatedResponse),
        (status = 409, description = "Código já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateCouponPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .coupon_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Coupons]);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/coupons/{id}",
    tag = "Coupons",
    request_body = UpdateCouponPayload,
    params(("id" = Uuid, Path, description = "ID do cupom")),
    responses(
        (status = 200, description = "Cupom atualizado", body = SuccessResponse),
        (status = 404, description = "Cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCouponPayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .coupon_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Coupons]);
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/coupons/{id}",
    tag = "Coupons",
    params(("id" = Uuid, Path, description = "ID do cupom")),
    responses(
        (status = 204, description = "Cupom removido"),
        (status = 404, description = "Cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .coupon_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Coupons, CacheEntity::Orders]);
    Ok(StatusCode::NO_CONTENT)
}

/// Simula o desconto de um código sobre um subtotal, sem consumir o cupom.
#[utoipa::path(
    post,
    path = "/api/coupons/validate",
    tag = "Coupons",
    request_body = ValidateCouponPayload,
    responses(
        (status = 200, description = "Desconto aplicável", body = CouponQuote),
        (status = 400, description = "Cupom inativo ou expirado"),
        (status = 404, description = "Código inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn validate_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ValidateCouponPayload>,
) -> Result<Json<CouponQuote>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .coupon_service
        .quote(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quote))
}
