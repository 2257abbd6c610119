// src/handlers/inventory.rs

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
    models::dress::{CreateDressPayload, Dress, DressFilter, UpdateDressPayload},
};

const DRESS_WRITES: &[CacheEntity] = &[CacheEntity::Dresses, CacheEntity::Reports];

#[utoipa::path(
    get,
    path = "/api/inventory/dresses",
    tag = "Inventory",
    params(DressFilter),
    responses(
        (status = 200, description = "Vestidos em estoque", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_dresses(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<DressFilter>,
) -> Json<ListResponse> {
    let service = &app_state.dress_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Dresses, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "dress", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/inventory/dresses/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do vestido")),
    responses(
        (status = 200, description = "Vestido", body = Dress),
        (status = 404, description = "Vestido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dress(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = &app_state.dress_service;
    let dress = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Dresses, id.to_string()), || service.get(id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dress))
}

#[utoipa::path(
    post,
    path = "/api/inventory/dresses",
    tag = "Inventory",
    request_body = CreateDressPayload,
    responses(
        (status = 201, description = "Vestido cadastrado", body = CreatedResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_dress(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateDressPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .dress_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(DRESS_WRITES);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/inventory/dresses/{id}",
    tag = "Inventory",
    request_body = UpdateDressPayload,
    params(("id" = Uuid, Path, description = "ID do vestido")),
    responses(
        (status = 200, description = "Vestido atualizado", body = SuccessResponse),
        (status = 404, description = "Vestido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_dress(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDressPayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .dress_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(DRESS_WRITES);
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/dresses/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do vestido")),
    responses(
        (status = 204, description = "Vestido removido"),
        (status = 404, description = "Vestido não encontrado"),
        (status = 409, description = "Vestido usado em pedidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_dress(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .dress_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(DRESS_WRITES);
    Ok(StatusCode::NO_CONTENT)
}
