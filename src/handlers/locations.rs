// src/handlers/locations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
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
    models::location::{CreateCityPayload, CreateGovernoratePayload, UpdateCityPayload, UpdateGovernoratePayload},
};

// ---
// Governorates
// ---

#[utoipa::path(
    get,
    path = "/api/locations/governorates",
    tag = "Locations",
    responses(
        (status = 200, description = "Províncias ordenadas por order_num", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_governorates(State(app_state): State<AppState>, locale: Locale) -> Json<ListResponse> {
    let service = &app_state.location_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Locations, "governorates"), || service.list_governorates())
        .await;

    list_or_notice(result, "governorate", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    post,
    path = "/api/locations/governorates",
    tag = "Locations",
    request_body = CreateGovernoratePayload,
    responses(
        (status = 201, description = "Província criada", body = CreatedResponse),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_governorate(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateGovernoratePayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .location_service
        .create_governorate(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Locations]);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/locations/governorates/{id}",
    tag = "Locations",
    request_body = UpdateGovernoratePayload,
    params(("id" = Uuid, Path, description = "ID da província")),
    responses(
        (status = 200, description = "Província atualizada", body = SuccessResponse),
        (status = 404, description = "Província não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_governorate(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGovernoratePayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .location_service
        .update_governorate(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Locations]);
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/locations/governorates/{id}",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "ID da província")),
    responses(
        (status = 204, description = "Província e suas cidades removidas"),
        (status = 404, description = "Província não encontrada"),
        (status = 409, description = "Província usada por clientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_governorate(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .location_service
        .delete_governorate(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Locations]);
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Cities
// ---

#[utoipa::path(
    get,
    path = "/api/locations/governorates/{id}/cities",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "ID da província")),
    responses(
        (status = 200, description = "Cidades da província", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_cities(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(governorate_id): Path<Uuid>,
) -> Json<ListResponse> {
    let service = &app_state.location_service;
    let result = app_state
        .query_cache
        .fetch(
            QueryKey::new(CacheEntity::Locations, format!("cities:{governorate_id}")),
            || service.list_cities(governorate_id),
        )
        .await;

    list_or_notice(result, "city", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    post,
    path = "/api/locations/governorates/{id}/cities",
    tag = "Locations",
    request_body = CreateCityPayload,
    params(("id" = Uuid, Path, description = "ID da província")),
    responses(
        (status = 201, description = "Cidade criada", body = CreatedResponse),
        (status = 404, description = "Província não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_city(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(governorate_id): Path<Uuid>,
    Json(payload): Json<CreateCityPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .location_service
        .create_city(governorate_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Locations]);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/locations/cities/{id}",
    tag = "Locations",
    request_body = UpdateCityPayload,
    params(("id" = Uuid, Path, description = "ID da cidade")),
    responses(
        (status = 200, description = "Cidade atualizada", body = SuccessResponse),
        (status = 404, description = "Cidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_city(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCityPayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .location_service
        .update_city(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Locations]);
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/locations/cities/{id}",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "ID da cidade")),
    responses(
        (status = 204, description = "Cidade removida"),
        (status = 404, description = "Cidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_city(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .location_service
        .delete_city(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Locations]);
    Ok(StatusCode::NO_CONTENT)
}
