// src/handlers/settings.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query_cache::{CacheEntity, QueryKey},
        responses::{list_or_notice, ListResponse},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::settings::{PutSettingPayload, SettingView},
};

#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Configurações do sistema", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_settings(State(app_state): State<AppState>, locale: Locale) -> Json<ListResponse> {
    let service = &app_state.settings_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Settings, "all"), || service.list())
        .await;

    list_or_notice(result, "setting", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    tag = "Settings",
    params(("key" = String, Path, description = "Chave da configuração")),
    responses(
        (status = 200, description = "Configuração", body = SettingView),
        (status = 404, description = "Chave inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_setting(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let service = &app_state.settings_service;
    let setting = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Settings, format!("key:{key}")), || service.get(&key))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(setting))
}

/// Cria ou substitui o valor de uma chave.
#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    tag = "Settings",
    request_body = PutSettingPayload,
    params(("key" = String, Path, description = "Chave da configuração")),
    responses(
        (status = 200, description = "Configuração gravada", body = SettingView),
        (status = 400, description = "Valor incompatível com o tipo")
    ),
    security(("api_jwt" = []))
)]
pub async fn put_setting(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Path(key): Path<String>,
    Json(payload): Json<PutSettingPayload>,
) -> Result<Json<SettingView>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let setting = app_state
        .settings_service
        .put(&key, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Settings]);
    tracing::info!("Configuração '{}' alterada por {}", key, session.user.email);

    Ok(Json(setting))
}

#[utoipa::path(
    delete,
    path = "/api/settings/{key}",
    tag = "Settings",
    params(("key" = String, Path, description = "Chave da configuração")),
    responses(
        (status = 204, description = "Configuração removida"),
        (status = 404, description = "Chave inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_setting(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    app_state
        .settings_service
        .delete(&key)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Settings]);
    Ok(StatusCode::NO_CONTENT)
}
