// src/handlers/clients.rs

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
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        client::{Client, ClientFilter, CreateClientPayload, UpdateClientPayload},
        order::OrderFilter,
    },
};

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(ClientFilter),
    responses(
        (status = 200, description = "Clientes (lista vazia + aviso se a leitura falhar)", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<ClientFilter>,
) -> Json<ListResponse> {
    let service = &app_state.client_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Clients, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "client", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = &app_state.client_service;
    let client = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Clients, id.to_string()), || service.get(id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(client))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}/orders",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Pedidos do cliente", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_client_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Json<ListResponse> {
    let filter = OrderFilter {
        client_id: Some(id),
        ..Default::default()
    };
    let service = &app_state.order_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Orders, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "order", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = CreatedResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Código de cliente duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Json(payload): Json<CreateClientPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .client_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Clients, CacheEntity::Reports]);
    tracing::debug!("Cliente {} criado por {}", id, session.user.email);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/clients/{id}",
    tag = "Clients",
    request_body = UpdateClientPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = SuccessResponse),
        (status = 400, description = "Nada para atualizar"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .client_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Listagens de pedidos e pagamentos mostram o nome do cliente
    app_state
        .query_cache
        .invalidate(&[CacheEntity::Clients, CacheEntity::Orders, CacheEntity::Payments, CacheEntity::Appointments]);

    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente com pedidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .client_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[
        CacheEntity::Clients,
        CacheEntity::Appointments,
        CacheEntity::Coupons,
        CacheEntity::Reports,
    ]);
    tracing::info!("Cliente {} removido por {}", id, session.user.email);

    Ok(StatusCode::NO_CONTENT)
}
