// src/handlers/orders.rs

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
    models::order::{CreateOrderPayload, OrderDetail, OrderFilter, UpdateOrderPayload, UpdateOrderStatusPayload},
};

// Toda escrita em pedido mexe em saldos, estoque e relatórios
const ORDER_WRITES: &[CacheEntity] = &[
    CacheEntity::Orders,
    CacheEntity::Payments,
    CacheEntity::Dresses,
    CacheEntity::Coupons,
    CacheEntity::Reports,
];

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(OrderFilter),
    responses(
        (status = 200, description = "Pedidos com saldo restante", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<OrderFilter>,
) -> Json<ListResponse> {
    let service = &app_state.order_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Orders, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "order", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens e pagamentos", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = &app_state.order_service;
    let order = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Orders, id.to_string()), || service.get(id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com itens", body = CreatedResponse),
        (status = 400, description = "Itens, cupom ou valores inválidos"),
        (status = 404, description = "Cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .order_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(ORDER_WRITES);
    tracing::debug!("Pedido {} criado por {}", id, session.user.email);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "Orders",
    request_body = UpdateOrderPayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido atualizado", body = SuccessResponse),
        (status = 400, description = "Nada para atualizar ou total abaixo do pago"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .order_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(ORDER_WRITES);
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    request_body = UpdateOrderStatusPayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Status alterado", body = SuccessResponse),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    app_state
        .order_service
        .update_status(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(ORDER_WRITES);
    tracing::info!("Pedido {} -> {:?} ({})", id, payload.status, session.user.email);

    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 204, description = "Pedido, itens e pagamentos removidos"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    locale: Locale,
    session: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .order_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(ORDER_WRITES);
    tracing::info!("Pedido {} removido por {}", id, session.user.email);

    Ok(StatusCode::NO_CONTENT)
}
