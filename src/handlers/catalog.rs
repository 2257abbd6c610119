// src/handlers/catalog.rs

use axum::Json;

use crate::models::catalog::OrderItemCatalog;

/// Opções em cascata do formulário de itens: tipo -> categoria -> estilo.
#[utoipa::path(
    get,
    path = "/api/catalog/order-items",
    tag = "Catalog",
    responses(
        (status = 200, description = "Tipos de item e serviços disponíveis", body = OrderItemCatalog)
    ),
    security(("api_jwt" = []))
)]
pub async fn order_item_catalog() -> Json<OrderItemCatalog> {
    Json(OrderItemCatalog::build())
}
