// src/handlers/employees.rs

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
    models::employee::{CreateEmployeePayload, Employee, EmployeeFilter, UpdateEmployeePayload},
};

// Taxas alteradas mudam o relatório de comissões
const EMPLOYEE_WRITES: &[CacheEntity] = &[CacheEntity::Employees, CacheEntity::Reports];

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Equipe", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<EmployeeFilter>,
) -> Json<ListResponse> {
    let service = &app_state.employee_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Employees, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "employee", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = &app_state.employee_service;
    let employee = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Employees, id.to_string()), || service.get(id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(employee))
}

#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário cadastrado", body = CreatedResponse),
        (status = 400, description = "Comissão fora de 0 a 100")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .employee_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(EMPLOYEE_WRITES);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/employees/{id}",
    tag = "Employees",
    request_body = UpdateEmployeePayload,
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário atualizado", body = SuccessResponse),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .employee_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(EMPLOYEE_WRITES);
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 204, description = "Funcionário removido"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .employee_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(&[CacheEntity::Employees, CacheEntity::Orders, CacheEntity::Reports]);
    Ok(StatusCode::NO_CONTENT)
}
