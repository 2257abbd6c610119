// src/handlers/calendar.rs

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
    models::appointment::{AppointmentFilter, AppointmentView, CreateAppointmentPayload, UpdateAppointmentPayload},
};

const APPOINTMENT_WRITES: &[CacheEntity] = &[CacheEntity::Appointments, CacheEntity::Reports];

#[utoipa::path(
    get,
    path = "/api/calendar/appointments",
    tag = "Calendar",
    params(AppointmentFilter),
    responses(
        (status = 200, description = "Agenda de atendimentos", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_appointments(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<AppointmentFilter>,
) -> Json<ListResponse> {
    let service = &app_state.appointment_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Appointments, &filter), || service.list(&filter))
        .await;

    list_or_notice(result, "appointment", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/calendar/appointments/{id}",
    tag = "Calendar",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento", body = AppointmentView),
        (status = 404, description = "Agendamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = &app_state.appointment_service;
    let appointment = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Appointments, id.to_string()), || service.get(id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(appointment))
}

#[utoipa::path(
    post,
    path = "/api/calendar/appointments",
    tag = "Calendar",
    request_body = CreateAppointmentPayload,
    responses(
        (status = 201, description = "Agendamento criado", body = CreatedResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateAppointmentPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let id = app_state
        .appointment_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(APPOINTMENT_WRITES);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    patch,
    path = "/api/calendar/appointments/{id}",
    tag = "Calendar",
    request_body = UpdateAppointmentPayload,
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento atualizado", body = SuccessResponse),
        (status = 404, description = "Agendamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentPayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .appointment_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(APPOINTMENT_WRITES);
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete,
    path = "/api/calendar/appointments/{id}",
    tag = "Calendar",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 204, description = "Agendamento removido"),
        (status = 404, description = "Agendamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .appointment_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.query_cache.invalidate(APPOINTMENT_WRITES);
    Ok(StatusCode::NO_CONTENT)
}
