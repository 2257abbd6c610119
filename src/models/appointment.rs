// src/models/appointment.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub date: DateTime<Utc>,
    #[schema(example = "fitting")]
    pub appointment_type: Option<String>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Agendamento com o nome do cliente (JOIN), para o calendário.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client_name: String,
    pub client_phone: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentPayload {
    pub client_id: Uuid,
    pub date: DateTime<Utc>,
    #[validate(length(max = 100, message = "too_long"))]
    pub appointment_type: Option<String>,
    pub status: Option<AppointmentStatus>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentPayload {
    pub client_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(max = 100, message = "too_long"))]
    pub appointment_type: Option<String>,
    pub status: Option<AppointmentStatus>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

/// Intervalo do calendário (datas inclusivas).
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AppointmentFilter {
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub client_id: Option<Uuid>,
}
