// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(example = "Sara Ahmed")]
    pub full_name: String,
    #[schema(example = "+20 100 000 0000")]
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub governorate_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub client_code: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    #[schema(example = "Sara Ahmed")]
    pub full_name: String,

    #[validate(length(min = 3, max = 40, message = "invalid_phone"))]
    pub phone: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub address: Option<String>,
    pub governorate_id: Option<Uuid>,
    pub city_id: Option<Uuid>,

    #[validate(length(min = 1, max = 40, message = "invalid_code"))]
    pub client_code: Option<String>,

    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub full_name: Option<String>,
    #[validate(length(min = 3, max = 40, message = "invalid_phone"))]
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub governorate_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    #[validate(length(min = 1, max = 40, message = "invalid_code"))]
    pub client_code: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClientFilter {
    /// Busca por nome, telefone ou código
    pub search: Option<String>,
    pub governorate_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let payload = CreateClientPayload {
            full_name: String::new(),
            phone: "0100000000".into(),
            email: Some("sara@example.com".into()),
            address: None,
            governorate_id: None,
            city_id: None,
            client_code: None,
            notes: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));
    }

    #[test]
    fn update_accepts_partial_bodies() {
        let payload: UpdateClientPayload =
            serde_json::from_value(serde_json::json!({ "phone": "0123456789" })).unwrap();
        assert!(payload.validate().is_ok());
        assert!(payload.full_name.is_none());
    }
}
