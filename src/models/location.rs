// src/models/location.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Governorate {
    pub id: Uuid,
    #[schema(example = "Cairo")]
    pub name: String,
    pub order_num: i32,
    #[schema(example = "50.00")]
    pub delivery_fee: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub governorate_id: Uuid,
    #[schema(example = "Nasr City")]
    pub name: String,
    pub order_num: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGovernoratePayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: String,
    pub order_num: Option<i32>,
    pub delivery_fee: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGovernoratePayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: Option<String>,
    pub order_num: Option<i32>,
    pub delivery_fee: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: String,
    pub order_num: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCityPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: Option<String>,
    pub order_num: Option<i32>,
}
