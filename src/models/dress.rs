// src/models/dress.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dress {
    pub id: Uuid,
    #[schema(example = "Layla A-line")]
    pub name: String,
    pub category: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    #[schema(example = "1500.00")]
    pub rental_price: Decimal,
    pub sale_price: Option<Decimal>,
    pub is_available: bool,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn check_prices(rental: Option<Decimal>, sale: Option<Decimal>) -> Result<(), AppError> {
    let negative = |v: Option<Decimal>| v.is_some_and(|v| v < Decimal::ZERO);
    if negative(rental) || negative(sale) {
        return Err(AppError::BusinessRule("rule.dress_negative_price"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDressPayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub name: String,
    pub category: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub rental_price: Decimal,
    pub sale_price: Option<Decimal>,
    pub is_available: Option<bool>,
    pub condition: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

impl CreateDressPayload {
    pub fn check_prices(&self) -> Result<(), AppError> {
        check_prices(Some(self.rental_price), self.sale_price)
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDressPayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub rental_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub is_available: Option<bool>,
    pub condition: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

impl UpdateDressPayload {
    pub fn check_prices(&self) -> Result<(), AppError> {
        check_prices(self.rental_price, self.sale_price)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DressFilter {
    pub available: Option<bool>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_prices_are_rejected() {
        let payload = UpdateDressPayload {
            sale_price: Some("-1".parse().unwrap()),
            ..Default::default()
        };
        assert!(payload.check_prices().is_err());

        let payload = UpdateDressPayload {
            rental_price: Some("900".parse().unwrap()),
            ..Default::default()
        };
        assert!(payload.check_prices().is_ok());
    }
}
