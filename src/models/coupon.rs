// src/models/coupon.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::order::{amount_too_large, MAX_AMOUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "coupon_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    Fixed,
    Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "coupon_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCoupon {
    pub id: Uuid,
    #[schema(example = "SARA10")]
    pub code: String,
    #[schema(example = "10.00")]
    pub amount: Decimal,
    pub coupon_type: CouponType,
    #[schema(value_type = String, format = Date)]
    pub valid_until: NaiveDate,
    pub status: CouponStatus,
    pub usage_count: i32,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ReferralCoupon {
    /// Desconto sobre `subtotal` na data `today`. Nunca passa do subtotal.
    pub fn discount_for(&self, subtotal: Decimal, today: NaiveDate) -> Result<Decimal, AppError> {
        if self.status != CouponStatus::Active {
            return Err(AppError::BusinessRule("rule.coupon_inactive"));
        }
        if self.valid_until < today {
            return Err(AppError::BusinessRule("rule.coupon_expired"));
        }

        if subtotal > MAX_AMOUNT {
            return Err(amount_too_large());
        }

        let discount = match self.coupon_type {
            CouponType::Fixed => self.amount,
            CouponType::Percentage => {
                let scaled = subtotal.checked_mul(self.amount).ok_or_else(amount_too_large)?;
                (scaled / Decimal::ONE_HUNDRED).round_dp(2)
            }
        };
        Ok(discount.min(subtotal).max(Decimal::ZERO))
    }
}

pub(crate) fn check_value(coupon_type: CouponType, amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::BusinessRule("rule.coupon_amount_not_positive"));
    }
    if coupon_type == CouponType::Percentage && amount > Decimal::ONE_HUNDRED {
        return Err(AppError::BusinessRule("rule.coupon_percentage_over_100"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponPayload {
    #[validate(length(min = 3, max = 40, message = "invalid_code"))]
    pub code: String,
    pub amount: Decimal,
    pub coupon_type: Option<CouponType>,
    #[schema(value_type = String, format = Date)]
    pub valid_until: NaiveDate,
    pub status: Option<CouponStatus>,
    pub client_id: Option<Uuid>,
}

impl CreateCouponPayload {
    pub fn check_value(&self) -> Result<(), AppError> {
        check_value(self.coupon_type.unwrap_or(CouponType::Fixed), self.amount)
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCouponPayload {
    #[validate(length(min = 3, max = 40, message = "invalid_code"))]
    pub code: Option<String>,
    pub amount: Option<Decimal>,
    pub coupon_type: Option<CouponType>,
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_until: Option<NaiveDate>,
    pub status: Option<CouponStatus>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponPayload {
    #[validate(length(min = 1, message = "required"))]
    pub code: String,
    #[schema(example = "5000.00")]
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponQuote {
    pub coupon_id: Uuid,
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CouponFilter {
    pub status: Option<CouponStatus>,
    pub client_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn coupon(coupon_type: CouponType, amount: &str) -> ReferralCoupon {
        ReferralCoupon {
            id: Uuid::new_v4(),
            code: "SARA10".into(),
            amount: dec(amount),
            coupon_type,
            valid_until: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: CouponStatus::Active,
            usage_count: 0,
            client_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() {
        let fixed = coupon(CouponType::Fixed, "300");
        assert_eq!(fixed.discount_for(dec("5000"), today()).unwrap(), dec("300"));
        assert_eq!(fixed.discount_for(dec("200"), today()).unwrap(), dec("200"));
    }

    #[test]
    fn percentage_discount_applies_to_subtotal() {
        let pct = coupon(CouponType::Percentage, "10");
        assert_eq!(pct.discount_for(dec("5000"), today()).unwrap(), dec("500"));
    }

    #[test]
    fn huge_subtotals_are_rejected_instead_of_overflowing() {
        let pct = coupon(CouponType::Percentage, "50");
        assert_eq!(
            pct.discount_for(Decimal::MAX, today()).unwrap_err().message_key(),
            "rule.order_amount_too_large"
        );
        assert!(pct.discount_for(MAX_AMOUNT, today()).is_ok());
    }

    #[test]
    fn expired_or_inactive_coupons_are_rejected() {
        let mut c = coupon(CouponType::Fixed, "100");
        c.valid_until = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(c.discount_for(dec("1000"), today()).unwrap_err().message_key(), "rule.coupon_expired");

        let mut c = coupon(CouponType::Fixed, "100");
        c.status = CouponStatus::Inactive;
        assert_eq!(c.discount_for(dec("1000"), today()).unwrap_err().message_key(), "rule.coupon_inactive");
    }

    #[test]
    fn coupon_valid_on_its_last_day() {
        let mut c = coupon(CouponType::Fixed, "100");
        c.valid_until = today();
        assert!(c.discount_for(dec("1000"), today()).is_ok());
    }

    #[test]
    fn percentage_over_100_is_rejected() {
        assert!(check_value(CouponType::Percentage, dec("100")).is_ok());
        assert!(check_value(CouponType::Percentage, dec("101")).is_err());
        assert!(check_value(CouponType::Fixed, dec("250")).is_ok());
        assert!(check_value(CouponType::Fixed, Decimal::ZERO).is_err());
    }
}
