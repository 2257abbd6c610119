// src/models/payment.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    MobileWallet,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    #[schema(example = "1000.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pagamento com o cliente do pedido, para a tela de pagamentos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: Payment,
    pub client_id: Uuid,
    pub client_name: String,
}

// Estado do pedido travado (FOR UPDATE) no momento do pagamento
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LockedOrderAmounts {
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
}

impl LockedOrderAmounts {
    pub fn remaining(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }

    /// O valor precisa ser positivo e caber no saldo restante.
    pub fn check_payment(&self, amount: Decimal) -> Result<(), AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::BusinessRule("rule.payment_amount_not_positive"));
        }
        if amount > self.remaining() {
            return Err(AppError::BusinessRule("rule.payment_exceeds_balance"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    pub order_id: Uuid,
    #[schema(example = "1000.00")]
    pub amount: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(length(max = 1000, message = "too_long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaymentFilter {
    pub order_id: Option<Uuid>,
    pub method: Option<PaymentMethod>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}

/// Pedido com saldo em aberto (tela "pagamentos pendentes").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayment {
    pub order_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub client_phone: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(total: &str, paid: &str) -> LockedOrderAmounts {
        LockedOrderAmounts {
            total_amount: total.parse().unwrap(),
            paid_amount: paid.parse().unwrap(),
        }
    }

    #[test]
    fn payment_within_balance_is_accepted() {
        let order = amounts("5000", "2000");
        assert!(order.check_payment("1000".parse().unwrap()).is_ok());
        assert!(order.check_payment("3000".parse().unwrap()).is_ok());
    }

    #[test]
    fn payment_above_remaining_is_rejected() {
        let order = amounts("5000", "2000");
        let err = order.check_payment("3000.01".parse().unwrap()).unwrap_err();
        assert_eq!(err.message_key(), "rule.payment_exceeds_balance");
    }

    #[test]
    fn zero_or_negative_payment_is_rejected() {
        let order = amounts("5000", "0");
        assert_eq!(
            order.check_payment(Decimal::ZERO).unwrap_err().message_key(),
            "rule.payment_amount_not_positive"
        );
        assert!(order.check_payment("-10".parse().unwrap()).is_err());
    }

    #[test]
    fn method_uses_snake_case_on_the_wire() {
        let method: PaymentMethod = serde_json::from_str("\"mobile_wallet\"").unwrap();
        assert_eq!(method, PaymentMethod::MobileWallet);
    }
}
