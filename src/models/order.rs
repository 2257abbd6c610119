// src/models/order.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::catalog::ServiceKind;
use crate::models::payment::Payment;

/// Maior valor que cabe em NUMERIC(12,2): 9 999 999 999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

pub(crate) fn amount_too_large() -> AppError {
    AppError::BusinessRule("rule.order_amount_too_large")
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_item_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderItemType {
    Service,     // Maquiagem, cabelo, henna, fotos
    DressRental, // Aluguel de vestido
    DressSale,   // Venda de vestido do estoque
    AtelierSale, // Vestido confeccionado no ateliê
}

impl OrderItemType {
    pub const ALL: &'static [OrderItemType] = &[
        OrderItemType::Service,
        OrderItemType::DressRental,
        OrderItemType::DressSale,
        OrderItemType::AtelierSale,
    ];

    pub fn requires_service(self) -> bool {
        matches!(self, OrderItemType::Service)
    }

    pub fn requires_dress(self) -> bool {
        !self.requires_service()
    }

    /// Itens que tiram o vestido do estoque quando o pedido é concluído.
    pub fn sells_dress(self) -> bool {
        matches!(self, OrderItemType::DressSale | OrderItemType::AtelierSale)
    }
}

// --- Linhas do banco ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    #[schema(value_type = String, format = Date, example = "2025-03-01")]
    pub order_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2025-04-18")]
    pub event_date: Option<NaiveDate>,
    #[schema(example = "5000.00")]
    pub total_amount: Decimal,
    #[schema(example = "0.00")]
    pub discount_amount: Decimal,
    #[schema(example = "2000.00")]
    pub paid_amount: Decimal,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_type: OrderItemType,
    pub service_kind: Option<ServiceKind>,
    pub dress_id: Option<Uuid>,
    pub description: Option<String>,
    #[schema(example = "1500.00")]
    pub price: Decimal,
    #[schema(example = 1)]
    pub quantity: i32,
}

/// Pedido com os dados do cliente (JOIN), como aparece na listagem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    #[schema(example = "Sara Ahmed")]
    pub client_name: String,
    pub client_phone: String,
}

// --- Saldo ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BalanceState {
    Due,
    Settled,
}

/// Saldo derivado: `restante = total - pago`. Restante <= 0 nunca aparece como dívida.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderBalance {
    pub remaining_amount: Decimal,
    pub balance_state: BalanceState,
}

impl OrderBalance {
    pub fn of(total_amount: Decimal, paid_amount: Decimal) -> Self {
        let remaining_amount = total_amount - paid_amount;
        let balance_state = if remaining_amount > Decimal::ZERO {
            BalanceState::Due
        } else {
            BalanceState::Settled
        };
        Self { remaining_amount, balance_state }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub summary: OrderSummary,
    #[serde(flatten)]
    pub balance: OrderBalance,
}

impl From<OrderSummary> for OrderView {
    fn from(summary: OrderSummary) -> Self {
        let balance = OrderBalance::of(summary.order.total_amount, summary.order.paid_amount);
        Self { summary, balance }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: OrderView,
    pub items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub item_type: OrderItemType,
    pub service_kind: Option<ServiceKind>,
    pub dress_id: Option<Uuid>,
    #[validate(length(max = 500, message = "too_long"))]
    pub description: Option<String>,
    #[schema(example = "1500.00")]
    pub price: Decimal,
    #[schema(example = 1)]
    pub quantity: Option<i32>,
}

impl NewOrderItem {
    pub fn quantity(&self) -> i32 {
        self.quantity.unwrap_or(1)
    }

    pub fn line_total(&self) -> Result<Decimal, AppError> {
        self.price
            .checked_mul(Decimal::from(self.quantity()))
            .ok_or_else(amount_too_large)
    }

    /// Cada tipo exige o seu complemento: serviço -> `serviceKind`, vestido -> `dressId`.
    pub fn check(&self) -> Result<(), AppError> {
        if self.item_type.requires_service() && self.service_kind.is_none() {
            return Err(AppError::BusinessRule("rule.order_item_missing_service"));
        }
        if self.item_type.requires_dress() && self.dress_id.is_none() {
            return Err(AppError::BusinessRule("rule.order_item_missing_dress"));
        }
        if self.quantity() < 1 {
            return Err(AppError::BusinessRule("rule.order_item_invalid_quantity"));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::BusinessRule("rule.order_item_negative_price"));
        }
        if self.price > MAX_AMOUNT {
            return Err(amount_too_large());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub client_id: Uuid,
    pub employee_id: Option<Uuid>,

    #[schema(value_type = Option<String>, format = Date, example = "2025-03-01")]
    pub order_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-04-18")]
    pub event_date: Option<NaiveDate>,

    // Sem itens o total é obrigatório; com itens é calculado se vier vazio
    #[schema(example = "5000.00")]
    pub total_amount: Option<Decimal>,
    #[schema(example = "2000.00")]
    pub paid_amount: Option<Decimal>,

    #[schema(example = "SARA10")]
    pub coupon_code: Option<String>,

    pub status: Option<OrderStatus>,

    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub employee_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub order_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub event_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub client_id: Option<Uuid>,
    /// Busca por nome ou telefone do cliente
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::MakeupStyle;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn service_item(price: Decimal) -> NewOrderItem {
        NewOrderItem {
            item_type: OrderItemType::Service,
            service_kind: Some(ServiceKind::Makeup(MakeupStyle::Bridal)),
            dress_id: None,
            description: None,
            price,
            quantity: None,
        }
    }

    #[test]
    fn remaining_balance_is_total_minus_paid() {
        let balance = OrderBalance::of(dec("5000"), dec("3000"));
        assert_eq!(balance.remaining_amount, dec("2000"));
        assert_eq!(balance.balance_state, BalanceState::Due);
    }

    #[test]
    fn zero_or_negative_remaining_is_settled() {
        assert_eq!(OrderBalance::of(dec("5000"), dec("5000")).balance_state, BalanceState::Settled);
        assert_eq!(OrderBalance::of(dec("100"), dec("150")).balance_state, BalanceState::Settled);
    }

    #[test]
    fn service_items_need_a_service_kind() {
        let mut item = service_item(dec("800"));
        assert!(item.check().is_ok());

        item.service_kind = None;
        assert_eq!(
            item.check().unwrap_err().message_key(),
            "rule.order_item_missing_service"
        );
    }

    #[test]
    fn dress_items_need_a_dress() {
        let item = NewOrderItem {
            item_type: OrderItemType::AtelierSale,
            service_kind: None,
            dress_id: None,
            description: None,
            price: dec("12000"),
            quantity: Some(1),
        };
        assert_eq!(item.check().unwrap_err().message_key(), "rule.order_item_missing_dress");
    }

    #[test]
    fn line_total_uses_quantity() {
        let mut item = service_item(dec("250.50"));
        item.quantity = Some(3);
        assert_eq!(item.line_total().unwrap(), dec("751.50"));

        item.quantity = Some(0);
        assert!(item.check().is_err());
    }

    #[test]
    fn max_amount_is_the_numeric_12_2_ceiling() {
        assert_eq!(MAX_AMOUNT, dec("9999999999.99"));
    }

    #[test]
    fn huge_prices_are_rejected_instead_of_overflowing() {
        let mut item = service_item(Decimal::MAX);
        item.quantity = Some(2);

        assert_eq!(item.line_total().unwrap_err().message_key(), "rule.order_amount_too_large");
        assert_eq!(item.check().unwrap_err().message_key(), "rule.order_amount_too_large");
    }

    #[test]
    fn only_sales_take_dresses_out_of_stock() {
        assert!(OrderItemType::AtelierSale.sells_dress());
        assert!(OrderItemType::DressSale.sells_dress());
        assert!(!OrderItemType::DressRental.sells_dress());
        assert!(!OrderItemType::Service.sells_dress());
    }
}
