// src/models/employee.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::order::OrderItemType;

/// Percentuais de comissão por tipo de item (0 a 100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRates {
    #[schema(example = "10.00")]
    pub service_commission: Decimal,
    pub rental_commission: Decimal,
    pub sale_commission: Decimal,
    pub atelier_commission: Decimal,
}

impl CommissionRates {
    pub fn rate_for(&self, item_type: OrderItemType) -> Decimal {
        match item_type {
            OrderItemType::Service => self.service_commission,
            OrderItemType::DressRental => self.rental_commission,
            OrderItemType::DressSale => self.sale_commission,
            OrderItemType::AtelierSale => self.atelier_commission,
        }
    }

    /// Comissão de uma linha: `preço * quantidade * taxa / 100`.
    pub fn commission_on(&self, item_type: OrderItemType, line_total: Decimal) -> Decimal {
        (line_total * self.rate_for(item_type) / Decimal::ONE_HUNDRED).round_dp(2)
    }
}

pub(crate) fn check_rates(rates: &[Option<Decimal>]) -> Result<(), AppError> {
    let out_of_range = rates
        .iter()
        .flatten()
        .any(|r| *r < Decimal::ZERO || *r > Decimal::ONE_HUNDRED);
    if out_of_range {
        return Err(AppError::BusinessRule("rule.commission_out_of_range"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    #[schema(example = "makeup_artist")]
    pub role: String,
    pub phone: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rates: CommissionRates,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub role: String,
    #[validate(length(min = 3, max = 40, message = "invalid_phone"))]
    pub phone: String,
    pub service_commission: Option<Decimal>,
    pub rental_commission: Option<Decimal>,
    pub sale_commission: Option<Decimal>,
    pub atelier_commission: Option<Decimal>,
    pub active: Option<bool>,
}

impl CreateEmployeePayload {
    pub fn check_rates(&self) -> Result<(), AppError> {
        check_rates(&[
            self.service_commission,
            self.rental_commission,
            self.sale_commission,
            self.atelier_commission,
        ])
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "required"))]
    pub role: Option<String>,
    #[validate(length(min = 3, max = 40, message = "invalid_phone"))]
    pub phone: Option<String>,
    pub service_commission: Option<Decimal>,
    pub rental_commission: Option<Decimal>,
    pub sale_commission: Option<Decimal>,
    pub atelier_commission: Option<Decimal>,
    pub active: Option<bool>,
}

impl UpdateEmployeePayload {
    pub fn check_rates(&self) -> Result<(), AppError> {
        check_rates(&[
            self.service_commission,
            self.rental_commission,
            self.sale_commission,
            self.atelier_commission,
        ])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    pub active: Option<bool>,
}

// ---
// Relatório de comissões
// ---

/// Uma linha vendida por um funcionário (pedido não cancelado).
#[derive(Debug, Clone, FromRow)]
pub struct CommissionLine {
    pub employee_id: Uuid,
    pub item_type: OrderItemType,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCommission {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub items_sold: i64,
    pub sales_total: Decimal,
    pub commission_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommissionPeriod {
    #[param(value_type = String, format = Date)]
    pub from: NaiveDate,
    #[param(value_type = String, format = Date)]
    pub to: NaiveDate,
}

impl CommissionPeriod {
    pub fn check(&self) -> Result<(), AppError> {
        if self.from > self.to {
            return Err(AppError::BusinessRule("rule.invalid_date_range"));
        }
        Ok(())
    }
}

/// Agrega as linhas por funcionário. Funcionários sem vendas aparecem zerados.
pub fn estimate_commissions(employees: &[Employee], lines: &[CommissionLine]) -> Vec<EmployeeCommission> {
    employees
        .iter()
        .map(|employee| {
            let mut report = EmployeeCommission {
                employee_id: employee.id,
                employee_name: employee.name.clone(),
                items_sold: 0,
                sales_total: Decimal::ZERO,
                commission_total: Decimal::ZERO,
            };
            for line in lines.iter().filter(|l| l.employee_id == employee.id) {
                let line_total = line.price * Decimal::from(line.quantity);
                report.items_sold += i64::from(line.quantity);
                report.sales_total += line_total;
                report.commission_total += employee.rates.commission_on(line.item_type, line_total);
            }
            report
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn employee(service: &str, atelier: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Mona".into(),
            role: "makeup_artist".into(),
            phone: "0100".into(),
            rates: CommissionRates {
                service_commission: dec(service),
                rental_commission: Decimal::ZERO,
                sale_commission: Decimal::ZERO,
                atelier_commission: dec(atelier),
            },
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rate_follows_item_type() {
        let mona = employee("10", "5");
        assert_eq!(mona.rates.rate_for(OrderItemType::Service), dec("10"));
        assert_eq!(mona.rates.rate_for(OrderItemType::AtelierSale), dec("5"));
        assert_eq!(mona.rates.rate_for(OrderItemType::DressRental), Decimal::ZERO);
    }

    #[test]
    fn commission_is_price_times_quantity_times_rate() {
        let mona = employee("10", "5");
        let lines = vec![
            CommissionLine {
                employee_id: mona.id,
                item_type: OrderItemType::Service,
                price: dec("800"),
                quantity: 2,
            },
            CommissionLine {
                employee_id: mona.id,
                item_type: OrderItemType::AtelierSale,
                price: dec("12000"),
                quantity: 1,
            },
            CommissionLine {
                employee_id: Uuid::new_v4(),
                item_type: OrderItemType::Service,
                price: dec("999"),
                quantity: 1,
            },
        ];

        let report = estimate_commissions(std::slice::from_ref(&mona), &lines);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].items_sold, 3);
        assert_eq!(report[0].sales_total, dec("13600"));
        // 1600 * 10% + 12000 * 5%
        assert_eq!(report[0].commission_total, dec("760"));
    }

    #[test]
    fn rates_must_be_percentages() {
        assert!(check_rates(&[Some(dec("100")), None]).is_ok());
        assert!(check_rates(&[Some(dec("100.01"))]).is_err());
        assert!(check_rates(&[Some(dec("-1"))]).is_err());
    }

    #[test]
    fn period_must_be_ordered() {
        let period = CommissionPeriod {
            from: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert!(period.check().is_err());
    }
}
