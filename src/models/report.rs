// src/models/report.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;
use crate::models::payment::PaymentMethod;

// 1. Cards do topo do dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_clients: i64,
    pub orders_this_month: i64,
    pub revenue_this_month: Decimal,
    pub pending_payments: i64,      // Pedidos com saldo em aberto
    pub outstanding_amount: Decimal, // Soma dos saldos em aberto
    pub appointments_today: i64,
    pub available_dresses: i64,
}

// 2. Receita por mês (função `monthly_revenue` do banco)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    #[schema(example = 3)]
    pub month: i32,
    #[schema(example = "15000.00")]
    pub total: Decimal,
}

/// Completa os meses sem pagamento com zero: a resposta sempre tem 12 entradas.
pub fn fill_months(rows: Vec<MonthlyRevenue>) -> Vec<MonthlyRevenue> {
    (1..=12)
        .map(|month| {
            let total = rows
                .iter()
                .find(|r| r.month == month)
                .map(|r| r.total)
                .unwrap_or(Decimal::ZERO);
            MonthlyRevenue { month, total }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    #[param(example = 2025)]
    pub year: Option<i32>,
}

pub fn check_year(year: i32) -> Result<i32, AppError> {
    if !(2000..=2100).contains(&year) {
        return Err(AppError::BusinessRule("rule.invalid_year"));
    }
    Ok(year)
}

// 3. Pagamentos por forma de pagamento
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodBreakdown {
    pub payment_method: PaymentMethod,
    pub count: i64,
    pub total: Decimal,
}

// 4. Crescimento mês a mês
#[derive(Debug, Clone, Copy, FromRow)]
pub struct MonthComparison {
    pub current_revenue: Decimal,
    pub previous_revenue: Decimal,
    pub current_orders: i64,
    pub previous_orders: i64,
    pub current_clients: i64,
    pub previous_clients: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetric {
    pub current: Decimal,
    pub previous: Decimal,
    /// `null` quando o mês anterior é zero
    pub percent: Option<Decimal>,
}

impl GrowthMetric {
    pub fn between(current: Decimal, previous: Decimal) -> Self {
        Self {
            current,
            previous,
            percent: growth_percent(current, previous),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthReport {
    pub revenue: GrowthMetric,
    pub orders: GrowthMetric,
    pub new_clients: GrowthMetric,
}

impl From<MonthComparison> for GrowthReport {
    fn from(m: MonthComparison) -> Self {
        Self {
            revenue: GrowthMetric::between(m.current_revenue, m.previous_revenue),
            orders: GrowthMetric::between(m.current_orders.into(), m.previous_orders.into()),
            new_clients: GrowthMetric::between(m.current_clients.into(), m.previous_clients.into()),
        }
    }
}

/// `(atual - anterior) / anterior * 100`, com 2 casas.
pub fn growth_percent(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    #[test]
    fn missing_months_are_zero() {
        let rows = vec![
            MonthlyRevenue { month: 3, total: dec("1500") },
            MonthlyRevenue { month: 11, total: dec("800.50") },
        ];
        let filled = fill_months(rows);

        assert_eq!(filled.len(), 12);
        assert_eq!(filled[0].total, Decimal::ZERO);
        assert_eq!(filled[2].total, dec("1500"));
        assert_eq!(filled[10].total, dec("800.50"));
        assert_eq!(filled[11].month, 12);
    }

    #[test]
    fn growth_is_relative_to_previous_month() {
        assert_eq!(growth_percent(dec("1500"), dec("1000")), Some(dec("50")));
        assert_eq!(growth_percent(dec("500"), dec("1000")), Some(dec("-50")));
    }

    #[test]
    fn growth_from_zero_is_undefined() {
        assert_eq!(growth_percent(dec("1000"), Decimal::ZERO), None);

        let report = GrowthReport::from(MonthComparison {
            current_revenue: dec("100"),
            previous_revenue: Decimal::ZERO,
            current_orders: 4,
            previous_orders: 2,
            current_clients: 0,
            previous_clients: 0,
        });
        assert!(report.revenue.percent.is_none());
        assert_eq!(report.orders.percent, Some(dec("100")));
    }

    #[test]
    fn years_outside_range_are_rejected() {
        assert!(check_year(2025).is_ok());
        assert!(check_year(1999).is_err());
    }
}
