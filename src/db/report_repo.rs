// src/db/report_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::report::{DashboardSummary, MonthComparison, MonthlyRevenue, PaymentMethodBreakdown},
};

// Somente leitura: agregações para o dashboard e relatórios
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Uma única ida ao banco para todos os cards do topo.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, AppError> {
        let summary = sqlx::query_as::<_, DashboardSummary>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM clients) AS total_clients,

                (SELECT COUNT(*) FROM orders
                  WHERE date_trunc('month', order_date) = date_trunc('month', CURRENT_DATE)
                ) AS orders_this_month,

                (SELECT COALESCE(SUM(amount), 0) FROM payments
                  WHERE date_trunc('month', payment_date) = date_trunc('month', CURRENT_DATE)
                ) AS revenue_this_month,

                (SELECT COUNT(*) FROM orders
                  WHERE status <> 'cancelled' AND total_amount - paid_amount > 0
                ) AS pending_payments,

                (SELECT COALESCE(SUM(total_amount - paid_amount), 0) FROM orders
                  WHERE status <> 'cancelled' AND total_amount - paid_amount > 0
                ) AS outstanding_amount,

                (SELECT COUNT(*) FROM appointments
                  WHERE date::date = CURRENT_DATE AND status = 'scheduled'
                ) AS appointments_today,

                (SELECT COUNT(*) FROM dresses WHERE is_available) AS available_dresses
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn monthly_revenue(&self, year: i32) -> Result<Vec<MonthlyRevenue>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyRevenue>("SELECT month, total FROM monthly_revenue($1)")
            .bind(year)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethodBreakdown>, AppError> {
        let rows = sqlx::query_as::<_, PaymentMethodBreakdown>(
            r#"
            SELECT payment_method, COUNT(*) AS count, COALESCE(SUM(amount), 0) AS total
            FROM payments
            GROUP BY payment_method
            ORDER BY total DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Mês corrente contra o anterior (receita, pedidos e clientes novos).
    pub async fn month_comparison(&self) -> Result<MonthComparison, AppError> {
        let comparison = sqlx::query_as::<_, MonthComparison>(
            r#"
            WITH bounds AS (
                SELECT date_trunc('month', CURRENT_DATE)::date AS cur,
                       (date_trunc('month', CURRENT_DATE) - INTERVAL '1 month')::date AS prev
            )
            SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM payments, bounds
                  WHERE payment_date >= cur AND payment_date < (cur + INTERVAL '1 month')::date
                ) AS current_revenue,
                (SELECT COALESCE(SUM(amount), 0) FROM payments, bounds
                  WHERE payment_date >= prev AND payment_date < cur
                ) AS previous_revenue,
                (SELECT COUNT(*) FROM orders, bounds
                  WHERE order_date >= cur AND order_date < (cur + INTERVAL '1 month')::date
                ) AS current_orders,
                (SELECT COUNT(*) FROM orders, bounds
                  WHERE order_date >= prev AND order_date < cur
                ) AS previous_orders,
                (SELECT COUNT(*) FROM clients, bounds
                  WHERE created_at::date >= cur AND created_at::date < (cur + INTERVAL '1 month')::date
                ) AS current_clients,
                (SELECT COUNT(*) FROM clients, bounds
                  WHERE created_at::date >= prev AND created_at::date < cur
                ) AS previous_clients
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(comparison)
    }
}
