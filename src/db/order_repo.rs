// src/db/order_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, PartialUpdate},
        error::AppError,
    },
    models::{
        order::{
            NewOrderItem, OrderFilter, OrderItem, OrderItemType, OrderStatus, OrderSummary, UpdateOrderPayload,
        },
        payment::LockedOrderAmounts,
    },
};

// Colunas do pedido + dados do cliente, na ordem do `OrderSummary`
const SUMMARY_SELECT: &str = r#"
    SELECT
        o.id, o.client_id, o.employee_id, o.coupon_id, o.order_date, o.event_date,
        o.total_amount, o.discount_amount, o.paid_amount, o.status, o.notes,
        o.created_at, o.updated_at,
        c.full_name AS client_name, c.phone AS client_phone
    FROM orders o
    JOIN clients c ON c.id = o.client_id
"#;

/// Dados já validados para o INSERT do pedido.
pub struct NewOrder<'a> {
    pub client_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    pub order_date: Option<NaiveDate>,
    pub event_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: OrderStatus,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURAS
    // =========================================================================

    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderSummary>, AppError> {
        let search = filter.search.as_deref().map(|s| format!("%{}%", s.trim()));

        let orders = sqlx::query_as::<_, OrderSummary>(&format!(
            r#"
            {SUMMARY_SELECT}
            WHERE ($1::order_status IS NULL OR o.status = $1)
              AND ($2::uuid IS NULL OR o.client_id = $2)
              AND ($3::text IS NULL OR c.full_name ILIKE $3 OR c.phone ILIKE $3)
            ORDER BY o.created_at DESC
            "#
        ))
        .bind(filter.status)
        .bind(filter.client_id)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn find_summary(&self, id: Uuid) -> Result<Option<OrderSummary>, AppError> {
        let order = sqlx::query_as::<_, OrderSummary>(&format!("{SUMMARY_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn list_items<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, item_type, service_kind, dress_id, description, price, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY item_type, id
            "#,
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    // =========================================================================
    //  ESCRITAS
    // =========================================================================

    pub async fn create<'e, E>(&self, executor: E, order: &NewOrder<'_>) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO orders (
                client_id, employee_id, coupon_id, order_date, event_date,
                total_amount, discount_amount, paid_amount, status, notes
            )
            VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(order.client_id)
        .bind(order.employee_id)
        .bind(order.coupon_id)
        .bind(order.order_date)
        .bind(order.event_date)
        .bind(order.total_amount)
        .bind(order.discount_amount)
        .bind(order.paid_amount)
        .bind(order.status)
        .bind(order.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "client_id"))?;

        Ok(id)
    }

    pub async fn add_item<'e, E>(&self, executor: E, order_id: Uuid, item: &NewOrderItem) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, item_type, service_kind, dress_id, description, price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order_id)
        .bind(item.item_type)
        .bind(item.service_kind)
        .bind(item.dress_id)
        .bind(item.description.as_deref())
        .bind(item.price)
        .bind(item.quantity())
        .execute(executor)
        .await
        .map_err(|e| map_constraint_error(e, "dress_id"))?;

        Ok(())
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: UpdateOrderPayload) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("orders");
        update
            .set("employee_id", payload.employee_id)
            .set("order_date", payload.order_date)
            .set("event_date", payload.event_date)
            .set("total_amount", payload.total_amount)
            .set("notes", payload.notes)
            .touch();

        update.execute(executor, "id", id).await.map_err(|e| match e {
            AppError::DatabaseError(db) => map_constraint_error(db, "employee_id"),
            other => other,
        })
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: OrderStatus) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tira do estoque os vestidos vendidos (venda ou ateliê) deste pedido.
    pub async fn mark_sold_dresses_unavailable<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sold: Vec<OrderItemType> = OrderItemType::ALL.iter().copied().filter(|t| t.sells_dress()).collect();

        let result = sqlx::query(
            r#"
            UPDATE dresses SET is_available = FALSE, updated_at = NOW()
            WHERE id IN (
                SELECT dress_id FROM order_items
                WHERE order_id = $1
                  AND dress_id IS NOT NULL
                  AND item_type = ANY($2)
            )
            "#,
        )
        .bind(order_id)
        .bind(sold)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_items<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  SALDO (usado pelos pagamentos, sempre dentro de transação)
    // =========================================================================

    pub async fn lock_amounts<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<LockedOrderAmounts>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let amounts = sqlx::query_as::<_, LockedOrderAmounts>(
            "SELECT total_amount, paid_amount FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(amounts)
    }

    pub async fn add_paid<'e, E>(&self, executor: E, id: Uuid, amount: Decimal) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE orders SET paid_amount = paid_amount + $1, updated_at = NOW() WHERE id = $2")
            .bind(amount)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Nunca fica negativo
    pub async fn subtract_paid<'e, E>(&self, executor: E, id: Uuid, amount: Decimal) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE orders SET paid_amount = GREATEST(paid_amount - $1, 0), updated_at = NOW() WHERE id = $2",
        )
        .bind(amount)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }
}
