// src/db/payment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::payment::{CreatePaymentPayload, Payment, PaymentFilter, PaymentMethod, PaymentView, PendingPayment},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &PaymentFilter) -> Result<Vec<PaymentView>, AppError> {
        let payments = sqlx::query_as::<_, PaymentView>(
            r#"
            SELECT
                p.id, p.order_id, p.amount, p.payment_date, p.payment_method, p.notes, p.created_at,
                o.client_id, c.full_name AS client_name
            FROM payments p
            JOIN orders o ON o.id = p.order_id
            JOIN clients c ON c.id = o.client_id
            WHERE ($1::uuid IS NULL OR p.order_id = $1)
              AND ($2::payment_method IS NULL OR p.payment_method = $2)
              AND ($3::date IS NULL OR p.payment_date >= $3)
              AND ($4::date IS NULL OR p.payment_date <= $4)
            ORDER BY p.payment_date DESC, p.created_at DESC
            "#,
        )
        .bind(filter.order_id)
        .bind(filter.method)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn list_by_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, order_id, amount, payment_date, payment_method, notes, created_at
            FROM payments
            WHERE order_id = $1
            ORDER BY payment_date, created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    /// Pedidos não cancelados com saldo positivo, do evento mais próximo para o mais distante.
    pub async fn list_pending(&self) -> Result<Vec<PendingPayment>, AppError> {
        let pending = sqlx::query_as::<_, PendingPayment>(
            r#"
            SELECT
                o.id AS order_id, o.client_id,
                c.full_name AS client_name, c.phone AS client_phone,
                o.event_date, o.total_amount, o.paid_amount,
                o.total_amount - o.paid_amount AS remaining_amount
            FROM orders o
            JOIN clients c ON c.id = o.client_id
            WHERE o.status <> 'cancelled'
              AND o.total_amount - o.paid_amount > 0
            ORDER BY o.event_date ASC NULLS LAST, o.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(pending)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreatePaymentPayload) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO payments (order_id, amount, payment_date, payment_method, notes)
            VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4, $5)
            RETURNING id
            "#,
        )
        .bind(payload.order_id)
        .bind(payload.amount)
        .bind(payload.payment_date)
        .bind(payload.payment_method.unwrap_or(PaymentMethod::Cash))
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "order_id"))?;

        Ok(id)
    }

    /// Apaga e devolve o pagamento removido (para ajustar o saldo do pedido).
    pub async fn delete_returning<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            DELETE FROM payments WHERE id = $1
            RETURNING id, order_id, amount, payment_date, payment_method, notes, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(payment)
    }

    pub async fn delete_by_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM payments WHERE order_id = $1")
            .bind(order_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
