// src/db/employee_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, PartialUpdate},
        error::AppError,
    },
    models::employee::{CommissionLine, CreateEmployeePayload, Employee, EmployeeFilter, UpdateEmployeePayload},
};

const EMPLOYEE_COLUMNS: &str = "id, name, role, phone, service_commission, rental_commission, \
                                sale_commission, atelier_commission, active, created_at";

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}
            FROM employees
            WHERE ($1::boolean IS NULL OR active = $1)
            ORDER BY name ASC
            "#
        ))
        .bind(filter.active)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateEmployeePayload) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO employees (
                name, role, phone,
                service_commission, rental_commission, sale_commission, atelier_commission, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, TRUE))
            RETURNING id
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.role.trim())
        .bind(payload.phone.trim())
        .bind(payload.service_commission.unwrap_or(Decimal::ZERO))
        .bind(payload.rental_commission.unwrap_or(Decimal::ZERO))
        .bind(payload.sale_commission.unwrap_or(Decimal::ZERO))
        .bind(payload.atelier_commission.unwrap_or(Decimal::ZERO))
        .bind(payload.active)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: UpdateEmployeePayload) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("employees");
        update
            .set("name", payload.name)
            .set("role", payload.role)
            .set("phone", payload.phone)
            .set("service_commission", payload.service_commission)
            .set("rental_commission", payload.rental_commission)
            .set("sale_commission", payload.sale_commission)
            .set("atelier_commission", payload.atelier_commission)
            .set("active", payload.active);

        update.execute(executor, "id", id).await
    }

    // Pedidos antigos ficam sem funcionário (ON DELETE SET NULL)
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "orders"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Itens de pedidos não cancelados com funcionário, no intervalo de datas do pedido.
    pub async fn commission_lines(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<CommissionLine>, AppError> {
        let lines = sqlx::query_as::<_, CommissionLine>(
            r#"
            SELECT o.employee_id, i.item_type, i.price, i.quantity
            FROM order_items i
            JOIN orders o ON o.id = i.order_id
            WHERE o.employee_id IS NOT NULL
              AND o.status <> 'cancelled'
              AND o.order_date BETWEEN $1 AND $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}
