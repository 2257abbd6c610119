// src/db/dress_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, PartialUpdate},
        error::AppError,
    },
    models::dress::{CreateDressPayload, Dress, DressFilter, UpdateDressPayload},
};

const DRESS_COLUMNS: &str = "id, name, category, size, color, rental_price, sale_price, is_available, \
                             condition, notes, created_at, updated_at";

#[derive(Clone)]
pub struct DressRepository {
    pool: PgPool,
}

impl DressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &DressFilter) -> Result<Vec<Dress>, AppError> {
        let search = filter.search.as_deref().map(|s| format!("%{}%", s.trim()));

        let dresses = sqlx::query_as::<_, Dress>(&format!(
            r#"
            SELECT {DRESS_COLUMNS}
            FROM dresses
            WHERE ($1::boolean IS NULL OR is_available = $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR color ILIKE $3)
            ORDER BY name ASC
            "#
        ))
        .bind(filter.available)
        .bind(filter.category.as_deref())
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(dresses)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Dress>, AppError> {
        let dress = sqlx::query_as::<_, Dress>(&format!("SELECT {DRESS_COLUMNS} FROM dresses WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(dress)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateDressPayload) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO dresses (
                name, category, size, color, rental_price, sale_price, is_available, condition, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, TRUE), $8, $9)
            RETURNING id
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.category.as_deref())
        .bind(payload.size.as_deref())
        .bind(payload.color.as_deref())
        .bind(payload.rental_price)
        .bind(payload.sale_price)
        .bind(payload.is_available)
        .bind(payload.condition.as_deref())
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: UpdateDressPayload) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("dresses");
        update
            .set("name", payload.name)
            .set("category", payload.category)
            .set("size", payload.size)
            .set("color", payload.color)
            .set("rental_price", payload.rental_price)
            .set("sale_price", payload.sale_price)
            .set("is_available", payload.is_available)
            .set("condition", payload.condition)
            .set("notes", payload.notes)
            .touch();

        update.execute(executor, "id", id).await
    }

    // Vestido citado em algum item de pedido não pode sumir
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM dresses WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "order_items"))?;
        Ok(result.rows_affected() > 0)
    }
}
