// src/db/location_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, PartialUpdate},
        error::AppError,
    },
    models::location::{
        City, CreateCityPayload, CreateGovernoratePayload, Governorate, UpdateCityPayload, UpdateGovernoratePayload,
    },
};

#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  GOVERNORATES
    // =========================================================================

    pub async fn list_governorates(&self) -> Result<Vec<Governorate>, AppError> {
        let governorates = sqlx::query_as::<_, Governorate>(
            "SELECT id, name, order_num, delivery_fee FROM governorates ORDER BY order_num, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(governorates)
    }

    pub async fn create_governorate<'e, E>(
        &self,
        executor: E,
        payload: &CreateGovernoratePayload,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO governorates (name, order_num, delivery_fee)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.order_num.unwrap_or(0))
        .bind(payload.delivery_fee.unwrap_or(Decimal::ZERO))
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "name"))?;

        Ok(id)
    }

    pub async fn update_governorate<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: UpdateGovernoratePayload,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("governorates");
        update
            .set("name", payload.name)
            .set("order_num", payload.order_num)
            .set("delivery_fee", payload.delivery_fee);

        update.execute(executor, "id", id).await.map_err(|e| match e {
            AppError::DatabaseError(db) => map_constraint_error(db, "name"),
            other => other,
        })
    }

    // As cidades caem junto (CASCADE); clientes que apontam para elas bloqueiam
    pub async fn delete_governorate<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM governorates WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "clients"))?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  CITIES
    // =========================================================================

    pub async fn list_cities(&self, governorate_id: Uuid) -> Result<Vec<City>, AppError> {
        let cities = sqlx::query_as::<_, City>(
            r#"
            SELECT id, governorate_id, name, order_num
            FROM cities
            WHERE governorate_id = $1
            ORDER BY order_num, name
            "#,
        )
        .bind(governorate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cities)
    }

    pub async fn create_city<'e, E>(
        &self,
        executor: E,
        governorate_id: Uuid,
        payload: &CreateCityPayload,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO cities (governorate_id, name, order_num)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(governorate_id)
        .bind(payload.name.trim())
        .bind(payload.order_num.unwrap_or(0))
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "name"))?;

        Ok(id)
    }

    pub async fn update_city<'e, E>(&self, executor: E, id: Uuid, payload: UpdateCityPayload) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("cities");
        update.set("name", payload.name).set("order_num", payload.order_num);

        update.execute(executor, "id", id).await.map_err(|e| match e {
            AppError::DatabaseError(db) => map_constraint_error(db, "name"),
            other => other,
        })
    }

    pub async fn delete_city<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "clients"))?;
        Ok(result.rows_affected() > 0)
    }
}
