// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, PartialUpdate},
        error::AppError,
    },
    models::client::{Client, ClientFilter, CreateClientPayload, UpdateClientPayload},
};

const CLIENT_COLUMNS: &str = "id, full_name, phone, email, address, governorate_id, city_id, \
                              client_code, notes, created_at, updated_at";

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mais recentes primeiro. `search` casa com nome, telefone ou código.
    pub async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, AppError> {
        let search = filter.search.as_deref().map(|s| format!("%{}%", s.trim()));

        let clients = sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE ($1::text IS NULL
                   OR full_name ILIKE $1 OR phone ILIKE $1 OR client_code ILIKE $1)
              AND ($2::uuid IS NULL OR governorate_id = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(search)
        .bind(filter.governorate_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateClientPayload) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO clients (
                full_name, phone, email, address, governorate_id, city_id, client_code, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(payload.full_name.trim())
        .bind(payload.phone.trim())
        .bind(payload.email.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.governorate_id)
        .bind(payload.city_id)
        .bind(payload.client_code.as_deref())
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "client_code"))?;

        Ok(id)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: UpdateClientPayload) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("clients");
        update
            .set("full_name", payload.full_name)
            .set("phone", payload.phone)
            .set("email", payload.email)
            .set("address", payload.address)
            .set("governorate_id", payload.governorate_id)
            .set("city_id", payload.city_id)
            .set("client_code", payload.client_code)
            .set("notes", payload.notes)
            .touch();

        update.execute(executor, "id", id).await.map_err(|e| match e {
            AppError::DatabaseError(db) => map_constraint_error(db, "client_code"),
            other => other,
        })
    }

    // Pedidos e agendamentos do cliente bloqueiam (FK); o erro vira 409
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| map_constraint_error(e, "orders"))?;
        Ok(result.rows_affected() > 0)
    }
}
