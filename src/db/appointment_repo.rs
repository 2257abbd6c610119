// src/db/appointment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, PartialUpdate},
        error::AppError,
    },
    models::appointment::{
        AppointmentFilter, AppointmentStatus, AppointmentView, CreateAppointmentPayload, UpdateAppointmentPayload,
    },
};

const VIEW_SELECT: &str = r#"
    SELECT
        a.id, a.client_id, a.date, a.appointment_type, a.status, a.notes, a.created_at,
        c.full_name AS client_name, c.phone AS client_phone
    FROM appointments a
    JOIN clients c ON c.id = a.client_id
"#;

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ordem cronológica. `from`/`to` filtram pelo dia (inclusivo).
    pub async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<AppointmentView>, AppError> {
        let appointments = sqlx::query_as::<_, AppointmentView>(&format!(
            r#"
            {VIEW_SELECT}
            WHERE ($1::date IS NULL OR a.date::date >= $1)
              AND ($2::date IS NULL OR a.date::date <= $2)
              AND ($3::appointment_status IS NULL OR a.status = $3)
              AND ($4::uuid IS NULL OR a.client_id = $4)
            ORDER BY a.date ASC
            "#
        ))
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.status)
        .bind(filter.client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AppointmentView>, AppError> {
        let appointment = sqlx::query_as::<_, AppointmentView>(&format!("{VIEW_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(appointment)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateAppointmentPayload) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO appointments (client_id, date, appointment_type, status, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(payload.client_id)
        .bind(payload.date)
        .bind(payload.appointment_type.as_deref())
        .bind(payload.status.unwrap_or(AppointmentStatus::Scheduled))
        .bind(payload.notes.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "client_id"))?;

        Ok(id)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: UpdateAppointmentPayload,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("appointments");
        update
            .set("client_id", payload.client_id)
            .set("date", payload.date)
            .set("appointment_type", payload.appointment_type)
            .set("status", payload.status)
            .set("notes", payload.notes);

        update.execute(executor, "id", id).await.map_err(|e| match e {
            AppError::DatabaseError(db) => map_constraint_error(db, "client_id"),
            other => other,
        })
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
