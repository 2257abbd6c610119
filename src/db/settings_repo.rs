// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::settings::{SettingType, SystemSetting},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<SystemSetting>, AppError> {
        let settings = sqlx::query_as::<_, SystemSetting>(
            "SELECT key, value, value_type, updated_at FROM system_settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(settings)
    }

    pub async fn find<'e, E>(&self, executor: E, key: &str) -> Result<Option<SystemSetting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let setting = sqlx::query_as::<_, SystemSetting>(
            "SELECT key, value, value_type, updated_at FROM system_settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(executor)
        .await?;
        Ok(setting)
    }

    // UPSERT: a chave é a identidade
    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        key: &str,
        value: &str,
        value_type: SettingType,
    ) -> Result<SystemSetting, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let setting = sqlx::query_as::<_, SystemSetting>(
            r#"
            INSERT INTO system_settings (key, value, value_type, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                value_type = EXCLUDED.value_type,
                updated_at = NOW()
            RETURNING key, value, value_type, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(value_type)
        .fetch_one(executor)
        .await?;
        Ok(setting)
    }

    pub async fn delete<'e, E>(&self, executor: E, key: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM system_settings WHERE key = $1")
            .bind(key)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
