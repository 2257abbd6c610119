// src/services/settings_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    models::settings::{PutSettingPayload, SettingType, SettingView},
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    pool: PgPool,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // Valor gravado que não bate com o tipo é logado e sai como texto
    pub async fn list(&self) -> Result<Vec<SettingView>, AppError> {
        let settings = self.repo.list().await?;
        Ok(settings
            .into_iter()
            .map(|setting| {
                let fallback = SettingView {
                    key: setting.key.clone(),
                    value: serde_json::Value::String(setting.value.clone()),
                    value_type: setting.value_type,
                    updated_at: setting.updated_at,
                };
                SettingView::try_from(setting).unwrap_or_else(|_| {
                    tracing::warn!("Configuração '{}' com valor fora do tipo declarado", fallback.key);
                    fallback
                })
            })
            .collect())
    }

    pub async fn get(&self, key: &str) -> Result<SettingView, AppError> {
        self.repo
            .find(&self.pool, key)
            .await?
            .ok_or(AppError::ResourceNotFound("setting"))?
            .try_into()
    }

    /// Sem `valueType` no payload, mantém o tipo já gravado (ou `string` para chave nova).
    pub async fn put(&self, key: &str, payload: &PutSettingPayload) -> Result<SettingView, AppError> {
        let value_type = match payload.value_type {
            Some(value_type) => value_type,
            None => self
                .repo
                .find(&self.pool, key)
                .await?
                .map(|s| s.value_type)
                .unwrap_or(SettingType::String),
        };

        // Rejeita antes de gravar
        value_type.parse(&payload.value)?;

        self.repo
            .upsert(&self.pool, key, value_type.normalize(&payload.value), value_type)
            .await?
            .try_into()
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, key).await? {
            return Err(AppError::ResourceNotFound("setting"));
        }
        Ok(())
    }
}
