// src/services/client_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ClientRepository,
    models::client::{Client, ClientFilter, CreateClientPayload, UpdateClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    pool: PgPool,
}

impl ClientService {
    pub fn new(repo: ClientRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ResourceNotFound("client"))
    }

    pub async fn create(&self, payload: &CreateClientPayload) -> Result<Uuid, AppError> {
        let id = self.repo.create(&self.pool, payload).await?;
        tracing::info!("Cliente criado: {}", id);
        Ok(id)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateClientPayload) -> Result<(), AppError> {
        if !self.repo.update(&self.pool, id, payload).await? {
            return Err(AppError::ResourceNotFound("client"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("client"));
        }
        Ok(())
    }
}
