// src/services/dress_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DressRepository,
    models::dress::{CreateDressPayload, Dress, DressFilter, UpdateDressPayload},
};

#[derive(Clone)]
pub struct DressService {
    repo: DressRepository,
    pool: PgPool,
}

impl DressService {
    pub fn new(repo: DressRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, filter: &DressFilter) -> Result<Vec<Dress>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Dress, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::ResourceNotFound("dress"))
    }

    pub async fn create(&self, payload: &CreateDressPayload) -> Result<Uuid, AppError> {
        payload.check_prices()?;
        self.repo.create(&self.pool, payload).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateDressPayload) -> Result<(), AppError> {
        payload.check_prices()?;
        if !self.repo.update(&self.pool, id, payload).await? {
            return Err(AppError::ResourceNotFound("dress"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("dress"));
        }
        Ok(())
    }
}
