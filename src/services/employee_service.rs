// src/services/employee_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EmployeeRepository,
    models::employee::{CreateEmployeePayload, Employee, EmployeeFilter, UpdateEmployeePayload},
};

#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(repo: EmployeeRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Employee, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ResourceNotFound("employee"))
    }

    pub async fn create(&self, payload: &CreateEmployeePayload) -> Result<Uuid, AppError> {
        payload.check_rates()?;
        self.repo.create(&self.pool, payload).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateEmployeePayload) -> Result<(), AppError> {
        payload.check_rates()?;
        if !self.repo.update(&self.pool, id, payload).await? {
            return Err(AppError::ResourceNotFound("employee"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("employee"));
        }
        Ok(())
    }
}
