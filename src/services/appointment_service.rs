// src/services/appointment_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AppointmentRepository,
    models::appointment::{AppointmentFilter, AppointmentView, CreateAppointmentPayload, UpdateAppointmentPayload},
};

#[derive(Clone)]
pub struct AppointmentService {
    repo: AppointmentRepository,
    pool: PgPool,
}

impl AppointmentService {
    pub fn new(repo: AppointmentRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<AppointmentView>, AppError> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(AppError::BusinessRule("rule.invalid_date_range"));
            }
        }
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<AppointmentView, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ResourceNotFound("appointment"))
    }

    pub async fn create(&self, payload: &CreateAppointmentPayload) -> Result<Uuid, AppError> {
        self.repo.create(&self.pool, payload).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateAppointmentPayload) -> Result<(), AppError> {
        if !self.repo.update(&self.pool, id, payload).await? {
            return Err(AppError::ResourceNotFound("appointment"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("appointment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::{common::test_fixtures, models::appointment::AppointmentStatus};

    fn service(pool: &PgPool) -> AppointmentService {
        AppointmentService::new(AppointmentRepository::new(pool.clone()), pool.clone())
    }

    fn fitting(client_id: Uuid, day: u32, hour: u32) -> CreateAppointmentPayload {
        CreateAppointmentPayload {
            client_id,
            date: Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap(),
            appointment_type: Some("fitting".to_string()),
            status: None,
            notes: None,
        }
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 6, d)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn appointments_are_listed_by_day_in_order(pool: PgPool) {
        let service = service(&pool);
        let client_id = test_fixtures::client(&pool, "Sara Ahmed").await;

        let late = service.create(&fitting(client_id, 10, 16)).await.unwrap();
        let early = service.create(&fitting(client_id, 10, 9)).await.unwrap();
        service.create(&fitting(client_id, 20, 11)).await.unwrap();

        let filter = AppointmentFilter { from: day(10), to: day(10), ..Default::default() };
        let listed = service.list(&filter).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|a| a.appointment.id).collect();
        assert_eq!(ids, vec![early, late]);
        assert_eq!(listed[0].client_name, "Sara Ahmed");
        assert_eq!(listed[0].appointment.status, AppointmentStatus::Scheduled);

        assert_eq!(service.list(&AppointmentFilter::default()).await.unwrap().len(), 3);

        let backwards = AppointmentFilter { from: day(20), to: day(10), ..Default::default() };
        assert_eq!(
            service.list(&backwards).await.unwrap_err().message_key(),
            "rule.invalid_date_range"
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn appointments_can_be_rescheduled_and_removed(pool: PgPool) {
        let service = service(&pool);
        let client_id = test_fixtures::client(&pool, "Huda Salem").await;
        let id = service.create(&fitting(client_id, 12, 14)).await.unwrap();

        let update = UpdateAppointmentPayload {
            status: Some(AppointmentStatus::Completed),
            ..Default::default()
        };
        service.update(id, update).await.unwrap();
        assert_eq!(service.get(id).await.unwrap().appointment.status, AppointmentStatus::Completed);

        service.delete(id).await.unwrap();
        assert!(matches!(service.get(id).await, Err(AppError::ResourceNotFound("appointment"))));
        assert!(matches!(service.delete(id).await, Err(AppError::ResourceNotFound("appointment"))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn appointments_need_an_existing_client(pool: PgPool) {
        let err = service(&pool).create(&fitting(Uuid::new_v4(), 12, 14)).await.unwrap_err();
        assert!(matches!(err, AppError::ForeignKeyViolation(_)));
    }
}
