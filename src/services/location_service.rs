// src/services/location_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LocationRepository,
    models::location::{
        City, CreateCityPayload, CreateGovernoratePayload, Governorate, UpdateCityPayload, UpdateGovernoratePayload,
    },
};

fn check_fee(fee: Option<Decimal>) -> Result<(), AppError> {
    if fee.is_some_and(|f| f < Decimal::ZERO) {
        return Err(AppError::BusinessRule("rule.delivery_fee_negative"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct LocationService {
    repo: LocationRepository,
    pool: PgPool,
}

impl LocationService {
    pub fn new(repo: LocationRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // --- GOVERNORATES ---

    pub async fn list_governorates(&self) -> Result<Vec<Governorate>, AppError> {
        self.repo.list_governorates().await
    }

    pub async fn create_governorate(&self, payload: &CreateGovernoratePayload) -> Result<Uuid, AppError> {
        check_fee(payload.delivery_fee)?;
        self.repo.create_governorate(&self.pool, payload).await
    }

    pub async fn update_governorate(&self, id: Uuid, payload: UpdateGovernoratePayload) -> Result<(), AppError> {
        check_fee(payload.delivery_fee)?;
        if !self.repo.update_governorate(&self.pool, id, payload).await? {
            return Err(AppError::ResourceNotFound("governorate"));
        }
        Ok(())
    }

    pub async fn delete_governorate(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_governorate(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("governorate"));
        }
        Ok(())
    }

    // --- CITIES ---

    pub async fn list_cities(&self, governorate_id: Uuid) -> Result<Vec<City>, AppError> {
        self.repo.list_cities(governorate_id).await
    }

    pub async fn create_city(&self, governorate_id: Uuid, payload: &CreateCityPayload) -> Result<Uuid, AppError> {
        self.repo
            .create_city(&self.pool, governorate_id, payload)
            .await
            .map_err(|e| match e {
                // FK da governorate inexistente
                AppError::ForeignKeyViolation(_) => AppError::ResourceNotFound("governorate"),
                other => other,
            })
    }

    pub async fn update_city(&self, id: Uuid, payload: UpdateCityPayload) -> Result<(), AppError> {
        if !self.repo.update_city(&self.pool, id, payload).await? {
            return Err(AppError::ResourceNotFound("city"));
        }
        Ok(())
    }

    pub async fn delete_city(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_city(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("city"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_fixtures::dec;

    fn service(pool: &PgPool) -> LocationService {
        LocationService::new(LocationRepository::new(pool.clone()), pool.clone())
    }

    fn governorate(name: &str, order_num: i32, fee: &str) -> CreateGovernoratePayload {
        CreateGovernoratePayload { name: name.to_string(), order_num: Some(order_num), delivery_fee: Some(dec(fee)) }
    }

    fn city(name: &str) -> CreateCityPayload {
        CreateCityPayload { name: name.to_string(), order_num: None }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn governorates_keep_their_display_order_and_fee(pool: PgPool) {
        let service = service(&pool);
        service.create_governorate(&governorate("Giza", 2, "60")).await.unwrap();
        service.create_governorate(&governorate("Cairo", 1, "50")).await.unwrap();

        let listed = service.list_governorates().await.unwrap();
        let names: Vec<&str> = listed.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Cairo", "Giza"]);
        assert_eq!(listed[0].delivery_fee, dec("50"));

        let err = service.create_governorate(&governorate("Cairo", 3, "10")).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)));

        let err = service.create_governorate(&governorate("Alexandria", 3, "-1")).await.unwrap_err();
        assert_eq!(err.message_key(), "rule.delivery_fee_negative");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cities_live_and_die_with_their_governorate(pool: PgPool) {
        let service = service(&pool);
        let cairo = service.create_governorate(&governorate("Cairo", 1, "50")).await.unwrap();

        let nasr = service.create_city(cairo, &city("Nasr City")).await.unwrap();
        service.create_city(cairo, &city("Maadi")).await.unwrap();

        let names: Vec<String> = service
            .list_cities(cairo)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Maadi", "Nasr City"]);

        let err = service.create_city(cairo, &city("Maadi")).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)));

        let err = service.create_city(Uuid::new_v4(), &city("Dokki")).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound("governorate")));

        service
            .update_city(nasr, UpdateCityPayload { name: Some("Nasr".to_string()), order_num: None })
            .await
            .unwrap();

        service.delete_governorate(cairo).await.unwrap();
        assert!(service.list_cities(cairo).await.unwrap().is_empty());
        assert!(matches!(service.delete_city(nasr).await, Err(AppError::ResourceNotFound("city"))));
    }
}
