// src/services/coupon_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CouponRepository,
    models::coupon::{
        check_value, CouponFilter, CouponQuote, CreateCouponPayload, ReferralCoupon, UpdateCouponPayload,
        ValidateCouponPayload,
    },
};

#[derive(Clone)]
pub struct CouponService {
    repo: CouponRepository,
    pool: PgPool,
}

impl CouponService {
    pub fn new(repo: CouponRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, filter: &CouponFilter) -> Result<Vec<ReferralCoupon>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ReferralCoupon, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::ResourceNotFound("coupon"))
    }

    pub async fn create(&self, payload: &CreateCouponPayload) -> Result<Uuid, AppError> {
        payload.check_value()?;
        self.repo.create(&self.pool, payload).await
    }

    /// Tipo e valor são checados juntos, completando com o que já está gravado.
    pub async fn update(&self, id: Uuid, payload: UpdateCouponPayload) -> Result<(), AppError> {
        if payload.amount.is_some() || payload.coupon_type.is_some() {
            let current = self.get(id).await?;
            check_value(
                payload.coupon_type.unwrap_or(current.coupon_type),
                payload.amount.unwrap_or(current.amount),
            )?;
        }

        if !self.repo.update(&self.pool, id, payload).await? {
            return Err(AppError::ResourceNotFound("coupon"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ResourceNotFound("coupon"));
        }
        Ok(())
    }

    /// Simula o desconto sem contar o uso.
    pub async fn quote(&self, payload: &ValidateCouponPayload) -> Result<CouponQuote, AppError> {
        let coupon = self
            .repo
            .find_by_code(&self.pool, &payload.code)
            .await?
            .ok_or(AppError::ResourceNotFound("coupon"))?;

        let discount = coupon.discount_for(payload.subtotal, Utc::now().date_naive())?;
        Ok(CouponQuote {
            coupon_id: coupon.id,
            discount,
            total: payload.subtotal - discount,
        })
    }
}
