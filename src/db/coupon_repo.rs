// src/db/coupon_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_constraint_error, PartialUpdate},
        error::AppError,
    },
    models::coupon::{CouponFilter, CouponStatus, CouponType, CreateCouponPayload, ReferralCoupon, UpdateCouponPayload},
};

const COUPON_COLUMNS: &str =
    "id, code, amount, coupon_type, valid_until, status, usage_count, client_id, created_at";

#[derive(Clone)]
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &CouponFilter) -> Result<Vec<ReferralCoupon>, AppError> {
        let coupons = sqlx::query_as::<_, ReferralCoupon>(&format!(
            r#"
            SELECT {COUPON_COLUMNS}
            FROM referral_coupons
            WHERE ($1::coupon_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR client_id = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.status)
        .bind(filter.client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(coupons)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ReferralCoupon>, AppError> {
        let coupon =
            sqlx::query_as::<_, ReferralCoupon>(&format!("SELECT {COUPON_COLUMNS} FROM referral_coupons WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(coupon)
    }

    /// Códigos são comparados sem diferenciar maiúsculas.
    pub async fn find_by_code<'e, E>(&self, executor: E, code: &str) -> Result<Option<ReferralCoupon>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let coupon = sqlx::query_as::<_, ReferralCoupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM referral_coupons WHERE UPPER(code) = UPPER($1)"
        ))
        .bind(code.trim())
        .fetch_optional(executor)
        .await?;
        Ok(coupon)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateCouponPayload) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO referral_coupons (code, amount, coupon_type, valid_until, status, client_id)
            VALUES (UPPER($1), $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(payload.code.trim())
        .bind(payload.amount)
        .bind(payload.coupon_type.unwrap_or(CouponType::Fixed))
        .bind(payload.valid_until)
        .bind(payload.status.unwrap_or(CouponStatus::Active))
        .bind(payload.client_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "code"))?;

        Ok(id)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: UpdateCouponPayload) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut update = PartialUpdate::new("referral_coupons");
        update
            .set("code", payload.code.map(|c| c.trim().to_uppercase()))
            .set("amount", payload.amount)
            .set("coupon_type", payload.coupon_type)
            .set("valid_until", payload.valid_until)
            .set("status", payload.status)
            .set("client_id", payload.client_id);

        update.execute(executor, "id", id).await.map_err(|e| match e {
            AppError::DatabaseError(db) => map_constraint_error(db, "code"),
            other => other,
        })
    }

    pub async fn increment_usage<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE referral_coupons SET usage_count = usage_count + 1 WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM referral_coupons WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
