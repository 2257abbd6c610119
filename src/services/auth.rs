// src/services/auth.rs

use std::time::Duration;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use moka::sync::Cache;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    // jti dos tokens encerrados via logout, até expirarem
    revoked: Cache<Uuid, ()>,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl: chrono::Duration, pool: PgPool) -> Self {
        // Duração negativa só aparece em teste; o cache exige algo positivo
        let revoked_ttl = token_ttl.to_std().unwrap_or_default().max(Duration::from_secs(1));
        let revoked = Cache::builder().time_to_live(revoked_ttl).build();

        Self { user_repo, jwt_secret, token_ttl, revoked, pool }
    }

    pub async fn register_user(&self, email: &str, password: &str, full_name: Option<&str>) -> Result<String, AppError> {
        let hashed_password = hash_password(password).await?;

        let new_user = self
            .user_repo
            .create_user(&self.pool, &normalize_email(email), &hashed_password, full_name)
            .await?;

        tracing::info!("Novo usuário registrado: {}", new_user.id);
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    /// Valida assinatura, expiração e revogação; devolve o usuário e os claims.
    pub async fn validate_token(&self, token: &str) -> Result<(User, Claims), AppError> {
        let claims = decode_claims(token, &self.jwt_secret)?;

        if self.revoked.contains_key(&claims.jti) {
            return Err(AppError::InvalidToken);
        }

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok((user, claims))
    }

    pub fn revoke(&self, claims: &Claims) {
        self.revoked.insert(claims.jti, ());
    }

    /// Cria o admin inicial se o e-mail ainda não existir.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Ok(());
        }

        let hashed_password = hash_password(password).await?;
        match self
            .user_repo
            .create_user(&self.pool, &email, &hashed_password, Some("Admin"))
            .await
        {
            Ok(user) => {
                tracing::info!("👤 Usuário admin criado: {}", user.email);
                Ok(())
            }
            // Outra instância criou ao mesmo tempo
            Err(AppError::EmailAlreadyExists) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        issue_token(user_id, &self.jwt_secret, self.token_ttl)
    }
}

/// E-mails são gravados e comparados sem espaços e em minúsculas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

fn issue_token(user_id: Uuid, secret: &str, ttl: chrono::Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4(),
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_tokens_decode_with_same_secret() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET, chrono::Duration::days(7)).unwrap();

        let claims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, chrono::Duration::days(7)).unwrap();
        assert!(matches!(decode_claims(&token, "other-secret"), Err(AppError::InvalidToken)));
        assert!(matches!(decode_claims("not.a.jwt", SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn emails_are_compared_case_insensitively() {
        assert_eq!(normalize_email("  Admin@Atelier.COM "), "admin@atelier.com");
        assert_eq!(normalize_email("admin@atelier.com"), normalize_email("ADMIN@atelier.com"));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, chrono::Duration::hours(-1)).unwrap();
        assert!(matches!(decode_claims(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn each_token_gets_its_own_id() {
        let user_id = Uuid::new_v4();
        let a = decode_claims(&issue_token(user_id, SECRET, chrono::Duration::days(1)).unwrap(), SECRET).unwrap();
        let b = decode_claims(&issue_token(user_id, SECRET, chrono::Duration::days(1)).unwrap(), SECRET).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[tokio::test]
    async fn revoked_tokens_fail_validation() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/atelier_test")
            .unwrap();
        let service = AuthService::new(
            UserRepository::new(pool.clone()),
            SECRET.into(),
            chrono::Duration::days(7),
            pool,
        );

        let token = issue_token(Uuid::new_v4(), SECRET, chrono::Duration::days(1)).unwrap();
        let claims = decode_claims(&token, SECRET).unwrap();
        service.revoke(&claims);

        // Rejeitado antes de qualquer consulta ao banco
        assert!(matches!(service.validate_token(&token).await, Err(AppError::InvalidToken)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn login_and_registration_ignore_email_case(pool: PgPool) {
        let service = AuthService::new(
            UserRepository::new(pool.clone()),
            SECRET.into(),
            chrono::Duration::days(7),
            pool,
        );

        service.register_user("Noor@Atelier.com", "segredo123", None).await.unwrap();

        let token = service.login_user(" noor@atelier.COM", "segredo123").await.unwrap();
        let (user, _) = service.validate_token(&token).await.unwrap();
        assert_eq!(user.email, "noor@atelier.com");

        assert!(matches!(
            service.register_user("NOOR@atelier.com", "outra-senha", None).await,
            Err(AppError::EmailAlreadyExists)
        ));

        // Admin com o mesmo e-mail em outra caixa não duplica a conta
        service.ensure_admin("NOOR@ATELIER.COM", "admin-senha").await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&service.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
