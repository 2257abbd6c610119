// src/config.rs

use std::{env, ops::RangeInclusive, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::{
        i18n::I18nStore,
        query_cache::{QueryCache, QueryCacheSettings},
    },
    db::{
        AppointmentRepository, ClientRepository, CouponRepository, DressRepository, EmployeeRepository,
        LocationRepository, OrderRepository, PaymentRepository, ReportRepository, SettingsRepository, UserRepository,
    },
    services::{
        appointment_service::AppointmentService, auth::AuthService, client_service::ClientService,
        coupon_service::CouponService, dress_service::DressService, employee_service::EmployeeService,
        location_service::LocationService, order_service::OrderService, payment_service::PaymentService,
        report_service::ReportService, settings_service::SettingsService,
    },
};

// ---
// Configuração (variáveis de ambiente)
// ---

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub token_ttl: chrono::Duration,
    pub query_cache: QueryCacheSettings,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} deve ser definida"));
        let number = |key: &str, default: u64| -> anyhow::Result<u64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} precisa ser um número, recebido '{raw}'")),
                None => Ok(default),
            }
        };
        let bounded = |key: &str, default: u64, range: RangeInclusive<u64>| -> anyhow::Result<u64> {
            let value = number(key, default)?;
            anyhow::ensure!(
                range.contains(&value),
                "{key} precisa estar entre {} e {}, recebido {value}",
                range.start(),
                range.end()
            );
            Ok(value)
        };

        let defaults = QueryCacheSettings::default();
        let query_cache = QueryCacheSettings {
            stale_after: Duration::from_secs(bounded(
                "QUERY_STALE_SECS",
                defaults.stale_after.as_secs(),
                1..=7 * 24 * 60 * 60,
            )?),
            max_capacity: number("QUERY_CACHE_CAPACITY", defaults.max_capacity)?,
            retries: u32::try_from(bounded("QUERY_RETRIES", u64::from(defaults.retries), 0..=10)?)?,
            retry_delay: defaults.retry_delay,
        };

        let ttl_days = i64::try_from(bounded("TOKEN_TTL_DAYS", 7, 1..=365)?)?;
        let token_ttl = chrono::Duration::try_days(ttl_days).context("TOKEN_TTL_DAYS fora do intervalo")?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: u32::try_from(bounded("DB_MAX_CONNECTIONS", 5, 1..=1000)?)?,
            db_acquire_timeout: Duration::from_secs(number("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            token_ttl,
            query_cache,
            admin_email: lookup("ADMIN_EMAIL").filter(|v| !v.trim().is_empty()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|v| !v.trim().is_empty()),
            cors_origin: lookup("CORS_ORIGIN").filter(|v| !v.trim().is_empty()),
        })
    }
}

// ---
// Estado compartilhado
// ---

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub i18n_store: Arc<I18nStore>,
    pub query_cache: QueryCache,

    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub order_service: OrderService,
    pub payment_service: PaymentService,
    pub dress_service: DressService,
    pub appointment_service: AppointmentService,
    pub employee_service: EmployeeService,
    pub location_service: LocationService,
    pub coupon_service: CouponService,
    pub settings_service: SettingsService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, config)
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: Config) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load()?);
        let query_cache = QueryCache::new(&config.query_cache);

        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let dress_repo = DressRepository::new(db_pool.clone());
        let appointment_repo = AppointmentRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let location_repo = LocationRepository::new(db_pool.clone());
        let coupon_repo = CouponRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        // --- Serviços ---
        let auth_service = AuthService::new(
            user_repo,
            config.jwt_secret.clone(),
            config.token_ttl,
            db_pool.clone(),
        );
        let client_service = ClientService::new(client_repo, db_pool.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            payment_repo.clone(),
            coupon_repo.clone(),
            db_pool.clone(),
        );
        let payment_service = PaymentService::new(payment_repo, order_repo, db_pool.clone());
        let dress_service = DressService::new(dress_repo, db_pool.clone());
        let appointment_service = AppointmentService::new(appointment_repo, db_pool.clone());
        let employee_service = EmployeeService::new(employee_repo.clone(), db_pool.clone());
        let location_service = LocationService::new(location_repo, db_pool.clone());
        let coupon_service = CouponService::new(coupon_repo, db_pool.clone());
        let settings_service = SettingsService::new(settings_repo, db_pool.clone());
        let report_service = ReportService::new(report_repo, employee_repo);

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            i18n_store,
            query_cache,
            auth_service,
            client_service,
            order_service,
            payment_service,
            dress_service,
            appointment_service,
            employee_service,
            location_service,
            coupon_service,
            settings_service,
            report_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/atelier"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.token_ttl, chrono::Duration::days(7));
        assert_eq!(config.query_cache.stale_after, Duration::from_secs(300));
        assert_eq!(config.query_cache.retries, 3);
        assert!(config.admin_email.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/atelier")]));
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn numbers_are_parsed_and_validated() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/atelier"),
            ("JWT_SECRET", "secret"),
            ("QUERY_STALE_SECS", "60"),
            ("QUERY_RETRIES", "1"),
        ]))
        .unwrap();
        assert_eq!(config.query_cache.stale_after, Duration::from_secs(60));
        assert_eq!(config.query_cache.retries, 1);

        let broken = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/atelier"),
            ("JWT_SECRET", "secret"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]));
        assert!(broken.is_err());
    }

    #[test]
    fn out_of_range_numbers_are_rejected_instead_of_truncated() {
        let with = |key: &str, value: &str| {
            Config::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/atelier"),
                ("JWT_SECRET", "secret"),
                (key, value),
            ]))
        };

        // 2^32 viraria 0 conexões num cast
        let err = with("DB_MAX_CONNECTIONS", "4294967296").unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
        assert!(with("DB_MAX_CONNECTIONS", "0").is_err());

        // i64::MAX dias não cabe num chrono::Duration
        let err = with("TOKEN_TTL_DAYS", "9223372036854775807").unwrap_err();
        assert!(err.to_string().contains("TOKEN_TTL_DAYS"));
        assert!(with("TOKEN_TTL_DAYS", "0").is_err());
        assert!(with("QUERY_RETRIES", "4294967297").is_err());

        let config = with("TOKEN_TTL_DAYS", "365").unwrap();
        assert_eq!(config.token_ttl, chrono::Duration::days(365));
    }
}
