// src/common/query_cache.rs

use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use moka::future::Cache;
use serde::Serialize;
use serde_json::Value;

use crate::common::error::AppError;

/// Entidades cujas leituras passam pelo cache. Mutações invalidam por entidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEntity {
    Clients,
    Orders,
    Payments,
    Dresses,
    Appointments,
    Employees,
    Locations,
    Coupons,
    Settings,
    Reports,
}

impl CacheEntity {
    const COUNT: usize = CacheEntity::Reports as usize + 1;

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub entity: CacheEntity,
    pub params: String,
}

impl QueryKey {
    pub fn new(entity: CacheEntity, params: impl Into<String>) -> Self {
        Self { entity, params: params.into() }
    }

    /// Usa o filtro serializado como parte da chave.
    pub fn with_filter<F: Serialize>(entity: CacheEntity, filter: &F) -> Self {
        let params = serde_json::to_string(filter).unwrap_or_default();
        Self { entity, params }
    }
}

#[derive(Debug, Clone)]
pub struct QueryCacheSettings {
    pub stale_after: Duration,
    pub max_capacity: u64,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for QueryCacheSettings {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(5 * 60),
            max_capacity: 10_000,
            retries: 3,
            retry_delay: Duration::from_millis(200),
        }
    }
}

/// Cache das leituras: resultados frescos por `stale_after`, buscas concorrentes
/// pela mesma chave viram uma só, e falhas de conexão são re-tentadas.
/// Erros nunca ficam no cache.
///
/// Cada entidade tem uma geração, incrementada a cada invalidação. Um resultado
/// carregado numa geração anterior é descartado e buscado de novo.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<QueryKey, Arc<CachedRead>>,
    generations: Arc<[AtomicU64; CacheEntity::COUNT]>,
    retries: u32,
    retry_delay: Duration,
}

struct CachedRead {
    generation: u64,
    value: Value,
}

// Releituras quando a entidade é invalidada durante a busca
const STALE_RELOADS: u32 = 2;

impl QueryCache {
    pub fn new(settings: &QueryCacheSettings) -> Self {
        let inner = Cache::builder()
            .max_capacity(settings.max_capacity)
            .time_to_live(settings.stale_after)
            .support_invalidation_closures()
            .build();

        Self {
            inner,
            generations: Arc::new(std::array::from_fn(|_| AtomicU64::new(0))),
            retries: settings.retries,
            retry_delay: settings.retry_delay,
        }
    }

    fn generation(&self, entity: CacheEntity) -> u64 {
        self.generations[entity.index()].load(Ordering::Acquire)
    }

    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Value, AppError>
    where
        T: Serialize,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let entity = key.entity;
        let mut reloads = 0;

        loop {
            let read = self.inner.try_get_with(key.clone(), self.load(entity, &fetcher)).await?;
            if read.generation == self.generation(entity) {
                return Ok(read.value.clone());
            }

            // Carregado antes de uma invalidação: não pode continuar no cache
            self.inner.invalidate(&key).await;
            if reloads == STALE_RELOADS {
                tracing::warn!("{:?} invalidado repetidamente durante a leitura", entity);
                return Ok(read.value.clone());
            }
            reloads += 1;
        }
    }

    async fn load<T, F, Fut>(&self, entity: CacheEntity, fetcher: &F) -> Result<Arc<CachedRead>, AppError>
    where
        T: Serialize,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        // Lida antes da consulta: uma invalidação no meio do caminho torna o resultado velho
        let generation = self.generation(entity);
        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(data) => {
                    let value = serde_json::to_value(data).map_err(|e| AppError::InternalServerError(e.into()))?;
                    return Ok(Arc::new(CachedRead { generation, value }));
                }
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Falha ao buscar {:?} (tentativa {}/{}): {}",
                        entity,
                        attempt,
                        self.retries,
                        err
                    );
                    tokio::time::sleep(self.retry_delay * attempt).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Descarta todas as entradas das entidades informadas.
    pub fn invalidate(&self, entities: &[CacheEntity]) {
        for entity in entities {
            self.generations[entity.index()].fetch_add(1, Ordering::AcqRel);
        }

        let entities = entities.to_vec();
        if let Err(e) = self
            .inner
            .invalidate_entries_if(move |key, _| entities.contains(&key.entity))
        {
            // Sem suporte a predicados só resta limpar tudo
            tracing::warn!("Invalidação seletiva falhou ({}), limpando o cache inteiro", e);
            self.inner.invalidate_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache(stale_after: Duration) -> QueryCache {
        QueryCache::new(&QueryCacheSettings {
            stale_after,
            max_capacity: 100,
            retries: 2,
            retry_delay: Duration::from_millis(1),
        })
    }

    #[tokio::test]
    async fn serves_fresh_results_from_cache() {
        let cache = cache(Duration::from_secs(60));
        let calls = &AtomicUsize::new(0);
        let key = QueryKey::new(CacheEntity::Clients, "all");

        for _ in 0..3 {
            let value = cache
                .fetch(key.clone(), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AppError>(vec!["Sara Ahmed"])
                })
                .await
                .unwrap();
            assert_eq!(value, serde_json::json!(["Sara Ahmed"]));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_identical_reads_share_one_fetch() {
        let cache = cache(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new(CacheEntity::Orders, "pending");

        let fetch = || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, AppError>(42)
            }
        };

        let (a, b) = tokio::join!(cache.fetch(key.clone(), fetch), cache.fetch(key.clone(), fetch));

        assert_eq!(a.unwrap(), serde_json::json!(42));
        assert_eq!(b.unwrap(), serde_json::json!(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_entries_are_refetched() {
        let cache = cache(Duration::from_millis(30));
        let calls = &AtomicUsize::new(0);
        let key = QueryKey::new(CacheEntity::Dresses, "all");
        let fetch = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(true)
        };

        cache.fetch(key.clone(), fetch).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        cache.fetch(key.clone(), fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_a_new_fetch_for_that_entity_only() {
        let cache = cache(Duration::from_secs(60));
        let order_calls = &AtomicUsize::new(0);
        let client_calls = &AtomicUsize::new(0);
        let orders = QueryKey::new(CacheEntity::Orders, "all");
        let clients = QueryKey::new(CacheEntity::Clients, "all");
        let fetch_orders = || async move {
            order_calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(1)
        };
        let fetch_clients = || async move {
            client_calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(2)
        };

        cache.fetch(orders.clone(), fetch_orders).await.unwrap();
        cache.fetch(clients.clone(), fetch_clients).await.unwrap();

        cache.invalidate(&[CacheEntity::Orders]);

        cache.fetch(orders, fetch_orders).await.unwrap();
        cache.fetch(clients, fetch_clients).await.unwrap();

        assert_eq!(order_calls.load(Ordering::SeqCst), 2);
        assert_eq!(client_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reads_in_flight_during_invalidation_are_not_kept() {
        let cache = cache(Duration::from_secs(60));
        let version = Arc::new(AtomicUsize::new(1));
        let key = QueryKey::new(CacheEntity::Orders, "all");

        let slow_read = {
            let cache = cache.clone();
            let version = version.clone();
            let key = key.clone();
            tokio::spawn(async move {
                let version = &*version;
                cache
                    .fetch(key, || async move {
                        let seen = version.load(Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok::<_, AppError>(seen)
                    })
                    .await
            })
        };

        // Pagamento gravado enquanto a listagem ainda está no banco
        tokio::time::sleep(Duration::from_millis(20)).await;
        version.store(2, Ordering::SeqCst);
        cache.invalidate(&[CacheEntity::Orders]);

        assert_eq!(slow_read.await.unwrap().unwrap(), serde_json::json!(2));

        let version = &*version;
        let next = cache
            .fetch(key, || async move { Ok::<_, AppError>(version.load(Ordering::SeqCst)) })
            .await
            .unwrap();
        assert_eq!(next, serde_json::json!(2));
    }

    #[tokio::test]
    async fn connection_failures_are_retried_up_to_the_limit() {
        let cache = cache(Duration::from_secs(60));
        let calls = &AtomicUsize::new(0);

        let value = cache
            .fetch(QueryKey::new(CacheEntity::Payments, "all"), || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
                } else {
                    Ok(vec![1, 2, 3])
                }
            })
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!([1, 2, 3]));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = cache(Duration::from_secs(60));
        let calls = &AtomicUsize::new(0);
        let key = QueryKey::new(CacheEntity::Reports, "summary");

        let result = cache
            .fetch(key.clone(), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
            })
            .await;
        assert!(result.is_err());
        // 1 tentativa + 2 re-tentativas
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let value = cache
            .fetch(key, || async move { Ok::<_, AppError>(7) })
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!(7));
    }

    #[tokio::test]
    async fn query_errors_fail_without_retry() {
        let cache = cache(Duration::from_secs(60));
        let calls = &AtomicUsize::new(0);

        let result = cache
            .fetch(QueryKey::new(CacheEntity::Settings, "all"), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(AppError::DatabaseError(sqlx::Error::RowNotFound))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
