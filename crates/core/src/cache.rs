//! Page-scoped banner list cache.
//!
//! The cache stores fully-resolved banner lists keyed by page, under a
//! single namespace so one prefix delete clears every entry. Production
//! uses Redis; tests and single-process deployments use the in-memory
//! implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::Expiration;
use futures::StreamExt;
use tracing::debug;

use crate::page::PageRef;

/// Namespace for every banner cache key.
pub const CACHE_NAMESPACE: &str = "banners";

/// Number of keys fetched per SCAN page during prefix deletion.
const SCAN_PAGE_SIZE: u32 = 100;

/// Cache key for the resolved banner list of a page.
#[must_use]
pub fn active_page_key(page: PageRef) -> String {
    format!("{CACHE_NAMESPACE}:active:{page}")
}

/// Prefix covering every page-scoped entry.
#[must_use]
pub fn namespace_prefix() -> String {
    format!("{CACHE_NAMESPACE}:")
}

/// Cache error type.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Redis operation failed.
    #[error("Redis error: {0}")]
    Redis(String),

    /// Cache value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<CacheError> for marquee_common::AppError {
    fn from(err: CacheError) -> Self {
        Self::Cache(err.to_string())
    }
}

/// Key/value cache with TTL and prefix-based bulk invalidation.
#[async_trait]
pub trait BannerCache: Send + Sync {
    /// Get a cached value.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value with a TTL in seconds.
    async fn set(&self, key: &str, value: &str, ttl_secs: i64) -> Result<(), CacheError>;

    /// Delete every key starting with `prefix`; returns how many were removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
}

/// Redis-backed cache.
#[derive(Clone)]
pub struct RedisCache {
    redis: Arc<RedisClient>,
    key_prefix: String,
}

impl RedisCache {
    /// Create a new Redis cache under the given deployment key prefix.
    pub fn new(redis: Arc<RedisClient>, key_prefix: impl Into<String>) -> Self {
        Self {
            redis,
            key_prefix: key_prefix.into(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }
}

#[async_trait]
impl BannerCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.redis
            .get(self.full_key(key))
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: i64) -> Result<(), CacheError> {
        self.redis
            .set::<(), _, _>(
                self.full_key(key),
                value,
                Some(Expiration::EX(ttl_secs)),
                None,
                false,
            )
            .await
            .map_err(|e| CacheError::Redis(e.to_string()))
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let pattern = format!("{}*", self.full_key(prefix));

        // SCAN rather than KEYS: prefix deletion runs on every mutation
        // and must not block the server.
        let mut matched = Vec::new();
        let mut scan_stream = self.redis.scan_buffered(pattern, Some(SCAN_PAGE_SIZE), None);
        while let Some(key) = scan_stream.next().await {
            matched.push(key.map_err(|e| CacheError::Redis(e.to_string()))?);
        }
        drop(scan_stream);

        let mut deleted: u64 = 0;
        if !matched.is_empty() {
            deleted = self
                .redis
                .del(matched)
                .await
                .map_err(|e| CacheError::Redis(e.to_string()))?;
        }

        debug!(prefix = prefix, deleted = deleted, "Deleted cache keys by prefix");
        Ok(deleted)
    }
}

struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

/// In-memory cache for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    /// Create an empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries. Exposed for tests.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| entry.expires_at.is_none_or(|at| at > now))
            .count()
    }

    /// Whether the cache holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BannerCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        Ok(entries.get(key).and_then(|entry| {
            let live = entry.expires_at.is_none_or(|at| at > Instant::now());
            live.then(|| entry.value.clone())
        }))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: i64) -> Result<(), CacheError> {
        let expires_at = u64::try_from(ttl_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(|secs| Instant::now() + Duration::from_secs(secs));

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));

        Ok((before - entries.len()) as u64)
    }
}
