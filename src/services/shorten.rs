use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::CounterCache;
use crate::config::{CacheConfig, ShortenerConfig};
use crate::errors::{LinkPulseError, Result};
use crate::storage::{MappingStore, cache_ttl};
use crate::utils::{KeyGenerator, is_valid_short_key, validate_url};

/// 与路由冲突的短码
const RESERVED_KEYS: &[&str] = &["api", "healthz"];

#[derive(Debug, Clone)]
pub struct ShortenRequest {
    pub long_url: String,
    pub custom_alias: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenResult {
    pub short_key: String,
    pub short_url: String,
    pub long_url: String,
    pub expire_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ShortenOptions {
    /// 拼接 short_url 的公开地址
    pub base_url: String,
    pub max_generate_attempts: u32,
    pub default_ttl: Duration,
}

impl ShortenOptions {
    pub fn from_config(shortener: &ShortenerConfig, cache: &CacheConfig) -> Self {
        Self {
            base_url: shortener.base_url.clone(),
            max_generate_attempts: shortener.max_generate_attempts,
            default_ttl: cache.default_ttl(),
        }
    }
}

impl Default for ShortenOptions {
    fn default() -> Self {
        Self::from_config(&ShortenerConfig::default(), &CacheConfig::default())
    }
}

/// Write path: validation, key allocation, durable insert, cache seed.
pub struct ShortenService {
    store: Arc<dyn MappingStore>,
    cache: Arc<dyn CounterCache>,
    key_generator: Arc<dyn KeyGenerator>,
    options: ShortenOptions,
}

impl ShortenService {
    pub fn new(
        store: Arc<dyn MappingStore>,
        cache: Arc<dyn CounterCache>,
        key_generator: Arc<dyn KeyGenerator>,
        options: ShortenOptions,
    ) -> Self {
        Self {
            store,
            cache,
            key_generator,
            options,
        }
    }

    pub async fn shorten(&self, req: ShortenRequest) -> Result<ShortenResult> {
        let long_url = req.long_url.trim();
        validate_url(long_url).map_err(|e| LinkPulseError::validation(e.to_string()))?;

        let alias = req
            .custom_alias
            .as_deref()
            .map(str::trim)
            .filter(|alias| !alias.is_empty());

        let short_key = match alias {
            Some(alias) => self.create_with_alias(alias, long_url, req.expire_at).await?,
            None => self.create_with_generated_key(long_url, req.expire_at).await?,
        };

        self.seed_cache(&short_key, long_url, req.expire_at).await;

        Ok(ShortenResult {
            short_url: self.short_url(&short_key),
            short_key,
            long_url: long_url.to_string(),
            expire_at: req.expire_at,
        })
    }

    async fn create_with_alias(
        &self,
        alias: &str,
        long_url: &str,
        expire_at: Option<DateTime<Utc>>,
    ) -> Result<String> {
        if !is_valid_short_key(alias) {
            return Err(LinkPulseError::validation(format!(
                "Invalid custom alias '{}'. Use 1-64 characters of letters, digits, '_' or '-'.",
                alias
            )));
        }
        if RESERVED_KEYS.contains(&alias) {
            return Err(LinkPulseError::validation(format!(
                "Custom alias '{}' conflicts with reserved routes",
                alias
            )));
        }

        match self.store.create(alias, long_url, expire_at).await {
            Ok(_) => {
                info!("Created alias '{}' -> {}", alias, long_url);
                Ok(alias.to_string())
            }
            Err(LinkPulseError::Conflict(_)) => Err(LinkPulseError::alias_taken(format!(
                "Custom alias '{}' already exists",
                alias
            ))),
            Err(e) => Err(e),
        }
    }

    async fn create_with_generated_key(
        &self,
        long_url: &str,
        expire_at: Option<DateTime<Utc>>,
    ) -> Result<String> {
        let attempts = self.options.max_generate_attempts.max(1);

        for attempt in 1..=attempts {
            let key = self.key_generator.generate();
            match self.store.create(&key, long_url, expire_at).await {
                Ok(_) => {
                    info!("Created '{}' -> {}", key, long_url);
                    return Ok(key);
                }
                Err(LinkPulseError::Conflict(_)) => {
                    debug!(
                        "Generated key '{}' collided (attempt {}/{})",
                        key, attempt, attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(LinkPulseError::key_generation_exhausted(format!(
            "No free short key after {} attempts",
            attempts
        )))
    }

    /// Best-effort; an already-expired mapping is never cached.
    async fn seed_cache(&self, short_key: &str, long_url: &str, expire_at: Option<DateTime<Utc>>) {
        let Some(ttl) = cache_ttl(expire_at, self.options.default_ttl, Utc::now()) else {
            debug!("Not caching '{}': already expired", short_key);
            return;
        };

        if let Err(e) = self.cache.set_url(short_key, long_url, ttl).await {
            warn!("Failed to seed cache for '{}': {}", short_key, e);
        }
    }

    fn short_url(&self, short_key: &str) -> String {
        format!(
            "{}/{}",
            self.options.base_url.trim_end_matches('/'),
            short_key
        )
    }
}
