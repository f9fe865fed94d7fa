//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use linkpulse::api::AppServices;
use linkpulse::cache::{BaselineFetcher, BaselineFuture, CounterCache, MemoryCounterCache};
use linkpulse::config::DatabaseConfig;
use linkpulse::errors::{LinkPulseError, Result};
use linkpulse::services::ShortenOptions;
use linkpulse::storage::{MappingStore, SeaOrmStorage};
use linkpulse::utils::{KeyGenerator, RandomKeyGenerator};
use tempfile::TempDir;

pub const HOUR: Duration = Duration::from_secs(3600);

/// 创建临时 SQLite 数据库的存储实例
pub async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let storage = SeaOrmStorage::new(&config)
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

pub fn test_options() -> ShortenOptions {
    ShortenOptions {
        base_url: "http://sho.rt/".to_string(),
        max_generate_attempts: 3,
        default_ttl: HOUR,
    }
}

pub fn baseline(value: i64) -> BaselineFetcher {
    Box::new(move || Box::pin(async move { Ok(value) }) as BaselineFuture)
}

/// 存储 + 内存缓存 + 全部服务
pub struct TestApp {
    pub store: Arc<SeaOrmStorage>,
    pub cache: Arc<MemoryCounterCache>,
    pub services: AppServices,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_key_generator(Arc::new(RandomKeyGenerator::default())).await
    }

    pub async fn with_key_generator(key_generator: Arc<dyn KeyGenerator>) -> Self {
        let (store, dir) = create_temp_storage().await;
        let cache = Arc::new(MemoryCounterCache::default());
        let services = AppServices::new(store.clone(), cache.clone(), key_generator, test_options());
        Self {
            store,
            cache,
            services,
            _dir: dir,
        }
    }

    /// 同一个数据库，换一个空缓存（模拟缓存重启）
    pub fn with_fresh_cache(&self) -> (Arc<MemoryCounterCache>, AppServices) {
        let cache = Arc::new(MemoryCounterCache::default());
        let services = AppServices::new(
            self.store.clone(),
            cache.clone(),
            Arc::new(RandomKeyGenerator::default()),
            test_options(),
        );
        (cache, services)
    }

    pub async fn durable_count(&self, short_key: &str) -> i64 {
        self.store
            .get(short_key)
            .await
            .unwrap()
            .expect("mapping exists")
            .click_count
    }
}

/// 按脚本依次返回短码，用完后重复最后一个
pub struct ScriptedKeyGenerator {
    keys: Mutex<VecDeque<String>>,
    last: String,
}

impl ScriptedKeyGenerator {
    pub fn new(keys: &[&str]) -> Self {
        Self {
            keys: Mutex::new(keys.iter().map(|k| k.to_string()).collect()),
            last: keys.last().map(|k| k.to_string()).unwrap_or_default(),
        }
    }
}

impl KeyGenerator for ScriptedKeyGenerator {
    fn generate(&self) -> String {
        self.keys
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone())
    }
}

/// 所有操作都失败的缓存
pub struct FailingCache;

#[async_trait]
impl CounterCache for FailingCache {
    async fn get_url(&self, _short_key: &str) -> Result<Option<String>> {
        Err(LinkPulseError::cache_connection("connection refused"))
    }

    async fn set_url(&self, _short_key: &str, _long_url: &str, _ttl: Duration) -> Result<()> {
        Err(LinkPulseError::cache_connection("connection refused"))
    }

    async fn increment_clicks(
        &self,
        _short_key: &str,
        _fetch_baseline: BaselineFetcher,
    ) -> Result<i64> {
        Err(LinkPulseError::cache_connection("connection refused"))
    }

    async fn get_clicks(&self, _short_key: &str) -> Result<Option<i64>> {
        Err(LinkPulseError::cache_connection("connection refused"))
    }

    async fn list_counter_keys(&self) -> Result<Vec<String>> {
        Err(LinkPulseError::cache_connection("connection refused"))
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}
