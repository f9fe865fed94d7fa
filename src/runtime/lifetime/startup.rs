use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analytics::Reconciler;
use crate::api::AppServices;
use crate::cache::{CacheFactory, CounterCache};
use crate::config::StaticConfig;
use crate::services::ShortenOptions;
use crate::storage::{MappingStore, StorageFactory};
use crate::utils::RandomKeyGenerator;

/// 存储、缓存与回写任务（server 与 reconcile 模式共用）
pub struct CoreContext {
    pub store: Arc<dyn MappingStore>,
    pub cache: Arc<dyn CounterCache>,
    pub reconciler: Reconciler,
}

pub struct StartupContext {
    pub core: CoreContext,
    pub services: AppServices,
}

pub async fn prepare_core(config: &StaticConfig) -> Result<CoreContext> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    let store: Arc<dyn MappingStore> = storage;
    info!("Using storage backend: {}", store.backend_name());

    let cache = CacheFactory::create(&config.cache)
        .await
        .context("Failed to create cache backend")?;

    let reconciler = Reconciler::new(store.clone(), cache.clone());

    Ok(CoreContext {
        store,
        cache,
        reconciler,
    })
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = Instant::now();
    debug!("Starting pre-startup processing...");

    let core = prepare_core(config).await?;

    let key_generator = Arc::new(RandomKeyGenerator::new(config.shortener.key_length));
    let options = ShortenOptions::from_config(&config.shortener, &config.cache);
    let services = AppServices::new(
        core.store.clone(),
        core.cache.clone(),
        key_generator,
        options,
    );

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { core, services })
}
