//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{LinkPulseError, Result};
use crate::storage::{CreatedMapping, MappingStore, TopLink, UrlMapping};

use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinkPulseError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
///
/// `DatabaseConnection` is an internally pooled handle, so one instance is
/// shared by every request handler and the reconciler.
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url.as_str();
        if database_url.is_empty() {
            return Err(LinkPulseError::database_config("DATABASE_URL is not set"));
        }

        let backend_name = infer_backend_from_url(database_url)?;

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            let url = if database_url.starts_with("sqlite:") {
                database_url.to_string()
            } else {
                format!("sqlite://{}?mode=rwc", database_url)
            };
            connect_sqlite(&url).await?
        } else {
            connect_generic(database_url, &backend_name, config).await?
        };

        run_migrations(&db).await?;

        info!("{} storage initialized", backend_name.to_uppercase());
        Ok(Self { db, backend_name })
    }
}

#[async_trait]
impl MappingStore for SeaOrmStorage {
    async fn create(
        &self,
        short_key: &str,
        long_url: &str,
        expire_at: Option<DateTime<Utc>>,
    ) -> Result<CreatedMapping> {
        self.insert_mapping(short_key, long_url, expire_at).await
    }

    async fn get(&self, short_key: &str) -> Result<Option<UrlMapping>> {
        self.find_mapping(short_key).await
    }

    async fn set_click_count(&self, short_key: &str, count: i64) -> Result<()> {
        self.overwrite_click_count(short_key, count).await
    }

    async fn top_n(&self, n: u64) -> Result<Vec<TopLink>> {
        self.load_top(n).await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
