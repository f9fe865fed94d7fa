//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, SqlErr};
use tracing::{debug, info, trace};

use super::SeaOrmStorage;
use crate::errors::{LinkPulseError, Result};
use crate::storage::CreatedMapping;

use migration::entities::url_mapping;

impl SeaOrmStorage {
    /// 单条 INSERT，唯一索引冲突即为唯一的冲突信号（不做先查后插）
    pub(super) async fn insert_mapping(
        &self,
        short_key: &str,
        long_url: &str,
        expire_at: Option<DateTime<Utc>>,
    ) -> Result<CreatedMapping> {
        let active_model = url_mapping::ActiveModel {
            short_key: Set(short_key.to_string()),
            long_url: Set(long_url.to_string()),
            click_count: Set(0),
            created_at: Set(Utc::now()),
            expire_at: Set(expire_at),
            ..Default::default()
        };

        match active_model.insert(&self.db).await {
            Ok(model) => {
                info!("Mapping created: {} -> {}", model.short_key, model.long_url);
                Ok(CreatedMapping {
                    id: model.id,
                    created_at: model.created_at,
                })
            }
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    debug!("Short key already exists: {}", short_key);
                    Err(LinkPulseError::conflict(format!(
                        "Short key '{}' already exists",
                        short_key
                    )))
                }
                _ => Err(LinkPulseError::database_operation(format!(
                    "Failed to insert mapping '{}': {}",
                    short_key, e
                ))),
            },
        }
    }

    /// 用计数器快照覆盖点击基线
    ///
    /// The `click_count <= count` guard keeps the durable baseline
    /// non-decreasing when a stale snapshot arrives late.
    pub(super) async fn overwrite_click_count(&self, short_key: &str, count: i64) -> Result<()> {
        let result = url_mapping::Entity::update_many()
            .col_expr(url_mapping::Column::ClickCount, Expr::value(count))
            .filter(url_mapping::Column::ShortKey.eq(short_key))
            .filter(url_mapping::Column::ClickCount.lte(count))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkPulseError::database_operation(format!(
                    "Failed to update click count for '{}': {}",
                    short_key, e
                ))
            })?;

        if result.rows_affected == 0 {
            trace!(
                "set_click_count({}, {}) matched no row (missing or baseline already higher)",
                short_key, count
            );
        }

        Ok(())
    }
}
