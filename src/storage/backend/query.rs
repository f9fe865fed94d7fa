//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::trace;

use super::SeaOrmStorage;
use super::converters::{model_to_mapping, model_to_top_link};
use crate::errors::{LinkPulseError, Result};
use crate::storage::{TopLink, UrlMapping};

use migration::entities::url_mapping;

impl SeaOrmStorage {
    pub(super) async fn find_mapping(&self, short_key: &str) -> Result<Option<UrlMapping>> {
        let model = url_mapping::Entity::find()
            .filter(url_mapping::Column::ShortKey.eq(short_key))
            .one(&self.db)
            .await
            .map_err(|e| {
                LinkPulseError::database_operation(format!(
                    "Failed to load mapping '{}': {}",
                    short_key, e
                ))
            })?;

        trace!("find_mapping({}) -> found={}", short_key, model.is_some());
        Ok(model.map(model_to_mapping))
    }

    pub(super) async fn load_top(&self, n: u64) -> Result<Vec<TopLink>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        // id 作为最后的排序键，保证 created_at 相同时结果依然确定
        let models = url_mapping::Entity::find()
            .order_by_desc(url_mapping::Column::ClickCount)
            .order_by_asc(url_mapping::Column::CreatedAt)
            .order_by_asc(url_mapping::Column::Id)
            .limit(n)
            .all(&self.db)
            .await
            .map_err(|e| {
                LinkPulseError::database_operation(format!("Failed to load top links: {}", e))
            })?;

        Ok(models.into_iter().map(model_to_top_link).collect())
    }
}
