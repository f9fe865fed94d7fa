use crate::storage::{TopLink, UrlMapping};
use migration::entities::url_mapping;

/// 将 Sea-ORM Model 转换为 UrlMapping
pub fn model_to_mapping(model: url_mapping::Model) -> UrlMapping {
    UrlMapping {
        id: model.id,
        short_key: model.short_key,
        long_url: model.long_url,
        click_count: model.click_count.max(0),
        created_at: model.created_at,
        expire_at: model.expire_at,
    }
}

pub fn model_to_top_link(model: url_mapping::Model) -> TopLink {
    TopLink {
        short_key: model.short_key,
        click_count: model.click_count.max(0),
        created_at: model.created_at,
        expire_at: model.expire_at,
    }
}
