use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

/// 健康检查使用的静态信息
#[derive(Clone, Debug)]
pub struct HealthInfo {
    pub started_at: DateTime<Utc>,
    pub storage_backend: String,
    pub cache_backend: String,
}

impl HealthInfo {
    pub fn new(storage_backend: &str, cache_backend: &str) -> Self {
        Self {
            started_at: Utc::now(),
            storage_backend: storage_backend.to_string(),
            cache_backend: cache_backend.to_string(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    storage: &'a str,
    cache: &'a str,
    uptime_secs: i64,
}

pub struct HealthApi;

impl HealthApi {
    pub async fn health_check(info: web::Data<HealthInfo>) -> HttpResponse {
        trace!("Received health check request");
        let uptime = (Utc::now() - info.started_at).num_seconds().max(0);

        HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            storage: &info.storage_backend,
            cache: &info.cache_backend,
            uptime_secs: uptime,
        })
    }
}
