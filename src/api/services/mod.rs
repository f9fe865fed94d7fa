pub mod health;
pub mod link;
pub mod redirect;

use std::sync::Arc;

use actix_web::web;

use crate::cache::CounterCache;
use crate::errors::LinkPulseError;
use crate::services::{AnalyticsService, RedirectService, ShortenOptions, ShortenService};
use crate::storage::MappingStore;
use crate::utils::KeyGenerator;

pub use health::{HealthApi, HealthInfo};
pub use link::{LinkApi, ShortenBody, ShortenResponse, TopQuery};
pub use redirect::RedirectApi;

/// 请求体上限
const MAX_JSON_PAYLOAD: usize = 64 * 1024;

/// 注入到 actix App 的全部服务
#[derive(Clone)]
pub struct AppServices {
    pub shorten: Arc<ShortenService>,
    pub redirect: Arc<RedirectService>,
    pub analytics: Arc<AnalyticsService>,
    pub health: HealthInfo,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn MappingStore>,
        cache: Arc<dyn CounterCache>,
        key_generator: Arc<dyn KeyGenerator>,
        options: ShortenOptions,
    ) -> Self {
        let health = HealthInfo::new(store.backend_name(), cache.backend_name());
        let default_ttl = options.default_ttl;

        Self {
            shorten: Arc::new(ShortenService::new(
                store.clone(),
                cache.clone(),
                key_generator,
                options,
            )),
            redirect: Arc::new(RedirectService::new(
                store.clone(),
                cache.clone(),
                default_ttl,
            )),
            analytics: Arc::new(AnalyticsService::new(store, cache)),
            health,
        }
    }

    /// 注册 app_data 与路由；`/{short_key}` 必须最后注册
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.shorten.clone()))
            .app_data(web::Data::from(self.redirect.clone()))
            .app_data(web::Data::from(self.analytics.clone()))
            .app_data(web::Data::new(self.health.clone()))
            .app_data(json_config())
            .service(
                web::scope("/api/v1")
                    .route("/shorten", web::post().to(LinkApi::shorten))
                    .route("/analytics/{short_key}", web::get().to(LinkApi::analytics))
                    .route("/top", web::get().to(LinkApi::top)),
            )
            .route("/healthz", web::get().to(HealthApi::health_check))
            .route("/{short_key}", web::get().to(RedirectApi::handle_redirect));
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(|err, _req| {
            LinkPulseError::validation(format!("Invalid request body: {}", err)).into()
        })
}
