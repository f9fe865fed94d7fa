use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::LinkPulseError;
use crate::services::{AnalyticsService, ShortenRequest, ShortenService};

#[derive(Debug, Clone, Deserialize)]
pub struct ShortenBody {
    pub long_url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
    /// RFC 3339
    #[serde(default)]
    pub expire_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopQuery {
    pub n: Option<u64>,
}

pub struct LinkApi;

impl LinkApi {
    pub async fn shorten(
        service: web::Data<ShortenService>,
        body: web::Json<ShortenBody>,
    ) -> Result<HttpResponse, LinkPulseError> {
        let body = body.into_inner();
        let result = service
            .shorten(ShortenRequest {
                long_url: body.long_url,
                custom_alias: body.custom_alias,
                expire_at: body.expire_at,
            })
            .await?;

        Ok(HttpResponse::Ok().json(ShortenResponse {
            short_url: result.short_url,
            short_key: result.short_key,
            expire_at: result.expire_at,
        }))
    }

    pub async fn analytics(
        service: web::Data<AnalyticsService>,
        path: web::Path<String>,
    ) -> Result<HttpResponse, LinkPulseError> {
        let short_key = path.into_inner();
        let analytics = service.analytics(&short_key).await?;
        Ok(HttpResponse::Ok().json(analytics))
    }

    pub async fn top(
        service: web::Data<AnalyticsService>,
        query: web::Query<TopQuery>,
    ) -> Result<HttpResponse, LinkPulseError> {
        trace!("Top links requested (n = {:?})", query.n);
        let links = service.top(query.n).await?;
        Ok(HttpResponse::Ok().json(links))
    }
}
