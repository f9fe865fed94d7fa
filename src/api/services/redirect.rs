use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, web};
use tracing::{debug, error};

use crate::errors::LinkPulseError;
use crate::services::RedirectService;

pub struct RedirectApi;

impl RedirectApi {
    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<RedirectService>,
    ) -> HttpResponse {
        let short_key = path.into_inner();

        match service.resolve(&short_key).await {
            Ok(long_url) => HttpResponse::Found()
                .insert_header((header::LOCATION, long_url))
                .finish(),
            Err(LinkPulseError::NotFound(_)) => {
                debug!("Redirect link not found: {}", short_key);
                Self::text_response(StatusCode::NOT_FOUND, "Not Found")
            }
            Err(LinkPulseError::Gone(_)) => {
                debug!("Redirect link expired: {}", short_key);
                Self::text_response(StatusCode::GONE, "Link expired")
            }
            Err(e) => {
                error!("Redirect lookup failed for '{}': {}", short_key, e);
                Self::text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    #[inline]
    fn text_response(status: StatusCode, body: &'static str) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"))
            .body(body)
    }
}
