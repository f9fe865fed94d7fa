use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::LinkPulseError;

/// API 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub error: String,
    pub message: String,
}

impl ResponseError for LinkPulseError {
    fn status_code(&self) -> StatusCode {
        match self {
            LinkPulseError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkPulseError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkPulseError::Gone(_) => StatusCode::GONE,
            LinkPulseError::AliasTaken(_) | LinkPulseError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // 服务端错误不向客户端暴露内部细节
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(status).json(ErrorBody {
            code: self.code().to_string(),
            error: self.error_type().to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LinkPulseError::validation("x"), StatusCode::BAD_REQUEST),
            (LinkPulseError::not_found("x"), StatusCode::NOT_FOUND),
            (LinkPulseError::gone("x"), StatusCode::GONE),
            (LinkPulseError::alias_taken("x"), StatusCode::CONFLICT),
            (LinkPulseError::conflict("x"), StatusCode::CONFLICT),
            (
                LinkPulseError::key_generation_exhausted("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LinkPulseError::database_connection("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LinkPulseError::cache_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{}", err);
        }
    }
}
