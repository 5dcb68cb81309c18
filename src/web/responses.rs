//! HTTP response types and utilities
//!
//! Every JSON endpoint answers with the `ApiResponse` envelope. The two
//! domain error enums map onto it with their stage in `details`.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{ProxyError, ResolutionError};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    /// Response timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an error response with details
    pub fn error_with_details(message: String, details: HashMap<String, String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            details: Some(details),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Success response helper
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

/// Error response helper
pub fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(message.to_string())),
    )
        .into_response()
}

fn stage_details(stage: &str) -> HashMap<String, String> {
    HashMap::from([("stage".to_string(), stage.to_string())])
}

impl IntoResponse for ResolutionError {
    fn into_response(self) -> Response {
        let status = match &self {
            ResolutionError::CrossReference { .. } | ResolutionError::NoStreams { .. } => {
                StatusCode::NOT_FOUND
            }
            ResolutionError::Transport { .. } | ResolutionError::UpstreamStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ResolutionError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        };

        (
            status,
            Json(ApiResponse::error_with_details(
                self.user_message(),
                stage_details(self.stage().as_str()),
            )),
        )
            .into_response()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ProxyError::OriginUnreachable { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::OriginStatus { status } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        };

        let mut response = (
            status,
            Json(ApiResponse::error_with_details(
                self.to_string(),
                stage_details(self.stage().as_str()),
            )),
        )
            .into_response();
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}
