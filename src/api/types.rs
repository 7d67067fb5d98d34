//! API request and response types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::CourseScoutError;

/// Structured error carried in the response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Stable identifier, see [`CourseScoutError::kind`]
    pub kind: String,
    pub message: String,
}

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorBody {
                kind: kind.into(),
                message: message.into(),
            }),
        }
    }
}

/// Handler error mapped onto an HTTP status and the response envelope
#[derive(Debug)]
pub struct ApiError(pub CourseScoutError);

impl From<CourseScoutError> for ApiError {
    fn from(err: CourseScoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ApiResponse<()> = ApiResponse::error(self.0.kind(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Workload bucket option for filter inputs
#[derive(Debug, Serialize, Deserialize)]
pub struct HoursBucketResponse {
    pub label: String,
    pub ordinal: u8,
}
