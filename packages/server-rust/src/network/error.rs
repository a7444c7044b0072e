//! HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::service::SelectionError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// An error rendered as `{ "code", "message", "details"? }` with a status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
            retry_after_secs: None,
        }
    }

    /// The server is draining and no longer takes new selections.
    #[must_use]
    pub fn draining() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "draining",
            "server is shutting down",
        )
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        let message = err.to_string();
        match err {
            SelectionError::TooManyPoints {
                estimate,
                max_allowed_points,
            } => Self {
                details: Some(json!({
                    "estimate": estimate,
                    "maxAllowedPoints": max_allowed_points,
                })),
                ..Self::new(StatusCode::PAYLOAD_TOO_LARGE, "too_many_points", message)
            },
            SelectionError::EstimationFailed(_) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "estimation_failed",
                message,
            ),
            SelectionError::SubmissionFailed(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "submission_failed", message)
            }
            SelectionError::Overloaded => Self {
                retry_after_secs: Some(1),
                ..Self::new(StatusCode::SERVICE_UNAVAILABLE, "overloaded", message)
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::BAD_REQUEST => StatusCode::UNPROCESSABLE_ENTITY,
            other => other,
        };
        Self::new(status, "invalid_selection", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(ApiErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            }),
        )
            .into_response();

        if let Some(secs) = self.retry_after_secs {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert("retry-after", value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use ahn_laz_core::SizeEstimate;

    use super::*;

    #[test]
    fn too_many_points_is_413_with_estimate() {
        let err = ApiError::from(SelectionError::TooManyPoints {
            estimate: SizeEstimate::new(12, 3, 100.0),
            max_allowed_points: 10,
        });
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.code, "too_many_points");
        let details = err.details.unwrap();
        assert_eq!(details["estimate"]["approximatePointCount"], 12);
        assert_eq!(details["maxAllowedPoints"], 10);
    }

    #[test]
    fn backend_failures_map_to_gateway_statuses() {
        let estimation = ApiError::from(SelectionError::EstimationFailed(anyhow::anyhow!("db")));
        assert_eq!(estimation.status, StatusCode::SERVICE_UNAVAILABLE);

        let submission = ApiError::from(SelectionError::SubmissionFailed(anyhow::anyhow!("x")));
        assert_eq!(submission.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn overloaded_sets_retry_after() {
        let response = ApiError::from(SelectionError::Overloaded).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()["retry-after"], "1");
    }
}
