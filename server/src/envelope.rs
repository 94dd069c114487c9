use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::error;

use crate::errors::RestResult;

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse<T> {
    /// Always `true`.
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    pub status_code: u16,
    pub message: String,
}

/// The uniform payload every endpoint returns; `success` is the
/// discriminant. The HTTP status always mirrors `statusCode`.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success(SuccessResponse<T>),
    Error(ErrorResponse),
}

impl<T> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiResponse::Success(SuccessResponse {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data,
        })
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        ApiResponse::Error(ErrorResponse {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
        })
    }

    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            ApiResponse::Success(s) => s.status_code,
            ApiResponse::Error(e) => e.status_code,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Sole translation point between service results and client payloads.
///
/// A success becomes `Success` with the given message and status; a failure
/// becomes `Error` with the error's status and client-safe message. Internal
/// failures are logged here and never leak their detail outward.
pub fn wrap<T>(
    result: RestResult<T>,
    success_message: &str,
    success_status: StatusCode,
) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::success(success_status, success_message, data),
        Err(err) => {
            let status = err.status_code();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!("service call failed: {}", err);
            }
            ApiResponse::error(status, err.client_message())
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // 204 must not carry a body
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::RestError;

    #[test]
    fn test_wrap_success_shape() {
        let envelope = wrap(Ok(42), "Loaded", StatusCode::OK);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "statusCode": 200,
                "message": "Loaded",
                "data": 42,
            })
        );
    }

    #[test]
    fn test_wrap_error_uses_declared_status_and_message() {
        let result: RestResult<u8> = Err(RestError::NotFound("Note with ID x not found".into()));
        let envelope = wrap(result, "unused", StatusCode::OK);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "statusCode": 404,
                "message": "Note with ID x not found",
            })
        );
    }

    #[test]
    fn test_wrap_never_leaks_internal_detail() {
        let result: RestResult<u8> =
            Err(RestError::Internal("database error: disk I/O error".into()));
        let envelope = wrap(result, "unused", StatusCode::OK);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], "An unexpected error occurred");
    }
}
