use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON body of every failed request: `{"error": "...", "code": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Stable machine code, e.g. "LOCATION_NOT_FOUND"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn with_code(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
        }
    }

    fn from_error<E: HttpError>(err: &E) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code().map(str::to_string),
        }
    }
}

/// Domain errors that map onto an HTTP status
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> Option<&'static str> {
        None
    }
}

/// Render an [`HttpError`]. Provider and server faults log at error,
/// caller mistakes at warn.
pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let body = ErrorResponse::from_error(&err);

    match status.is_server_error() {
        true => tracing::error!(status = %status, code = ?body.code, error = %body.error, "Request failed"),
        false => tracing::warn!(status = %status, code = ?body.code, error = %body.error, "Request rejected"),
    }

    (status, Json(body)).into_response()
}

/// `impl IntoResponse` via [`into_response`] for an [`HttpError`] type
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[derive(Debug, thiserror::Error)]
    enum SampleError {
        #[error("no such thing")]
        Missing,
        #[error("upstream broke")]
        Upstream,
    }

    impl HttpError for SampleError {
        fn status_code(&self) -> StatusCode {
            match self {
                Self::Missing => StatusCode::NOT_FOUND,
                Self::Upstream => StatusCode::BAD_GATEWAY,
            }
        }

        fn error_code(&self) -> Option<&'static str> {
            match self {
                Self::Missing => Some("MISSING"),
                Self::Upstream => None,
            }
        }
    }

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_error_body_carries_message_and_code() {
        let response = into_response(SampleError::Missing);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            serde_json::json!({ "error": "no such thing", "code": "MISSING" })
        );
    }

    #[tokio::test]
    async fn test_code_is_omitted_when_absent() {
        let response = into_response(SampleError::Upstream);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_of(response).await,
            serde_json::json!({ "error": "upstream broke" })
        );
    }
}
