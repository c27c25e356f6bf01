use analytics::AnalyticsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// A failed computation only fails its own request; the server keeps running.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Analytics(AnalyticsError::Schema(schema_err)) => {
                tracing::error!(error = %schema_err, "Schema error.");
                (StatusCode::UNPROCESSABLE_ENTITY, schema_err.to_string())
            }
            AppError::Analytics(AnalyticsError::Range(range_err)) => {
                (StatusCode::BAD_REQUEST, range_err.to_string())
            }
            AppError::Analytics(err @ AnalyticsError::NoDateBounds) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            AppError::Analytics(err @ AnalyticsError::Frame(_)) => {
                tracing::error!(error = %err, "Aggregation failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
