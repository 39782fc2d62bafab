//! Error types for funnel analytics

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use thiserror::Error;

use crate::handlers::types::ErrorResponse;

/// Errors surfaced by report computation. None of them are retried.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Aggregation failed: {0}")]
    AggregationFailed(String),
}

impl AnalyticsError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AnalyticsError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalyticsError::NotFound { .. } => StatusCode::NOT_FOUND,
            AnalyticsError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
            AnalyticsError::AggregationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for AnalyticsError {
    fn from(error: DbErr) -> Self {
        AnalyticsError::AggregationFailed(error.to_string())
    }
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AnalyticsError::not_found("shop 'x'").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AnalyticsError::InvalidWindow("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalyticsError::AggregationFailed("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_error_becomes_aggregation_failed() {
        let error: AnalyticsError = DbErr::Custom("connection reset".to_string()).into();
        match error {
            AnalyticsError::AggregationFailed(msg) => assert!(msg.contains("connection reset")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
