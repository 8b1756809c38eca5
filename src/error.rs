use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AppError {
    /// A scenario parameter fell outside its documented range.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("malformed request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// The record store has not been initialized yet. Aggregations recover from
    /// this by returning zeroed views.
    #[error("record store has not been initialized")]
    EmptyDataset,

    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } => "invalid_input",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::EmptyDataset => "empty_dataset",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::Migration(_) => "migration",
            AppError::CorruptRecord(_) => "corrupt_record",
            AppError::Json(_) => "json",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::EmptyDataset => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(kind = self.kind(), "request failed: {self}");
        } else {
            warn!(kind = self.kind(), "request rejected: {self}");
        }
        let body = serde_json::json!({
            "error": self.kind(),
            "detail": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_names_field_and_range() {
        let err = AppError::InvalidInput { field: "discount_rate", value: 31.0, min: 0.0, max: 30.0 };
        assert_eq!(err.to_string(), "discount_rate must be within [0, 30], got 31");
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let invalid = AppError::InvalidInput { field: "delivery_cost", value: -1.0, min: 0.0, max: 100.0 };
        assert_eq!(invalid.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let unavailable = AppError::StoreUnavailable(sqlx::Error::PoolTimedOut);
        assert_eq!(unavailable.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let corrupt = AppError::CorruptRecord("bad tier".to_string());
        assert_eq!(corrupt.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
