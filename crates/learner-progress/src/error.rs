use crate::config::ConfigError;
use crate::progress::{ProgressServiceError, RosterImportError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Roster(RosterImportError),
    Progress(ProgressServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Roster(err) => write!(f, "roster error: {}", err),
            AppError::Progress(err) => write!(f, "progress error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Progress(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Progress(ProgressServiceError::Validation(err)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": err.to_string(), "field": err.field() }),
            ),
            AppError::Roster(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string() }),
            ),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Progress(ProgressServiceError::Repository(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RosterImportError> for AppError {
    fn from(value: RosterImportError) -> Self {
        Self::Roster(value)
    }
}

impl From<ProgressServiceError> for AppError {
    fn from(value: ProgressServiceError) -> Self {
        Self::Progress(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{CourseId, QueryValidationError, RepositoryError};

    #[test]
    fn validation_errors_map_to_unprocessable() {
        let error: AppError =
            ProgressServiceError::from(QueryValidationError::UnknownCourse(CourseId(7))).into();
        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn validation_body_names_the_field() {
        let error: AppError =
            ProgressServiceError::from(QueryValidationError::InvalidSort("up".to_string())).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["field"], "sort");
        assert_eq!(body["error"], "sort must be 'asc' or 'desc', got 'up'");
    }

    #[test]
    fn repository_errors_map_to_internal_error() {
        let error: AppError =
            ProgressServiceError::from(RepositoryError::Unavailable("down".to_string())).into();
        assert!(error.to_string().contains("down"));
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn roster_errors_map_to_bad_request() {
        let error: AppError = RosterImportError::Conflict {
            line: 4,
            detail: "duplicate".to_string(),
        }
        .into();
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
