use crate::config::ConfigError;
use crate::reports::{ArtifactError, PollError, ReportServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Service-surface error: everything the binary and its HTTP layer can fail
/// with, mapped onto responses in one place.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Report(ReportServiceError),
    Artifact(ArtifactError),
    Poll(PollError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Artifact(err) => write!(f, "artifact error: {}", err),
            AppError::Poll(err) => write!(f, "polling error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Artifact(err) => Some(err),
            AppError::Poll(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Report(ReportServiceError::PostingNotFound)
            | AppError::Report(ReportServiceError::JobNotFound)
            | AppError::Artifact(ArtifactError::JobNotFound)
            | AppError::Poll(PollError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Report(ReportServiceError::IneligiblePosting { .. })
            | AppError::Artifact(ArtifactError::NotReady { .. }) => StatusCode::CONFLICT,
            AppError::Poll(PollError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Artifact(ArtifactError::Corrupt)
            | AppError::Artifact(ArtifactError::Render(_))
            | AppError::Poll(PollError::Generation { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Report(_)
            | AppError::Artifact(_)
            | AppError::Poll(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ReportServiceError> for AppError {
    fn from(value: ReportServiceError) -> Self {
        Self::Report(value)
    }
}

impl From<ArtifactError> for AppError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}

impl From<PollError> for AppError {
    fn from(value: PollError) -> Self {
        Self::Poll(value)
    }
}
