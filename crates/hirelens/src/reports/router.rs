use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::postings::PostingId;

use super::service::{ArtifactError, CreateReportRequest, ReportJobService, ReportServiceError};
use super::store::{ReportJobId, ReportJobStore};

/// Router builder exposing HTTP endpoints for report creation, status
/// polling, and artifact download.
pub fn report_router<S>(service: Arc<ReportJobService<S>>) -> Router
where
    S: ReportJobStore + 'static,
{
    Router::new()
        .route("/api/v1/reports", post(create_report_handler::<S>))
        .route("/api/v1/reports/:job_id", get(report_status_handler::<S>))
        .route(
            "/api/v1/reports/:job_id/artifact",
            get(report_artifact_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateReportBody {
    pub(crate) posting_id: i64,
    #[serde(default)]
    pub(crate) include_all: bool,
    #[serde(default)]
    pub(crate) notify_by_email: bool,
}

pub(crate) async fn create_report_handler<S>(
    State(service): State<Arc<ReportJobService<S>>>,
    axum::Json(body): axum::Json<CreateReportBody>,
) -> Response
where
    S: ReportJobStore + 'static,
{
    let request = CreateReportRequest {
        posting_id: PostingId(body.posting_id),
        include_all: body.include_all,
        notify_by_email: body.notify_by_email,
    };

    match service.create_job(request) {
        Ok(created) => {
            let payload = json!({
                "job_id": created.job_id,
                "state": created.state.label(),
                "message": "ranking report generation started",
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(ReportServiceError::PostingNotFound) => {
            let payload = json!({ "error": "posting not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err @ ReportServiceError::IneligiblePosting { .. }) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn report_status_handler<S>(
    State(service): State<Arc<ReportJobService<S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: ReportJobStore + 'static,
{
    let id = ReportJobId(job_id);
    match service.job(&id) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(ReportServiceError::JobNotFound) => {
            let payload = json!({ "error": "report job not found", "job_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn report_artifact_handler<S>(
    State(service): State<Arc<ReportJobService<S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: ReportJobStore + 'static,
{
    let id = ReportJobId(job_id);
    match service.fetch_artifact(&id) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            bytes,
        )
            .into_response(),
        Err(ArtifactError::JobNotFound) => {
            let payload = json!({ "error": "report job not found", "job_id": id.0 });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err @ ArtifactError::NotReady { .. }) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err @ (ArtifactError::Corrupt | ArtifactError::Render(_))) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
