use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::postings::{DirectoryError, PostingDirectory, PostingId, PostingRecord};

use super::assembler;
use super::collaborators::{
    ArtifactRenderer, NotificationDispatcher, RenderError, ReportNotification, ScoreSource,
};
use super::store::{ReportJob, ReportJobId, ReportJobState, ReportJobStore, StoreError};

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportJobId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportJobId(format!("report-{id:06}"))
}

/// Request to start report generation for one posting.
#[derive(Debug, Clone, Copy)]
pub struct CreateReportRequest {
    pub posting_id: PostingId,
    pub include_all: bool,
    pub notify_by_email: bool,
}

/// Acknowledgement returned while generation runs in the background.
#[derive(Debug, Clone)]
pub struct CreatedReportJob {
    pub job_id: ReportJobId,
    pub state: ReportJobState,
}

/// Owns the report-job lifecycle: precondition checks, job creation, the
/// background assembly task, and artifact retrieval.
///
/// The job store is the only shared mutable resource; every other
/// collaborator is read-only from this service's point of view.
pub struct ReportJobService<S> {
    store: Arc<S>,
    directory: Arc<dyn PostingDirectory>,
    scores: Arc<dyn ScoreSource>,
    renderer: Arc<dyn ArtifactRenderer>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    artifacts: Mutex<HashMap<ReportJobId, Vec<u8>>>,
}

impl<S> ReportJobService<S>
where
    S: ReportJobStore + 'static,
{
    pub fn new(
        store: Arc<S>,
        directory: Arc<dyn PostingDirectory>,
        scores: Arc<dyn ScoreSource>,
        renderer: Arc<dyn ArtifactRenderer>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            directory,
            scores,
            renderer,
            dispatcher,
            artifacts: Mutex::new(HashMap::new()),
        }
    }

    /// Validate the posting, persist a generating record, and schedule the
    /// assembly task. Returns before any assembly work runs.
    ///
    /// Concurrent calls for the same posting intentionally produce
    /// independent jobs; there is no dedupe.
    pub fn create_job(
        &self,
        request: CreateReportRequest,
    ) -> Result<CreatedReportJob, ReportServiceError> {
        let record = self
            .directory
            .posting(request.posting_id)?
            .ok_or(ReportServiceError::PostingNotFound)?;

        if !record.posting.stage.allows_reporting() {
            return Err(ReportServiceError::IneligiblePosting {
                stage: record.posting.stage.label(),
            });
        }

        let job = ReportJob::generating(
            next_report_id(),
            request.posting_id,
            request.include_all,
            request.notify_by_email,
            Utc::now(),
        );
        let job_id = job.id.clone();
        self.store.insert(job)?;

        info!(%job_id, posting_id = %request.posting_id, "ranking report generation scheduled");
        self.spawn_assembly(job_id.clone(), record, request);

        Ok(CreatedReportJob {
            job_id,
            state: ReportJobState::Generating,
        })
    }

    /// Read the current job record. Never blocks on the background task.
    pub fn job(&self, id: &ReportJobId) -> Result<ReportJob, ReportServiceError> {
        self.store
            .fetch(id)?
            .ok_or(ReportServiceError::JobNotFound)
    }

    /// Return the rendered artifact for a completed job.
    ///
    /// Rendering is lazy and happens at most once per job; the bytes are
    /// cached so repeated fetches are byte-identical.
    pub fn fetch_artifact(&self, id: &ReportJobId) -> Result<Vec<u8>, ArtifactError> {
        {
            let cache = self.artifacts.lock().expect("artifact cache poisoned");
            if let Some(bytes) = cache.get(id) {
                return Ok(bytes.clone());
            }
        }

        let job = self
            .store
            .fetch(id)?
            .ok_or(ArtifactError::JobNotFound)?;

        if job.state != ReportJobState::Completed {
            return Err(ArtifactError::NotReady {
                state: job.state.label(),
            });
        }

        let payload = job.result.as_ref().ok_or_else(|| {
            ArtifactError::Store(StoreError::Unavailable(
                "completed job record is missing its payload".to_string(),
            ))
        })?;

        let bytes = self.renderer.render(payload)?;
        if bytes.is_empty() {
            return Err(ArtifactError::Corrupt);
        }

        let mut cache = self.artifacts.lock().expect("artifact cache poisoned");
        // A racing fetch may have rendered concurrently; keep the first copy.
        let stored = cache.entry(id.clone()).or_insert(bytes);
        Ok(stored.clone())
    }

    fn spawn_assembly(&self, job_id: ReportJobId, record: PostingRecord, request: CreateReportRequest) {
        let store = Arc::clone(&self.store);
        let scores = Arc::clone(&self.scores);
        let dispatcher = Arc::clone(&self.dispatcher);

        tokio::spawn(async move {
            run_assembly(store, scores, dispatcher, job_id, record, request).await;
        });
    }
}

/// The background half of a job: fetch scores, assemble, write the terminal
/// state. Failures here become job state, never a caller-visible error.
async fn run_assembly<S>(
    store: Arc<S>,
    scores: Arc<dyn ScoreSource>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    job_id: ReportJobId,
    record: PostingRecord,
    request: CreateReportRequest,
) where
    S: ReportJobStore,
{
    let outcome = scores
        .scored_candidates(request.posting_id)
        .map_err(|err| err.to_string())
        .and_then(|candidates| {
            assembler::assemble(
                record.posting.clone(),
                record.company.clone(),
                &candidates,
                request.include_all,
                Utc::now(),
            )
            .map_err(|err| err.to_string())
        });

    match outcome {
        Ok(payload) => {
            if let Err(err) = store.complete(&job_id, payload) {
                error!(%job_id, %err, "terminal write failed for completed report");
                return;
            }
            info!(%job_id, "ranking report completed");

            if request.notify_by_email {
                let notification = ReportNotification {
                    job_id: job_id.clone(),
                    recipient: record.company.contact_email.clone(),
                    posting_title: record.posting.title.clone(),
                    artifact_ref: format!("/api/v1/reports/{job_id}/artifact"),
                };
                // Delivery is best-effort and never flips the job state.
                if let Err(err) = dispatcher.dispatch(notification) {
                    warn!(%job_id, %err, "report notification dispatch failed");
                }
            }
        }
        Err(detail) => {
            warn!(%job_id, %detail, "ranking report generation failed");
            if let Err(err) = store.fail(&job_id, detail) {
                error!(%job_id, %err, "terminal write failed for failed report");
            }
        }
    }
}

/// Error surfaced synchronously by [`ReportJobService`].
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error("posting not found")]
    PostingNotFound,
    #[error("posting stage '{stage}' does not allow report generation")]
    IneligiblePosting { stage: &'static str },
    #[error("report job not found")]
    JobNotFound,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error raised when fetching the rendered artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("report job not found")]
    JobNotFound,
    #[error("report artifact is not ready: job is {state}")]
    NotReady { state: &'static str },
    #[error("rendered artifact is empty")]
    Corrupt,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
