//! Traits for the external collaborators the report lifecycle depends on:
//! the AI scoring backend, the PDF rendering engine, and outbound email.

use crate::postings::PostingId;

use super::domain::{ReportPayload, ScoredCandidate};
use super::store::ReportJobId;

/// Supplies the already-scored candidates for a posting. Scores are computed
/// elsewhere; this crate only consumes them.
pub trait ScoreSource: Send + Sync {
    fn scored_candidates(&self, posting: PostingId) -> Result<Vec<ScoredCandidate>, ScoreSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreSourceError {
    #[error("scoring service unavailable: {0}")]
    Unavailable(String),
    #[error("scoring data malformed: {0}")]
    Malformed(String),
}

/// Turns a completed report payload into an immutable binary artifact.
pub trait ArtifactRenderer: Send + Sync {
    fn render(&self, payload: &ReportPayload) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("artifact renderer unavailable: {0}")]
    Unavailable(String),
}

/// Email notification emitted after a job completes successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNotification {
    pub job_id: ReportJobId,
    pub recipient: String,
    pub posting_title: String,
    pub artifact_ref: String,
}

/// Best-effort delivery of the completion notification. Failures are logged
/// by the caller and never alter the job's terminal state.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: ReportNotification) -> Result<(), DispatchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
