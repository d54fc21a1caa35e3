use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::postings::PostingId;

use super::domain::ReportPayload;

/// Opaque identifier of a report job, assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportJobId(pub String);

impl fmt::Display for ReportJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a report job. `Generating` is the only non-terminal
/// state; once a job leaves it the record never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportJobState {
    Generating,
    Completed,
    Error,
}

impl ReportJobState {
    pub fn label(&self) -> &'static str {
        match self {
            ReportJobState::Generating => "GENERATING",
            ReportJobState::Completed => "COMPLETED",
            ReportJobState::Error => "ERROR",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReportJobState::Generating)
    }
}

/// The unit of asynchronous report work.
///
/// `result` and `error_detail` are mutually exclusive and both absent while
/// the job is generating; the store's terminal writes are what populate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportJob {
    pub id: ReportJobId,
    pub posting_id: PostingId,
    pub state: ReportJobState,
    pub include_all: bool,
    pub notify_by_email: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ReportPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ReportJob {
    /// Fresh record in the initial state.
    pub fn generating(
        id: ReportJobId,
        posting_id: PostingId,
        include_all: bool,
        notify_by_email: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            posting_id,
            state: ReportJobState::Generating,
            include_all,
            notify_by_email,
            created_at,
            result: None,
            error_detail: None,
        }
    }
}

/// Durable keyed storage for report jobs.
///
/// Implementations must make terminal writes atomic with respect to readers
/// (a fetch sees either the generating record or the fully populated terminal
/// record) and reject a second terminal write for the same id.
pub trait ReportJobStore: Send + Sync {
    fn insert(&self, job: ReportJob) -> Result<(), StoreError>;
    fn fetch(&self, id: &ReportJobId) -> Result<Option<ReportJob>, StoreError>;
    fn complete(&self, id: &ReportJobId, payload: ReportPayload) -> Result<(), StoreError>;
    fn fail(&self, id: &ReportJobId, detail: String) -> Result<(), StoreError>;
}

/// Error enumeration for job-store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("report job already exists")]
    Conflict,
    #[error("report job not found")]
    NotFound,
    #[error("report job already reached a terminal state")]
    TerminalConflict,
    #[error("job store unavailable: {0}")]
    Unavailable(String),
}
