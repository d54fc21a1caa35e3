//! Asynchronous ranking-report generation.
//!
//! A report job is created for an eligible posting, assembled in a background
//! task from the scoring collaborator's candidates, and read back by pollers
//! until it reaches `COMPLETED` or `ERROR`. The store guarantees at-most-once
//! terminal writes; everything else here is layered on that contract.

pub mod assembler;
pub mod collaborators;
pub mod domain;
pub mod poller;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use assembler::{assemble, AssemblyError, DEFAULT_RANKING_LIMIT, TOP_DETAILED_LEN, TOP_TIER_SCORE};
pub use collaborators::{
    ArtifactRenderer, DispatchError, NotificationDispatcher, RenderError, ReportNotification,
    ScoreSource, ScoreSourceError,
};
pub use domain::{
    CandidateId, CandidateRanking, ComparativeEntry, ComparativeRow, ExecutiveSummary,
    RankingStatistics, ReportPayload, ScoredCandidate,
};
pub use poller::{JobStatusSource, PollError, PollPolicy, ReportPoller};
pub use router::report_router;
pub use service::{
    ArtifactError, CreateReportRequest, CreatedReportJob, ReportJobService, ReportServiceError,
};
pub use store::{ReportJob, ReportJobId, ReportJobState, ReportJobStore, StoreError};
