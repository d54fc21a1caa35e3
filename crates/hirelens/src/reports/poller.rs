//! Bounded polling for report completion.
//!
//! The server never pushes; the requester's side runs a fixed-interval loop
//! over status reads until the job turns terminal or the attempt budget is
//! spent. The loop is explicit and the interval injectable so tests can run
//! it with near-zero delay.

use std::time::Duration;

use super::domain::ReportPayload;
use super::service::{ReportJobService, ReportServiceError};
use super::store::{ReportJob, ReportJobId, ReportJobState, ReportJobStore};

/// Where the poller reads job status from. The service implements this
/// directly; tests substitute scripted sources.
pub trait JobStatusSource: Send + Sync {
    fn status(&self, id: &ReportJobId) -> Result<ReportJob, ReportServiceError>;
}

impl<S> JobStatusSource for ReportJobService<S>
where
    S: ReportJobStore + 'static,
{
    fn status(&self, id: &ReportJobId) -> Result<ReportJob, ReportServiceError> {
        self.job(id)
    }
}

/// Retry budget for one [`ReportPoller::await_completion`] call.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    /// 30 checks, 2 seconds apart: a 60 second worst-case client wait.
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_millis(2000),
        }
    }
}

/// Client-side poller. Owns no server state, only the retry policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPoller {
    policy: PollPolicy,
}

impl ReportPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Poll until the job turns terminal or the budget runs out.
    ///
    /// Performs at most `max_attempts` status checks, `interval` apart, with
    /// no sleep after the final check. A job in `ERROR` fails immediately;
    /// retrying a terminal failure adds no value.
    pub async fn await_completion(
        &self,
        source: &dyn JobStatusSource,
        id: &ReportJobId,
    ) -> Result<ReportPayload, PollError> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let job = source.status(id).map_err(|err| match err {
                ReportServiceError::JobNotFound => PollError::NotFound,
                other => PollError::Transport(other.to_string()),
            })?;

            match job.state {
                ReportJobState::Completed => {
                    return job.result.ok_or_else(|| {
                        PollError::Transport(
                            "completed job record is missing its payload".to_string(),
                        )
                    });
                }
                ReportJobState::Error => {
                    return Err(PollError::Generation {
                        detail: job
                            .error_detail
                            .unwrap_or_else(|| "unspecified generation failure".to_string()),
                    });
                }
                ReportJobState::Generating => {
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }

        Err(PollError::Timeout {
            attempts: max_attempts,
        })
    }
}

/// Failure modes of a polling run. `Timeout` means the job may still finish
/// later; `Generation` means it never will.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("report generation failed: {detail}")]
    Generation { detail: String },
    #[error("report still generating after {attempts} status checks")]
    Timeout { attempts: u32 },
    #[error("report job not found")]
    NotFound,
    #[error("status check failed: {0}")]
    Transport(String),
}
