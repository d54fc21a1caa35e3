use super::common::*;
use crate::postings::PostingStage;
use crate::reports::service::{ArtifactError, CreateReportRequest};
use crate::reports::store::ReportJobId;

fn create_request() -> CreateReportRequest {
    CreateReportRequest {
        posting_id: POSTING,
        include_all: false,
        notify_by_email: false,
    }
}

#[tokio::test]
async fn artifact_requires_a_completed_job() {
    let harness = harness_with(
        PostingStage::Closed,
        StubScores::failing("scoring backend offline"),
        CountingRenderer::default(),
        MemoryDispatcher::default(),
    );
    let created = harness
        .service
        .create_job(create_request())
        .expect("job is created");

    // Job record still generating (or failed): either way, no artifact.
    match harness.service.fetch_artifact(&created.job_id) {
        Err(ArtifactError::NotReady { .. }) => {}
        other => panic!("expected not-ready precondition, got {other:?}"),
    }
    assert_eq!(harness.renderer.calls(), 0);
}

#[tokio::test]
async fn repeated_fetches_return_identical_bytes_and_render_once() {
    let harness = harness(PostingStage::Closed, candidate_pool(4));
    let created = harness
        .service
        .create_job(create_request())
        .expect("job is created");
    fast_poller()
        .await_completion(harness.service.as_ref(), &created.job_id)
        .await
        .expect("job completes");

    let first = harness
        .service
        .fetch_artifact(&created.job_id)
        .expect("first fetch renders");
    let second = harness
        .service
        .fetch_artifact(&created.job_id)
        .expect("second fetch hits the cache");

    assert_eq!(first, second);
    assert!(!first.is_empty());
    assert_eq!(harness.renderer.calls(), 1);
}

#[tokio::test]
async fn empty_render_output_is_reported_as_corrupt() {
    let harness = harness_with(
        PostingStage::Closed,
        StubScores::with_candidates(POSTING, candidate_pool(4)),
        CountingRenderer::empty(),
        MemoryDispatcher::default(),
    );
    let created = harness
        .service
        .create_job(create_request())
        .expect("job is created");
    fast_poller()
        .await_completion(harness.service.as_ref(), &created.job_id)
        .await
        .expect("job completes");

    let result = harness.service.fetch_artifact(&created.job_id);
    assert!(matches!(result, Err(ArtifactError::Corrupt)));
}

#[tokio::test]
async fn unknown_job_has_no_artifact() {
    let harness = harness(PostingStage::Closed, candidate_pool(4));
    let result = harness
        .service
        .fetch_artifact(&ReportJobId("report-unknown".to_string()));
    assert!(matches!(result, Err(ArtifactError::JobNotFound)));
}
