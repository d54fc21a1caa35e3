use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::postings::{
    CompanySnapshot, DirectoryError, PostingDirectory, PostingId, PostingRecord, PostingSnapshot,
    PostingStage,
};
use crate::reports::collaborators::{
    ArtifactRenderer, DispatchError, NotificationDispatcher, RenderError, ReportNotification,
    ScoreSource, ScoreSourceError,
};
use crate::reports::domain::{CandidateId, ReportPayload, ScoredCandidate};
use crate::reports::poller::{PollPolicy, ReportPoller};
use crate::reports::service::ReportJobService;
use crate::reports::store::{ReportJob, ReportJobId, ReportJobState, ReportJobStore, StoreError};

pub(super) const POSTING: PostingId = PostingId(101);

pub(super) fn posting_record(stage: PostingStage) -> PostingRecord {
    PostingRecord {
        posting: PostingSnapshot {
            id: POSTING,
            title: "Senior Backend Engineer".to_string(),
            stage,
            location: "Santiago".to_string(),
            required_skills: vec![
                "rust".to_string(),
                "sql".to_string(),
                "kubernetes".to_string(),
            ],
            description: "Own the ingestion pipeline and its storage layer.".to_string(),
        },
        company: CompanySnapshot {
            name: "Altiplano Analytics".to_string(),
            industry: "Data consulting".to_string(),
            contact_email: "talent@altiplano.example".to_string(),
        },
    }
}

pub(super) fn candidate(id: i64, score: f64) -> ScoredCandidate {
    ScoredCandidate {
        id: CandidateId(id),
        name: format!("Candidate {id}"),
        email: format!("candidate{id}@example.com"),
        score,
        feedback: None,
        resume_ref: Some(format!("s3://hirelens/resumes/{id}.pdf")),
        answers: vec!["Led the platform migration at my last role".to_string()],
        experience_years: 4.0,
        key_skills: vec!["rust".to_string(), "sql".to_string()],
        match_percentage: Some(score),
        strengths: vec!["clear communicator".to_string()],
        growth_areas: Vec::new(),
    }
}

pub(super) fn candidate_pool(count: usize) -> Vec<ScoredCandidate> {
    (1..=count as i64)
        .map(|id| candidate(id, 95.0 - id as f64 * 2.0))
        .collect()
}

/// Polls fast enough that tests finish in milliseconds while still leaving
/// room for the background task to run.
pub(super) fn fast_poller() -> ReportPoller {
    ReportPoller::new(PollPolicy {
        max_attempts: 200,
        interval: Duration::from_millis(2),
    })
}

#[derive(Default)]
pub(super) struct MemoryJobStore {
    records: Mutex<HashMap<ReportJobId, ReportJob>>,
}

impl MemoryJobStore {
    fn terminal_write(
        &self,
        id: &ReportJobId,
        apply: impl FnOnce(&mut ReportJob),
    ) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("job store mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        if record.state.is_terminal() {
            return Err(StoreError::TerminalConflict);
        }
        apply(record);
        Ok(())
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("job store mutex poisoned").len()
    }
}

impl ReportJobStore for MemoryJobStore {
    fn insert(&self, job: ReportJob) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("job store mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(job.id.clone(), job);
        Ok(())
    }

    fn fetch(&self, id: &ReportJobId) -> Result<Option<ReportJob>, StoreError> {
        let guard = self.records.lock().expect("job store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn complete(&self, id: &ReportJobId, payload: ReportPayload) -> Result<(), StoreError> {
        self.terminal_write(id, |record| {
            record.state = ReportJobState::Completed;
            record.result = Some(payload);
        })
    }

    fn fail(&self, id: &ReportJobId, detail: String) -> Result<(), StoreError> {
        self.terminal_write(id, |record| {
            record.state = ReportJobState::Error;
            record.error_detail = Some(detail);
        })
    }
}

pub(super) struct StubDirectory {
    records: HashMap<PostingId, PostingRecord>,
}

impl StubDirectory {
    pub(super) fn with_record(record: PostingRecord) -> Self {
        let mut records = HashMap::new();
        records.insert(record.posting.id, record);
        Self { records }
    }
}

impl PostingDirectory for StubDirectory {
    fn posting(&self, id: PostingId) -> Result<Option<PostingRecord>, DirectoryError> {
        Ok(self.records.get(&id).cloned())
    }
}

pub(super) struct StubScores {
    by_posting: HashMap<PostingId, Vec<ScoredCandidate>>,
    failure: Option<String>,
}

impl StubScores {
    pub(super) fn with_candidates(posting: PostingId, candidates: Vec<ScoredCandidate>) -> Self {
        let mut by_posting = HashMap::new();
        by_posting.insert(posting, candidates);
        Self {
            by_posting,
            failure: None,
        }
    }

    pub(super) fn failing(message: &str) -> Self {
        Self {
            by_posting: HashMap::new(),
            failure: Some(message.to_string()),
        }
    }
}

impl ScoreSource for StubScores {
    fn scored_candidates(
        &self,
        posting: PostingId,
    ) -> Result<Vec<ScoredCandidate>, ScoreSourceError> {
        if let Some(message) = &self.failure {
            return Err(ScoreSourceError::Unavailable(message.clone()));
        }
        Ok(self.by_posting.get(&posting).cloned().unwrap_or_default())
    }
}

pub(super) struct CountingRenderer {
    bytes: Vec<u8>,
    calls: AtomicUsize,
}

impl Default for CountingRenderer {
    fn default() -> Self {
        Self {
            bytes: b"%PDF-1.4 hirelens ranking report".to_vec(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl CountingRenderer {
    pub(super) fn empty() -> Self {
        Self {
            bytes: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArtifactRenderer for CountingRenderer {
    fn render(&self, _payload: &ReportPayload) -> Result<Vec<u8>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryDispatcher {
    sent: Mutex<Vec<ReportNotification>>,
    failing: bool,
}

impl MemoryDispatcher {
    pub(super) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub(super) fn sent(&self) -> Vec<ReportNotification> {
        self.sent.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn dispatch(&self, notification: ReportNotification) -> Result<(), DispatchError> {
        if self.failing {
            return Err(DispatchError::Transport("smtp refused".to_string()));
        }
        self.sent
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct Harness {
    pub(super) service: Arc<ReportJobService<MemoryJobStore>>,
    pub(super) store: Arc<MemoryJobStore>,
    pub(super) renderer: Arc<CountingRenderer>,
    pub(super) dispatcher: Arc<MemoryDispatcher>,
}

pub(super) fn harness(stage: PostingStage, candidates: Vec<ScoredCandidate>) -> Harness {
    harness_with(
        stage,
        StubScores::with_candidates(POSTING, candidates),
        CountingRenderer::default(),
        MemoryDispatcher::default(),
    )
}

pub(super) fn harness_with(
    stage: PostingStage,
    scores: StubScores,
    renderer: CountingRenderer,
    dispatcher: MemoryDispatcher,
) -> Harness {
    let store = Arc::new(MemoryJobStore::default());
    let renderer = Arc::new(renderer);
    let dispatcher = Arc::new(dispatcher);
    let service = Arc::new(ReportJobService::new(
        store.clone(),
        Arc::new(StubDirectory::with_record(posting_record(stage))),
        Arc::new(scores),
        renderer.clone(),
        dispatcher.clone(),
    ));

    Harness {
        service,
        store,
        renderer,
        dispatcher,
    }
}
