use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use hirelens::postings::{
    CompanySnapshot, DirectoryError, PostingDirectory, PostingId, PostingRecord, PostingSnapshot,
    PostingStage,
};
use hirelens::reports::{
    ArtifactRenderer, CandidateId, DispatchError, NotificationDispatcher, RenderError, ReportJob,
    ReportJobId, ReportJobState, ReportJobStore, ReportNotification, ReportPayload, ScoreSource,
    ScoreSourceError, ScoredCandidate, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded job table. Terminal writes replace the record under the
/// lock, so readers see either the generating record or the finished one.
#[derive(Default)]
pub(crate) struct InMemoryReportJobStore {
    records: Mutex<HashMap<ReportJobId, ReportJob>>,
}

impl InMemoryReportJobStore {
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
}

impl ReportJobStore for InMemoryReportJobStore {
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

/// Directory over a fixed set of postings, seeded for demos and local runs.
pub(crate) struct SeededPostingDirectory {
    records: HashMap<PostingId, PostingRecord>,
}

impl PostingDirectory for SeededPostingDirectory {
    fn posting(&self, id: PostingId) -> Result<Option<PostingRecord>, DirectoryError> {
        Ok(self.records.get(&id).cloned())
    }
}

/// Scoring source over a fixed candidate pool per posting.
pub(crate) struct SeededScoreSource {
    by_posting: HashMap<PostingId, Vec<ScoredCandidate>>,
}

impl ScoreSource for SeededScoreSource {
    fn scored_candidates(
        &self,
        posting: PostingId,
    ) -> Result<Vec<ScoredCandidate>, ScoreSourceError> {
        Ok(self.by_posting.get(&posting).cloned().unwrap_or_default())
    }
}

/// Stand-in for the external PDF engine: renders a deterministic plain-text
/// document so the artifact plumbing can be exercised without it.
pub(crate) struct TextArtifactRenderer;

impl ArtifactRenderer for TextArtifactRenderer {
    fn render(&self, payload: &ReportPayload) -> Result<Vec<u8>, RenderError> {
        let mut doc = String::new();
        doc.push_str(&format!(
            "RANKING REPORT\nposting: {} ({})\ncompany: {}\ngenerated: {}\n\n",
            payload.posting.title,
            payload.posting.id,
            payload.company.name,
            payload.generated_at.to_rfc3339(),
        ));
        for entry in &payload.ranking {
            doc.push_str(&format!(
                "{:>3}. {:<28} {:>6.1}  {}\n",
                entry.position, entry.name, entry.score, entry.email
            ));
        }
        doc.push_str(&format!(
            "\ncandidates: {}  mean score: {:.1}  top tier: {}  completion: {:.0}%\n",
            payload.statistics.total_candidates,
            payload.statistics.mean_score,
            payload.statistics.top_tier_count,
            payload.statistics.completion_rate_pct,
        ));
        if let Some(summary) = &payload.executive_summary {
            doc.push_str(&format!(
                "\nrecommended: {} - {}\n",
                summary.recommended_name, summary.primary_justification
            ));
        }
        Ok(doc.into_bytes())
    }
}

/// Records dispatches and logs them; local runs have no SMTP transport.
#[derive(Default)]
pub(crate) struct LoggingNotificationDispatcher {
    sent: Mutex<Vec<ReportNotification>>,
}

impl LoggingNotificationDispatcher {
    pub(crate) fn sent(&self) -> Vec<ReportNotification> {
        self.sent.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl NotificationDispatcher for LoggingNotificationDispatcher {
    fn dispatch(&self, notification: ReportNotification) -> Result<(), DispatchError> {
        info!(
            job_id = %notification.job_id,
            recipient = %notification.recipient,
            artifact = %notification.artifact_ref,
            "report notification dispatched"
        );
        self.sent
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notification);
        Ok(())
    }
}

fn posting(
    id: i64,
    title: &str,
    stage: PostingStage,
    location: &str,
    skills: &[&str],
) -> PostingRecord {
    PostingRecord {
        posting: PostingSnapshot {
            id: PostingId(id),
            title: title.to_string(),
            stage,
            location: location.to_string(),
            required_skills: skills.iter().map(|skill| skill.to_string()).collect(),
            description: format!("{title} opening sourced from the recruitment platform."),
        },
        company: CompanySnapshot {
            name: "Altiplano Analytics".to_string(),
            industry: "Data consulting".to_string(),
            contact_email: "talent@altiplano.example".to_string(),
        },
    }
}

fn scored(
    id: i64,
    name: &str,
    score: f64,
    experience_years: f32,
    skills: &[&str],
    feedback: &str,
) -> ScoredCandidate {
    ScoredCandidate {
        id: CandidateId(id),
        name: name.to_string(),
        email: format!(
            "{}@applicants.example",
            name.to_ascii_lowercase().replace(' ', ".")
        ),
        score,
        feedback: (!feedback.is_empty()).then(|| feedback.to_string()),
        resume_ref: Some(format!("s3://hirelens/resumes/{id}.pdf")),
        answers: vec!["Completed the screening questionnaire".to_string()],
        experience_years,
        key_skills: skills.iter().map(|skill| skill.to_string()).collect(),
        match_percentage: Some(score),
        strengths: vec!["ownership".to_string(), "mentoring".to_string()],
        growth_areas: vec!["delegation".to_string()],
    }
}

/// Demo data: a closed posting with a full candidate pool, an in-process
/// posting with a small one, and a draft posting that is ineligible.
pub(crate) fn seeded_directory() -> SeededPostingDirectory {
    let mut records = HashMap::new();
    for record in [
        posting(
            101,
            "Senior Backend Engineer",
            PostingStage::Closed,
            "Santiago",
            &["rust", "sql", "kubernetes"],
        ),
        posting(
            102,
            "Data Analyst",
            PostingStage::InProcess,
            "Remote",
            &["sql", "python"],
        ),
        posting(
            103,
            "Product Designer",
            PostingStage::Draft,
            "Santiago",
            &["figma"],
        ),
    ] {
        records.insert(record.posting.id, record);
    }
    SeededPostingDirectory { records }
}

pub(crate) fn seeded_scores() -> SeededScoreSource {
    let mut by_posting = HashMap::new();

    let backend = vec![
        scored(
            1,
            "Ana Rojas",
            91.5,
            8.0,
            &["rust", "sql", "kubernetes"],
            "Strong systems background with production Rust services",
        ),
        scored(2, "Bruno Silva", 88.0, 6.5, &["rust", "sql"], ""),
        scored(
            3,
            "Carla Mendez",
            88.0,
            5.0,
            &["sql", "kubernetes"],
            "Solid platform experience, lighter on Rust",
        ),
        scored(4, "Diego Fuentes", 84.5, 7.0, &["rust"], ""),
        scored(5, "Elena Paredes", 82.0, 4.5, &["sql"], ""),
        scored(6, "Felipe Castro", 79.0, 3.0, &["rust", "sql"], ""),
        scored(7, "Gabriela Soto", 76.5, 5.5, &["kubernetes"], ""),
        scored(8, "Hector Vidal", 74.0, 2.0, &["sql"], ""),
        scored(9, "Isabel Munoz", 71.0, 4.0, &["rust"], ""),
        scored(10, "Javier Leon", 68.5, 3.5, &[], ""),
        scored(11, "Karina Diaz", 65.0, 1.5, &["sql"], ""),
        scored(12, "Luis Herrera", 61.0, 2.5, &[], ""),
    ];
    by_posting.insert(PostingId(101), backend);

    let analyst = vec![
        scored(
            21,
            "Marta Nunez",
            86.0,
            4.0,
            &["sql", "python"],
            "Excellent exploratory analysis portfolio",
        ),
        scored(22, "Nicolas Vega", 80.5, 3.0, &["sql"], ""),
        scored(23, "Olivia Ramos", 77.0, 2.0, &["python"], ""),
        scored(24, "Pablo Torres", 70.0, 1.0, &[], ""),
    ];
    by_posting.insert(PostingId(102), analyst);

    SeededScoreSource { by_posting }
}
