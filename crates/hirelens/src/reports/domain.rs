use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::postings::{CompanySnapshot, PostingSnapshot};

/// Identifier of a candidate, unique within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub i64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate as delivered by the scoring collaborator.
///
/// The score and the derived fields (match percentage, strengths, growth
/// areas) come from the external AI evaluation; this crate never computes
/// them, only aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_ref: Option<String>,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub experience_years: f32,
    #[serde(default)]
    pub key_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub growth_areas: Vec<String>,
}

impl ScoredCandidate {
    /// Whether the candidate answered at least one screening question.
    pub fn has_responses(&self) -> bool {
        self.answers.iter().any(|answer| !answer.trim().is_empty())
    }
}

/// One candidate's entry in the ranked report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRanking {
    pub position: u32,
    pub candidate_id: CandidateId,
    pub name: String,
    pub email: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub growth_areas: Vec<String>,
}

impl CandidateRanking {
    pub(crate) fn from_candidate(candidate: &ScoredCandidate, position: u32) -> Self {
        Self {
            position,
            candidate_id: candidate.id,
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            score: candidate.score,
            feedback: candidate.feedback.clone(),
            resume_ref: candidate.resume_ref.clone(),
            match_percentage: candidate.match_percentage,
            strengths: candidate.strengths.clone(),
            growth_areas: candidate.growth_areas.clone(),
        }
    }
}

/// One cell of the criterion-by-criterion comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativeEntry {
    pub candidate_id: CandidateId,
    pub name: String,
    pub value: String,
}

/// One criterion row, covering only the detailed top candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativeRow {
    pub criterion: String,
    pub entries: Vec<ComparativeEntry>,
}

/// Recommendation block naming the best-ranked candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub recommended_id: CandidateId,
    pub recommended_name: String,
    pub primary_justification: String,
    #[serde(default)]
    pub secondary_justifications: Vec<String>,
}

/// Aggregate statistics over the considered candidate set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingStatistics {
    pub total_candidates: usize,
    pub mean_score: f64,
    pub top_tier_count: usize,
    pub completion_rate_pct: f64,
}

/// The full report produced for one completed job.
///
/// Posting and company are snapshots taken at generation time, so the report
/// stays stable even if the posting is edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPayload {
    pub posting: PostingSnapshot,
    pub company: CompanySnapshot,
    pub ranking: Vec<CandidateRanking>,
    pub top_detailed: Vec<CandidateRanking>,
    pub comparative: Vec<ComparativeRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<ExecutiveSummary>,
    pub statistics: RankingStatistics,
    pub generated_at: DateTime<Utc>,
}
