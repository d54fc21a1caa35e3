//! Pure assembly of a ranked report from an already-scored candidate set.
//!
//! No I/O happens here. The generation timestamp is injected by the caller so
//! that assembling the same inputs twice yields an identical payload.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::postings::{CompanySnapshot, PostingSnapshot};

use super::domain::{
    CandidateId, CandidateRanking, ComparativeEntry, ComparativeRow, ExecutiveSummary,
    RankingStatistics, ReportPayload, ScoredCandidate,
};

/// Scores strictly above this mark count as top-tier in the statistics block.
pub const TOP_TIER_SCORE: f64 = 80.0;

/// Ranking and statistics cover at most this many candidates unless the job
/// asked for all of them.
pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// Number of candidates broken out with full detail and comparison rows.
pub const TOP_DETAILED_LEN: usize = 3;

/// Rejected input to [`assemble`].
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("candidate {0} carries a non-finite score")]
    NonFiniteScore(CandidateId),
    #[error("candidate {0} appears more than once in the scored set")]
    DuplicateCandidate(CandidateId),
}

/// Build the full report payload for one posting.
///
/// Candidates are ordered by descending score, ties broken by ascending
/// candidate id so regeneration from the same inputs is reproducible. With
/// `include_all` unset, the persisted ranking and the statistics only cover
/// the top [`DEFAULT_RANKING_LIMIT`] candidates; the detailed top
/// [`TOP_DETAILED_LEN`] is global either way. An empty candidate set is a
/// valid report, not an error.
pub fn assemble(
    posting: PostingSnapshot,
    company: CompanySnapshot,
    candidates: &[ScoredCandidate],
    include_all: bool,
    generated_at: DateTime<Utc>,
) -> Result<ReportPayload, AssemblyError> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.score.is_finite() {
            return Err(AssemblyError::NonFiniteScore(candidate.id));
        }
        if !seen.insert(candidate.id) {
            return Err(AssemblyError::DuplicateCandidate(candidate.id));
        }
    }

    let mut sorted: Vec<&ScoredCandidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));

    let considered: &[&ScoredCandidate] = if include_all {
        &sorted
    } else {
        &sorted[..sorted.len().min(DEFAULT_RANKING_LIMIT)]
    };

    let ranking = considered
        .iter()
        .enumerate()
        .map(|(index, candidate)| CandidateRanking::from_candidate(candidate, index as u32 + 1))
        .collect();

    let top = &sorted[..sorted.len().min(TOP_DETAILED_LEN)];
    let top_detailed: Vec<CandidateRanking> = top
        .iter()
        .enumerate()
        .map(|(index, candidate)| CandidateRanking::from_candidate(candidate, index as u32 + 1))
        .collect();

    let comparative = comparative_rows(top, &posting);
    let executive_summary = top.first().map(|best| summarize(best, considered.len()));
    let statistics = statistics_for(considered);

    Ok(ReportPayload {
        posting,
        company,
        ranking,
        top_detailed,
        comparative,
        executive_summary,
        statistics,
        generated_at,
    })
}

fn statistics_for(considered: &[&ScoredCandidate]) -> RankingStatistics {
    if considered.is_empty() {
        return RankingStatistics::default();
    }

    let total = considered.len();
    let score_sum: f64 = considered.iter().map(|candidate| candidate.score).sum();
    let top_tier_count = considered
        .iter()
        .filter(|candidate| candidate.score > TOP_TIER_SCORE)
        .count();
    let answered = considered
        .iter()
        .filter(|candidate| candidate.has_responses())
        .count();

    RankingStatistics {
        total_candidates: total,
        mean_score: score_sum / total as f64,
        top_tier_count,
        completion_rate_pct: answered as f64 * 100.0 / total as f64,
    }
}

fn comparative_rows(top: &[&ScoredCandidate], posting: &PostingSnapshot) -> Vec<ComparativeRow> {
    if top.is_empty() {
        return Vec::new();
    }

    let row = |criterion: &str, value: &dyn Fn(&ScoredCandidate) -> String| ComparativeRow {
        criterion: criterion.to_string(),
        entries: top
            .iter()
            .map(|candidate| ComparativeEntry {
                candidate_id: candidate.id,
                name: candidate.name.clone(),
                value: value(candidate),
            })
            .collect(),
    };

    vec![
        row("suitability score", &|candidate| {
            format!("{:.1}", candidate.score)
        }),
        row("experience years", &|candidate| {
            format!("{:.1}", candidate.experience_years)
        }),
        row("key skill overlap", &|candidate| {
            format!(
                "{}/{}",
                skill_overlap(candidate, posting),
                posting.required_skills.len()
            )
        }),
    ]
}

fn skill_overlap(candidate: &ScoredCandidate, posting: &PostingSnapshot) -> usize {
    posting
        .required_skills
        .iter()
        .filter(|required| {
            candidate
                .key_skills
                .iter()
                .any(|skill| skill.eq_ignore_ascii_case(required))
        })
        .count()
}

fn summarize(best: &ScoredCandidate, pool_size: usize) -> ExecutiveSummary {
    let primary_justification = match best.feedback.as_deref() {
        Some(feedback) if !feedback.trim().is_empty() => feedback.trim().to_string(),
        _ => format!(
            "Highest suitability score ({:.1}) among {} evaluated candidates",
            best.score, pool_size
        ),
    };

    ExecutiveSummary {
        recommended_id: best.id,
        recommended_name: best.name.clone(),
        primary_justification,
        secondary_justifications: best.strengths.clone(),
    }
}
