use chrono::{TimeZone, Utc};

use super::common::*;
use crate::postings::PostingStage;
use crate::reports::assembler::{assemble, AssemblyError, DEFAULT_RANKING_LIMIT, TOP_DETAILED_LEN};
use crate::reports::domain::CandidateId;

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).single().expect("valid timestamp")
}

fn assemble_pool(
    candidates: &[crate::reports::domain::ScoredCandidate],
    include_all: bool,
) -> crate::reports::domain::ReportPayload {
    let record = posting_record(PostingStage::Closed);
    assemble(record.posting, record.company, candidates, include_all, fixed_now())
        .expect("assembly succeeds")
}

#[test]
fn ranking_is_sorted_by_descending_score() {
    let mut pool = candidate_pool(8);
    pool.reverse();
    let payload = assemble_pool(&pool, true);

    let scores: Vec<f64> = payload.ranking.iter().map(|entry| entry.score).collect();
    let mut expected = scores.clone();
    expected.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(scores, expected);

    for (index, entry) in payload.ranking.iter().enumerate() {
        assert_eq!(entry.position, index as u32 + 1);
    }
}

#[test]
fn equal_scores_order_by_candidate_id_ascending() {
    let pool = vec![
        candidate(42, 88.0),
        candidate(7, 88.0),
        candidate(19, 88.0),
    ];
    let payload = assemble_pool(&pool, true);

    let ids: Vec<i64> = payload
        .ranking
        .iter()
        .map(|entry| entry.candidate_id.0)
        .collect();
    assert_eq!(ids, vec![7, 19, 42]);
}

#[test]
fn assembly_is_reproducible_for_identical_input() {
    let pool = candidate_pool(12);
    let first = assemble_pool(&pool, false);
    let second = assemble_pool(&pool, false);

    let first_json = serde_json::to_string(&first).expect("payload serializes");
    let second_json = serde_json::to_string(&second).expect("payload serializes");
    assert_eq!(first_json, second_json);
}

#[test]
fn top_detailed_is_a_prefix_of_the_ranking() {
    for count in [0usize, 1, 2, 3, 7] {
        let payload = assemble_pool(&candidate_pool(count), true);
        assert_eq!(payload.top_detailed.len(), count.min(TOP_DETAILED_LEN));
        for (detailed, ranked) in payload.top_detailed.iter().zip(payload.ranking.iter()) {
            assert_eq!(detailed.candidate_id, ranked.candidate_id);
            assert_eq!(detailed.position, ranked.position);
        }
    }
}

#[test]
fn default_selection_caps_ranking_and_statistics_at_ten() {
    let payload = assemble_pool(&candidate_pool(14), false);
    assert_eq!(payload.ranking.len(), DEFAULT_RANKING_LIMIT);
    assert_eq!(payload.statistics.total_candidates, DEFAULT_RANKING_LIMIT);
}

#[test]
fn include_all_covers_the_full_pool() {
    let payload = assemble_pool(&candidate_pool(14), true);
    assert_eq!(payload.ranking.len(), 14);
    assert_eq!(payload.statistics.total_candidates, 14);
}

#[test]
fn empty_pool_yields_a_valid_empty_report() {
    let payload = assemble_pool(&[], false);
    assert!(payload.ranking.is_empty());
    assert!(payload.top_detailed.is_empty());
    assert!(payload.comparative.is_empty());
    assert!(payload.executive_summary.is_none());
    assert_eq!(payload.statistics.total_candidates, 0);
    assert_eq!(payload.statistics.mean_score, 0.0);
    assert_eq!(payload.statistics.completion_rate_pct, 0.0);
}

#[test]
fn non_finite_score_is_rejected() {
    let mut pool = candidate_pool(3);
    pool[1].score = f64::NAN;
    let record = posting_record(PostingStage::Closed);

    let result = assemble(record.posting, record.company, &pool, true, fixed_now());
    assert!(matches!(
        result,
        Err(AssemblyError::NonFiniteScore(CandidateId(2)))
    ));
}

#[test]
fn duplicate_candidate_id_is_rejected() {
    let mut pool = candidate_pool(3);
    pool[2].id = pool[0].id;
    let record = posting_record(PostingStage::Closed);

    let result = assemble(record.posting, record.company, &pool, true, fixed_now());
    assert!(matches!(result, Err(AssemblyError::DuplicateCandidate(_))));
}

#[test]
fn statistics_reflect_threshold_and_completion() {
    let mut pool = vec![
        candidate(1, 92.0),
        candidate(2, 85.0),
        candidate(3, 60.0),
        candidate(4, 40.0),
    ];
    pool[3].answers = Vec::new();

    let payload = assemble_pool(&pool, true);
    let stats = &payload.statistics;
    assert_eq!(stats.total_candidates, 4);
    assert_eq!(stats.top_tier_count, 2);
    assert!((stats.mean_score - 69.25).abs() < 1e-9);
    assert!((stats.completion_rate_pct - 75.0).abs() < 1e-9);
}

#[test]
fn comparative_table_covers_only_the_detailed_top() {
    let payload = assemble_pool(&candidate_pool(6), true);
    assert_eq!(payload.comparative.len(), 3);
    for row in &payload.comparative {
        assert_eq!(row.entries.len(), TOP_DETAILED_LEN);
    }

    let overlap_row = payload
        .comparative
        .iter()
        .find(|row| row.criterion == "key skill overlap")
        .expect("overlap row present");
    // Fixture candidates carry rust + sql out of three required skills.
    assert!(overlap_row.entries.iter().all(|entry| entry.value == "2/3"));
}

#[test]
fn executive_summary_prefers_scoring_feedback() {
    let mut pool = candidate_pool(4);
    pool[0].feedback = Some("Deep ownership of distributed ingestion systems".to_string());

    let payload = assemble_pool(&pool, true);
    let summary = payload.executive_summary.expect("summary present");
    assert_eq!(summary.recommended_id, pool[0].id);
    assert_eq!(
        summary.primary_justification,
        "Deep ownership of distributed ingestion systems"
    );
    assert_eq!(summary.secondary_justifications, pool[0].strengths);
}

#[test]
fn executive_summary_falls_back_to_score_when_feedback_is_empty() {
    let pool = candidate_pool(2);
    let payload = assemble_pool(&pool, true);
    let summary = payload.executive_summary.expect("summary present");
    assert!(summary.primary_justification.contains("93.0"));
    assert!(summary.primary_justification.contains("2 evaluated candidates"));
}
