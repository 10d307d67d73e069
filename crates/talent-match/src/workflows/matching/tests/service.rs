use std::collections::BTreeSet;

use tokio_util::sync::CancellationToken;

use super::common::*;

use crate::config::KillSwitchConfig;
use crate::workflows::guardrails::{GuardrailsError, ShortlistStrategy, TenantMode};
use crate::workflows::matching::domain::{ConfidenceBand, JobId};
use crate::workflows::matching::repository::DirectoryError;
use crate::workflows::matching::{MatchingServiceError, MATCH_SCORING_AGENT, SHORTLIST_AGENT};

fn shortlisted(evaluation: &crate::workflows::matching::JobEvaluation) -> Vec<&str> {
    evaluation
        .shortlist
        .shortlisted_candidate_ids
        .iter()
        .map(|id| id.0.as_str())
        .collect()
}

#[test]
fn production_tenant_gets_quality_shortlist() {
    let (service, _) = build_service();

    let evaluation = service
        .evaluate_job(
            &tenant(DEFAULT_TENANT),
            &job_id(),
            &all_candidates(),
            evaluation_date(),
            &CancellationToken::new(),
        )
        .expect("evaluation succeeds");

    assert_eq!(evaluation.guardrails.mode, TenantMode::Production);
    assert!(!evaluation.guardrails.fire_drill_applied);
    assert_eq!(evaluation.scores.len(), 4);
    assert_eq!(shortlisted(&evaluation), vec!["cand-a", "cand-c", "cand-b"]);
    assert_eq!(evaluation.shortlist.cutoff_score, Some(53));
    assert!(evaluation
        .shortlist
        .notes
        .contains(&"1 candidate(s) below score floor 50".to_string()));
    assert_eq!(
        evaluation.shortlist.entries[0].confidence_band,
        Some(ConfidenceBand::High)
    );
    assert_eq!(
        evaluation.shortlist.entries[2].confidence_band,
        Some(ConfidenceBand::Low)
    );
}

#[test]
fn fresh_posting_lifts_scores_through_the_blend() {
    let (service, _) = build_service();
    let guardrails = service
        .resolve_guardrails(&tenant(DEFAULT_TENANT))
        .expect("guardrails resolve");

    let score = service
        .compute_match_score(
            &candidate_id("cand-a"),
            &job_id(),
            &guardrails,
            evaluation_date(),
        )
        .expect("score computed");

    // Posted five days before evaluation: 96 * 0.85 + 100 * 0.15.
    assert_eq!(score.job_freshness_score, Some(100));
    assert_eq!(score.score, 97);
}

#[test]
fn fire_drill_tightens_the_shortlist() {
    let (service, _) = build_service();

    let evaluation = service
        .evaluate_job(
            &tenant(DRILL_TENANT),
            &job_id(),
            &all_candidates(),
            evaluation_date(),
            &CancellationToken::new(),
        )
        .expect("evaluation succeeds");

    let config = &evaluation.guardrails.config;
    assert!(evaluation.guardrails.fire_drill_applied);
    assert_eq!(config.shortlist_strategy, ShortlistStrategy::Strict);
    assert!(config.safety.require_must_haves);
    assert_eq!(shortlisted(&evaluation), vec!["cand-a", "cand-c"]);
    assert!(evaluation
        .shortlist
        .notes
        .contains(&"2 candidate(s) below score floor 70".to_string()));
}

#[test]
fn forced_fire_drill_applies_to_production_tenants() {
    let kill_switches = KillSwitchConfig {
        disabled_agents: BTreeSet::new(),
        force_fire_drill: true,
    };
    let (service, _) = build_service_with(signals(), kill_switches);

    let guardrails = service
        .resolve_guardrails(&tenant(DEFAULT_TENANT))
        .expect("guardrails resolve");

    assert!(guardrails.fire_drill_applied);
    assert_eq!(guardrails.mode, TenantMode::Production);
    assert!(guardrails.config.thresholds.min_match_score >= 0.7);
}

#[test]
fn maintenance_mode_pauses_agents() {
    let (service, _) = build_service();

    let error = service
        .evaluate_job(
            &tenant(PAUSED_TENANT),
            &job_id(),
            &all_candidates(),
            evaluation_date(),
            &CancellationToken::new(),
        )
        .expect_err("maintenance pauses automation");

    assert!(matches!(
        error,
        MatchingServiceError::AgentPaused {
            mode: TenantMode::Maintenance,
            ..
        }
    ));
}

#[test]
fn tenant_flag_disables_shortlist_agent() {
    let (service, flags) = build_service();
    flags.disable(SHORTLIST_AGENT, DEFAULT_TENANT);

    let error = service
        .evaluate_job(
            &tenant(DEFAULT_TENANT),
            &job_id(),
            &all_candidates(),
            evaluation_date(),
            &CancellationToken::new(),
        )
        .expect_err("agent disabled");

    match error {
        MatchingServiceError::AgentDisabled { agent, tenant } => {
            assert_eq!(agent, SHORTLIST_AGENT);
            assert_eq!(tenant.0, DEFAULT_TENANT);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let guardrails = service
        .resolve_guardrails(&tenant(DEFAULT_TENANT))
        .expect("guardrails resolve");
    assert!(service
        .compute_match_score(
            &candidate_id("cand-a"),
            &job_id(),
            &guardrails,
            evaluation_date()
        )
        .is_ok());
}

#[test]
fn environment_kill_switch_disables_scoring_everywhere() {
    let kill_switches = KillSwitchConfig {
        disabled_agents: BTreeSet::from([MATCH_SCORING_AGENT.to_string()]),
        force_fire_drill: false,
    };
    let (service, _) = build_service_with(signals(), kill_switches);
    let guardrails = service
        .resolve_guardrails(&tenant(DEFAULT_TENANT))
        .expect("guardrails resolve");

    let error = service
        .compute_match_score(
            &candidate_id("cand-a"),
            &job_id(),
            &guardrails,
            evaluation_date(),
        )
        .expect_err("scoring disabled");

    assert!(matches!(error, MatchingServiceError::AgentDisabled { .. }));
}

#[test]
fn unknown_candidates_are_skipped_and_duplicates_scored_once() {
    let (service, _) = build_service();
    let candidates = vec![
        candidate_id("cand-a"),
        candidate_id("ghost"),
        candidate_id("cand-a"),
        candidate_id("cand-b"),
    ];

    let evaluation = service
        .evaluate_job(
            &tenant(DEFAULT_TENANT),
            &job_id(),
            &candidates,
            evaluation_date(),
            &CancellationToken::new(),
        )
        .expect("evaluation succeeds");

    assert_eq!(evaluation.scores.len(), 2);
    assert_eq!(evaluation.skipped_candidates, vec![candidate_id("ghost")]);
}

#[test]
fn failing_signal_scorer_is_treated_as_absent() {
    let (service, _) = build_service_with(signals().failing_for("cand-a"), KillSwitchConfig::default());
    let guardrails = service
        .resolve_guardrails(&tenant(DEFAULT_TENANT))
        .expect("guardrails resolve");

    let score = service
        .compute_match_score(
            &candidate_id("cand-a"),
            &job_id(),
            &guardrails,
            evaluation_date(),
        )
        .expect("score computed without signal");

    assert!(!score.candidate_signal_available);
    assert_eq!(score.candidate_signal_score, 50);
}

#[test]
fn cancelled_batch_stops_before_scoring() {
    let (service, _) = build_service();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = service
        .evaluate_job(
            &tenant(DEFAULT_TENANT),
            &job_id(),
            &all_candidates(),
            evaluation_date(),
            &cancel,
        )
        .expect_err("cancelled");

    assert!(matches!(error, MatchingServiceError::Cancelled { scored: 0 }));
}

#[test]
fn missing_job_and_tenant_are_reported() {
    let (service, _) = build_service();

    let missing_job = service
        .evaluate_job(
            &tenant(DEFAULT_TENANT),
            &JobId("job-unknown".to_string()),
            &all_candidates(),
            evaluation_date(),
            &CancellationToken::new(),
        )
        .expect_err("job missing");
    assert!(matches!(
        missing_job,
        MatchingServiceError::Directory(DirectoryError::JobNotFound(_))
    ));

    let missing_tenant = service
        .resolve_guardrails(&tenant("nobody"))
        .expect_err("tenant missing");
    assert!(matches!(
        missing_tenant,
        MatchingServiceError::Guardrails(GuardrailsError::TenantNotFound(_))
    ));
}

#[test]
fn single_candidate_lookup_fails_for_unknown_candidate() {
    let (service, _) = build_service();
    let guardrails = service
        .resolve_guardrails(&tenant(DEFAULT_TENANT))
        .expect("guardrails resolve");

    let error = service
        .compute_match_score(
            &candidate_id("ghost"),
            &job_id(),
            &guardrails,
            evaluation_date(),
        )
        .expect_err("candidate missing");

    assert!(matches!(
        error,
        MatchingServiceError::Directory(DirectoryError::CandidateNotFound(_))
    ));
}

#[test]
fn build_shortlist_respects_agent_gate() {
    let (service, flags) = build_service();
    let guardrails = service
        .resolve_guardrails(&tenant(DEFAULT_TENANT))
        .expect("guardrails resolve");

    let result = service
        .build_shortlist(&job_id(), &[], &guardrails)
        .expect("shortlist built");
    assert!(result.shortlisted_candidate_ids.is_empty());

    flags.disable(SHORTLIST_AGENT, DEFAULT_TENANT);
    assert!(service
        .build_shortlist(&job_id(), &[], &guardrails)
        .is_err());
}
