use super::common::*;

use crate::workflows::guardrails::{default_guardrails, ScoringWeights};
use crate::workflows::matching::domain::{
    CandidateRecord, CandidateSignal, CandidateSkill, JobRecord, SkillRequirement,
};
use crate::workflows::matching::scoring::{MatchInputs, MatchScoreComposer, TOP_REASON_LIMIT};
use crate::workflows::matching::NO_RISKS_DETECTED;

fn composer() -> MatchScoreComposer {
    MatchScoreComposer::from_guardrails(&default_guardrails())
}

fn inputs<'a>(
    candidate: &'a CandidateRecord,
    job: &'a JobRecord,
    job_skills: &'a [SkillRequirement],
    candidate_skills: &'a [CandidateSkill],
    signal: Option<&'a CandidateSignal>,
) -> MatchInputs<'a> {
    MatchInputs {
        candidate,
        job,
        job_skills,
        candidate_skills,
        signal,
        job_freshness: None,
    }
}

#[test]
fn full_match_scores_every_component_at_the_top() {
    let candidate = candidate("cand-a", Some("senior"), Some("remote"));
    let job = job();
    let requirements = job_skills();
    let held = skills(&["React", "GraphQL", "Figma"]);
    let engagement = signal(80.0, "Replied to outreach within a day");

    let score = composer().compose(&inputs(
        &candidate,
        &job,
        &requirements,
        &held,
        Some(&engagement),
    ));

    assert_eq!(score.skill_score, 100);
    assert_eq!(score.seniority_score, 100);
    assert_eq!(score.location_score, 100);
    assert_eq!(score.candidate_signal_score, 80);
    assert!(score.candidate_signal_available);
    assert_eq!(score.score, 96);
    assert!(!score.missing_required_skills);
    assert!(score
        .all_reasons
        .contains(&"Seniority aligns: Senior".to_string()));
    assert!(score
        .all_reasons
        .contains(&"Replied to outreach within a day".to_string()));
    assert!(score.risk_areas.is_empty());
    assert!(score.explanation.contains(NO_RISKS_DETECTED));
    assert!(score.explanation.ends_with("Match score: 96/100"));
}

#[test]
fn missing_required_skill_is_flagged_as_risk() {
    let candidate = candidate("cand-b", Some("Mid"), Some("Remote"));
    let job = job();
    let requirements = job_skills();
    let held = skills(&["react"]);

    let score = composer().compose(&inputs(&candidate, &job, &requirements, &held, None));

    assert_eq!(score.skill_score, 50);
    assert_eq!(score.seniority_score, 0);
    assert!(score.missing_required_skills);
    assert_eq!(score.skill_summary.required_matched, 1);
    assert_eq!(score.skill_summary.required_total, 2);
    assert!(score
        .risk_areas
        .contains(&"Missing required skill: GraphQL".to_string()));
    assert!(score
        .risk_areas
        .contains(&"Seniority mismatch: candidate Mid, job Senior".to_string()));
    assert!(!score
        .risk_areas
        .iter()
        .any(|risk| risk.contains("Figma")));
    assert!(score
        .explanation
        .contains("Skills: 1/2 required skills matched; 0/1 preferred skills matched"));
}

#[test]
fn absent_signal_is_neutral_but_reported() {
    let candidate = candidate("cand-b", Some("Senior"), Some("Remote"));
    let job = job();
    let requirements = job_skills();
    let held = skills(&["React", "GraphQL"]);

    let score = composer().compose(&inputs(&candidate, &job, &requirements, &held, None));

    assert_eq!(score.candidate_signal_score, 50);
    assert!(!score.candidate_signal_available);
    assert!(score
        .all_reasons
        .contains(&"Candidate engagement signals unavailable; treated as neutral".to_string()));
    assert!(score
        .risk_areas
        .contains(&"No engagement history".to_string()));
}

#[test]
fn missing_attributes_score_neutral() {
    let candidate = candidate("cand-x", None, Some("  "));
    let job = job();
    let requirements = job_skills();
    let held = skills(&["React"]);

    let score = composer().compose(&inputs(&candidate, &job, &requirements, &held, None));

    assert_eq!(score.seniority_score, 50);
    assert_eq!(score.location_score, 50);
    assert!(score
        .risk_areas
        .contains(&"Seniority data missing".to_string()));
    assert!(score.risk_areas.contains(&"Location data missing".to_string()));
}

#[test]
fn identical_inputs_produce_identical_scores() {
    let candidate = candidate("cand-c", Some("Senior"), Some("Berlin"));
    let job = job();
    let requirements = job_skills();
    let held = skills(&["React", "graphql", "FIGMA"]);
    let engagement = signal(60.0, "Opened last two messages");
    let composer = composer();

    let first = composer.compose(&inputs(
        &candidate,
        &job,
        &requirements,
        &held,
        Some(&engagement),
    ));
    let second = composer.compose(&inputs(
        &candidate,
        &job,
        &requirements,
        &held,
        Some(&engagement),
    ));

    assert_eq!(first, second);
    assert_eq!(first.explanation, second.explanation);
    assert_eq!(first.score, 82);
}

#[test]
fn requirement_order_does_not_change_the_result() {
    let candidate = candidate("cand-c", Some("Senior"), Some("Remote"));
    let job = job();
    let held = skills(&["GraphQL"]);
    let forward = job_skills();
    let mut reversed = job_skills();
    reversed.reverse();

    let composer = composer();
    let a = composer.compose(&inputs(&candidate, &job, &forward, &held, None));
    let b = composer.compose(&inputs(&candidate, &job, &reversed, &held, None));

    assert_eq!(a, b);
}

#[test]
fn top_reasons_are_capped() {
    let candidate = candidate("cand-a", Some("Senior"), Some("Remote"));
    let job = job();
    let requirements: Vec<SkillRequirement> = ["Rust", "Go", "SQL", "Kafka", "Docker", "Terraform"]
        .into_iter()
        .map(SkillRequirement::preferred)
        .collect();
    let held = skills(&["Rust", "Go", "SQL"]);

    let score = composer().compose(&inputs(&candidate, &job, &requirements, &held, None));

    assert_eq!(score.top_reasons.len(), TOP_REASON_LIMIT);
    assert!(score.all_reasons.len() > TOP_REASON_LIMIT);
    assert_eq!(score.top_reasons[..], score.all_reasons[..TOP_REASON_LIMIT]);
}

#[test]
fn stale_job_pulls_the_score_down_with_a_note() {
    let candidate = candidate("cand-a", Some("Senior"), Some("Remote"));
    let job = job();
    let requirements = job_skills();
    let held = skills(&["React", "GraphQL", "Figma"]);
    let engagement = signal(80.0, "Replied to outreach within a day");

    let mut stale = inputs(&candidate, &job, &requirements, &held, Some(&engagement));
    stale.job_freshness = Some(20);
    let score = composer().compose(&stale);

    // 96 * 0.85 + 20 * 0.15 = 84.6
    assert_eq!(score.score, 85);
    assert_eq!(score.job_freshness_score, Some(20));
    assert!(score
        .all_reasons
        .contains(&"Job freshness 20/100 factored into overall score".to_string()));
}

#[test]
fn zero_weights_fall_back_to_equal_weighting() {
    let composer = MatchScoreComposer::new(&ScoringWeights {
        skills: 0.0,
        seniority: 0.0,
        location: 0.0,
        candidate_signals: 0.0,
    });
    let candidate = candidate("cand-a", Some("Senior"), Some("Berlin"));
    let job = job();
    let requirements = job_skills();
    let held = skills(&["React", "GraphQL", "Figma"]);
    let engagement = signal(40.0, "Slow to respond");

    let score = composer.compose(&inputs(
        &candidate,
        &job,
        &requirements,
        &held,
        Some(&engagement),
    ));

    // (100 + 100 + 0 + 40) / 4
    assert_eq!(score.score, 60);
    assert_eq!(composer.weights().skills, 0.25);
}

#[test]
fn job_without_skills_scores_zero_skill_overlap() {
    let candidate = candidate("cand-a", Some("Senior"), Some("Remote"));
    let job = job();
    let held = skills(&["React"]);

    let score = composer().compose(&inputs(&candidate, &job, &[], &held, None));

    assert_eq!(score.skill_score, 0);
    assert!(!score.missing_required_skills);
    assert!(score
        .explanation
        .contains("Skills: 0/0 required skills matched; 0/0 preferred skills matched"));
}
