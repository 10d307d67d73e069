use std::cmp::Ordering;

use super::CandidateScore;
use crate::workflows::guardrails::{GuardrailsConfig, ShortlistStrategy};

pub(super) const CONFIDENCE_UNAVAILABLE: &str = "confidence unavailable; using match score only";
pub(super) const MUST_HAVES_SUPPRESSED: &str = "must-have check suppressed by broad strategy";

/// Filter and order candidates with the handler for the configured strategy.
pub(super) fn run_strategy(
    candidates: Vec<CandidateScore>,
    config: &GuardrailsConfig,
    notes: &mut Vec<String>,
) -> Vec<CandidateScore> {
    match config.shortlist_strategy {
        ShortlistStrategy::Strict => strict(candidates, config, notes),
        ShortlistStrategy::Quality => quality(candidates, config, notes),
        ShortlistStrategy::Broad => broad(candidates, config, notes),
    }
}

fn strict(
    candidates: Vec<CandidateScore>,
    config: &GuardrailsConfig,
    notes: &mut Vec<String>,
) -> Vec<CandidateScore> {
    let mut eligible = apply_score_floor(candidates, config, notes);
    if config.safety.require_must_haves {
        eligible = apply_must_haves(eligible, notes);
    }
    eligible.sort_by(by_score_then_id);
    eligible
}

/// Equal scores prefer the more confident candidate before falling back to id.
/// The band preference is narrowed from "within 1 point" to exactly equal scores
/// so the shortlist stays non-increasing in score.
fn quality(
    candidates: Vec<CandidateScore>,
    config: &GuardrailsConfig,
    notes: &mut Vec<String>,
) -> Vec<CandidateScore> {
    let mut eligible = apply_score_floor(candidates, config, notes);
    if config.safety.require_must_haves {
        eligible = apply_must_haves(eligible, notes);
    }

    if eligible
        .iter()
        .any(|candidate| candidate.confidence_band.is_none())
    {
        notes.push(CONFIDENCE_UNAVAILABLE.to_string());
        eligible.sort_by(by_score_then_id);
    } else {
        eligible.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| band_rank(a).cmp(&band_rank(b)))
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });
    }
    eligible
}

fn broad(
    candidates: Vec<CandidateScore>,
    config: &GuardrailsConfig,
    notes: &mut Vec<String>,
) -> Vec<CandidateScore> {
    let mut eligible = apply_score_floor(candidates, config, notes);
    if config.safety.require_must_haves {
        notes.push(MUST_HAVES_SUPPRESSED.to_string());
    }
    eligible.sort_by(by_score_then_id);
    eligible
}

fn apply_score_floor(
    candidates: Vec<CandidateScore>,
    config: &GuardrailsConfig,
    notes: &mut Vec<String>,
) -> Vec<CandidateScore> {
    let thresholds = &config.thresholds;
    let floor = thresholds.shortlist_floor();
    if thresholds.shortlist_min_score.is_none() {
        notes.push(format!(
            "shortlistMinScore unset; using minMatchScore floor {floor:.0}"
        ));
    }

    let before = candidates.len();
    let eligible: Vec<CandidateScore> = candidates
        .into_iter()
        .filter(|candidate| f64::from(candidate.score) >= floor)
        .collect();

    let excluded = before - eligible.len();
    if excluded > 0 {
        notes.push(format!("{excluded} candidate(s) below score floor {floor:.0}"));
    }
    eligible
}

fn apply_must_haves(candidates: Vec<CandidateScore>, notes: &mut Vec<String>) -> Vec<CandidateScore> {
    let before = candidates.len();
    let eligible: Vec<CandidateScore> = candidates
        .into_iter()
        .filter(|candidate| !candidate.missing_required_skills)
        .collect();

    let excluded = before - eligible.len();
    if excluded > 0 {
        notes.push(format!("{excluded} candidate(s) missing required skills"));
    }
    eligible
}

fn by_score_then_id(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

fn band_rank(candidate: &CandidateScore) -> u8 {
    candidate
        .confidence_band
        .map(|band| band.rank())
        .unwrap_or(u8::MAX)
}
