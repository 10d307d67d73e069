mod attributes;
mod freshness;
mod skills;
mod weights;

pub use attributes::{score_attribute, AttributeKind, AttributeScore};
pub use freshness::{apply_job_freshness, freshness_from_posting};
pub use skills::{score_skill_overlap, SkillOverlap, SkillSummary};
pub use weights::{normalize_weights, NormalizedWeights};

use serde::Serialize;

use super::domain::{
    dedupe_requirements, CandidateId, CandidateRecord, CandidateSignal, CandidateSkill, JobId,
    JobRecord, SkillRequirement,
};
use super::explanation::{format_explanation, ExplanationInput};
use crate::workflows::guardrails::{GuardrailsConfig, ScoringWeights};

/// Number of reasons surfaced in `top_reasons`.
pub const TOP_REASON_LIMIT: usize = 5;

const NEUTRAL_SIGNAL_SCORE: u8 = 50;
const SIGNAL_UNAVAILABLE_REASON: &str =
    "Candidate engagement signals unavailable; treated as neutral";
const SIGNAL_UNAVAILABLE_RISK: &str = "No engagement history";

/// Round and clamp a raw score onto the 0-100 scale.
pub(crate) fn round_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Everything the composer needs for one (candidate, job) pair.
#[derive(Debug, Clone, Copy)]
pub struct MatchInputs<'a> {
    pub candidate: &'a CandidateRecord,
    pub job: &'a JobRecord,
    pub job_skills: &'a [SkillRequirement],
    pub candidate_skills: &'a [CandidateSkill],
    pub signal: Option<&'a CandidateSignal>,
    pub job_freshness: Option<u8>,
}

/// Itemized result of a single evaluation. Re-scoring produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub score: u8,
    pub skill_score: u8,
    pub seniority_score: u8,
    pub location_score: u8,
    pub candidate_signal_score: u8,
    pub candidate_signal_available: bool,
    pub job_freshness_score: Option<u8>,
    pub top_reasons: Vec<String>,
    pub all_reasons: Vec<String>,
    pub risk_areas: Vec<String>,
    pub missing_required_skills: bool,
    pub skill_summary: SkillSummary,
    pub explanation: String,
}

/// Stateless composer that applies the tenant's weights to the sub-scores.
#[derive(Debug, Clone)]
pub struct MatchScoreComposer {
    weights: NormalizedWeights,
}

impl MatchScoreComposer {
    pub fn new(weights: &ScoringWeights) -> Self {
        Self {
            weights: normalize_weights(weights),
        }
    }

    pub fn from_guardrails(config: &GuardrailsConfig) -> Self {
        Self::new(&config.scoring_weights)
    }

    pub fn weights(&self) -> &NormalizedWeights {
        &self.weights
    }

    pub fn compose(&self, inputs: &MatchInputs<'_>) -> MatchScore {
        let requirements = dedupe_requirements(inputs.job_skills);
        let skills = score_skill_overlap(&requirements, inputs.candidate_skills);
        let seniority = score_attribute(
            AttributeKind::Seniority,
            inputs.candidate.seniority.as_deref(),
            inputs.job.seniority.as_deref(),
        );
        let location = score_attribute(
            AttributeKind::Location,
            inputs.candidate.location.as_deref(),
            inputs.job.location.as_deref(),
        );

        let mut all_reasons = Vec::new();
        let mut risk_areas = Vec::new();
        for part_reasons in [skills.reasons, seniority.reasons, location.reasons] {
            all_reasons.extend(part_reasons);
        }
        for part_risks in [skills.risk_areas, seniority.risk_areas, location.risk_areas] {
            risk_areas.extend(part_risks);
        }

        let (signal_score, signal_available) = match inputs.signal {
            Some(signal) => {
                all_reasons.extend(signal.reasons.iter().cloned());
                (round_score(signal.score), true)
            }
            None => {
                all_reasons.push(SIGNAL_UNAVAILABLE_REASON.to_string());
                risk_areas.push(SIGNAL_UNAVAILABLE_RISK.to_string());
                (NEUTRAL_SIGNAL_SCORE, false)
            }
        };

        let weights = &self.weights;
        let base = round_score(
            f64::from(skills.score) * weights.skills
                + f64::from(seniority.score) * weights.seniority
                + f64::from(location.score) * weights.location
                + f64::from(signal_score) * weights.candidate_signals,
        );

        let job_freshness = inputs.job_freshness.map(|value| value.min(100));
        let (score, freshness_note) = apply_job_freshness(base, job_freshness);
        all_reasons.extend(freshness_note);

        let top_reasons: Vec<String> = all_reasons.iter().take(TOP_REASON_LIMIT).cloned().collect();
        let explanation = format_explanation(&ExplanationInput {
            top_reasons: &top_reasons,
            risk_areas: &risk_areas,
            skill_summary: &skills.summary,
            score,
        });

        MatchScore {
            candidate_id: inputs.candidate.id.clone(),
            job_id: inputs.job.id.clone(),
            score,
            skill_score: skills.score,
            seniority_score: seniority.score,
            location_score: location.score,
            candidate_signal_score: signal_score,
            candidate_signal_available: signal_available,
            job_freshness_score: job_freshness,
            top_reasons,
            all_reasons,
            risk_areas,
            missing_required_skills: skills.summary.missing_required(),
            skill_summary: skills.summary,
            explanation,
        }
    }
}
