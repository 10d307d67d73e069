use serde::Serialize;

use crate::workflows::guardrails::ScoringWeights;

/// Scoring weights rescaled to sum to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedWeights {
    pub skills: f64,
    pub seniority: f64,
    pub location: f64,
    pub candidate_signals: f64,
}

impl NormalizedWeights {
    pub const EQUAL: NormalizedWeights = NormalizedWeights {
        skills: 0.25,
        seniority: 0.25,
        location: 0.25,
        candidate_signals: 0.25,
    };

    pub fn sum(&self) -> f64 {
        self.skills + self.seniority + self.location + self.candidate_signals
    }
}

/// Divide each weight by the total. Negative or non-finite weights count as zero,
/// and an all-zero configuration falls back to equal quarters.
pub fn normalize_weights(weights: &ScoringWeights) -> NormalizedWeights {
    let sanitize = |value: f64| if value.is_finite() && value > 0.0 { value } else { 0.0 };
    let skills = sanitize(weights.skills);
    let seniority = sanitize(weights.seniority);
    let location = sanitize(weights.location);
    let candidate_signals = sanitize(weights.candidate_signals);

    let total = skills + seniority + location + candidate_signals;
    if total <= 0.0 || !total.is_finite() {
        return NormalizedWeights::EQUAL;
    }

    NormalizedWeights {
        skills: skills / total,
        seniority: seniority / total,
        location: location / total,
        candidate_signals: candidate_signals / total,
    }
}
