use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for tenants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operating mode a tenant admin has placed the tenant in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantMode {
    Sandbox,
    Pilot,
    Production,
    Maintenance,
    FireDrill,
}

impl TenantMode {
    pub const fn label(self) -> &'static str {
        match self {
            TenantMode::Sandbox => "sandbox",
            TenantMode::Pilot => "pilot",
            TenantMode::Production => "production",
            TenantMode::Maintenance => "maintenance",
            TenantMode::FireDrill => "fire_drill",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sandbox" => Some(TenantMode::Sandbox),
            "pilot" => Some(TenantMode::Pilot),
            "production" | "prod" => Some(TenantMode::Production),
            "maintenance" => Some(TenantMode::Maintenance),
            "fire_drill" | "firedrill" => Some(TenantMode::FireDrill),
            _ => None,
        }
    }

    /// Maintenance pauses every agent; the other modes keep match and shortlist agents running.
    pub const fn allows_automation(self) -> bool {
        !matches!(self, TenantMode::Maintenance)
    }
}

impl fmt::Display for TenantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shortlist filtering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortlistStrategy {
    Quality,
    Strict,
    Broad,
}

impl ShortlistStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            ShortlistStrategy::Quality => "quality",
            ShortlistStrategy::Strict => "strict",
            ShortlistStrategy::Broad => "broad",
        }
    }

    /// Unknown values resolve to `Quality`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => ShortlistStrategy::Strict,
            "broad" => ShortlistStrategy::Broad,
            _ => ShortlistStrategy::Quality,
        }
    }

    pub fn is_known_label(value: &str) -> bool {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "quality" | "strict" | "broad"
        )
    }
}

/// Relative importance of each sub-score. Normalized at scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub seniority: f64,
    pub location: f64,
    pub candidate_signals: f64,
}

/// Score floors and the shortlist size ceiling.
///
/// `min_match_score` is a fraction of the 0-100 score scale while
/// `shortlist_min_score` is expressed directly on that scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_match_score: f64,
    pub shortlist_min_score: Option<f64>,
    pub shortlist_max_candidates: usize,
}

impl Thresholds {
    /// Score floor used by the shortlist, on the 0-100 scale.
    pub fn shortlist_floor(&self) -> f64 {
        self.shortlist_min_score
            .unwrap_or(self.min_match_score * 100.0)
    }
}

/// Fractional cutoffs separating High, Medium, and Low confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    pub high: f64,
    pub medium: f64,
}

impl ConfidenceBands {
    pub fn is_ordered(&self) -> bool {
        self.high.is_finite() && self.medium.is_finite() && self.high > self.medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySettings {
    pub require_must_haves: bool,
}

/// Effective guardrails for one tenant evaluation. Built once and shared immutably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailsConfig {
    pub scoring_weights: ScoringWeights,
    pub thresholds: Thresholds,
    pub shortlist_strategy: ShortlistStrategy,
    pub confidence_bands: ConfidenceBands,
    pub safety: SafetySettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverrides {
    pub skills: Option<f64>,
    pub seniority: Option<f64>,
    pub location: Option<f64>,
    pub candidate_signals: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    pub min_match_score: Option<f64>,
    pub shortlist_min_score: Option<f64>,
    pub shortlist_max_candidates: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandOverrides {
    pub high: Option<f64>,
    pub medium: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyOverrides {
    pub require_must_haves: Option<bool>,
}

/// Partial guardrail layer. Each field is only applied when explicitly set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardrailOverrides {
    pub scoring_weights: WeightOverrides,
    pub thresholds: ThresholdOverrides,
    pub shortlist_strategy: Option<ShortlistStrategy>,
    pub confidence_bands: BandOverrides,
    pub safety: SafetyOverrides,
}

impl GuardrailOverrides {
    pub fn is_empty(&self) -> bool {
        self == &GuardrailOverrides::default()
    }

    /// Apply every set field onto `config`, leaving unset fields untouched.
    pub fn apply_to(&self, config: &mut GuardrailsConfig) {
        let weights = &self.scoring_weights;
        if let Some(value) = weights.skills {
            config.scoring_weights.skills = value;
        }
        if let Some(value) = weights.seniority {
            config.scoring_weights.seniority = value;
        }
        if let Some(value) = weights.location {
            config.scoring_weights.location = value;
        }
        if let Some(value) = weights.candidate_signals {
            config.scoring_weights.candidate_signals = value;
        }

        let thresholds = &self.thresholds;
        if let Some(value) = thresholds.min_match_score {
            config.thresholds.min_match_score = value;
        }
        if let Some(value) = thresholds.shortlist_min_score {
            config.thresholds.shortlist_min_score = Some(value);
        }
        if let Some(value) = thresholds.shortlist_max_candidates {
            config.thresholds.shortlist_max_candidates = value;
        }

        if let Some(strategy) = self.shortlist_strategy {
            config.shortlist_strategy = strategy;
        }

        if let Some(value) = self.confidence_bands.high {
            config.confidence_bands.high = value;
        }
        if let Some(value) = self.confidence_bands.medium {
            config.confidence_bands.medium = value;
        }

        if let Some(value) = self.safety.require_must_haves {
            config.safety.require_must_haves = value;
        }
    }
}

/// Sanitized view of the tenant's stored guardrails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredGuardrails {
    pub configured: bool,
    pub overrides: GuardrailOverrides,
    pub dropped_fields: Vec<String>,
}

/// Guardrails after every precedence layer has been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGuardrails {
    pub tenant_id: TenantId,
    pub mode: TenantMode,
    pub config: GuardrailsConfig,
    pub fire_drill_applied: bool,
    pub notes: Vec<String>,
}
