mod confidence;
mod strategy;

pub use confidence::{classify_confidence, classify_match_score};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{CandidateId, ConfidenceBand, JobId};
use super::scoring::MatchScore;
use crate::workflows::guardrails::GuardrailsConfig;

/// Per-candidate input to the shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub candidate_id: CandidateId,
    pub score: u8,
    pub confidence_band: Option<ConfidenceBand>,
    /// Upstream flag: at least one required skill went unmatched.
    #[serde(default)]
    pub missing_required_skills: bool,
}

impl CandidateScore {
    pub fn from_match(score: &MatchScore, confidence_band: Option<ConfidenceBand>) -> Self {
        Self {
            candidate_id: score.candidate_id.clone(),
            score: score.score,
            confidence_band,
            missing_required_skills: score.missing_required_skills,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistEntry {
    pub candidate_id: CandidateId,
    pub score: u8,
    pub confidence_band: Option<ConfidenceBand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistResult {
    pub job_id: JobId,
    pub shortlisted_candidate_ids: Vec<CandidateId>,
    pub entries: Vec<ShortlistEntry>,
    /// Score of the lowest ranked shortlisted candidate.
    pub cutoff_score: Option<u8>,
    pub notes: Vec<String>,
}

/// Filters, ranks, and truncates scored candidates under one set of guardrails.
pub struct ShortlistBuilder<'a> {
    config: &'a GuardrailsConfig,
}

impl<'a> ShortlistBuilder<'a> {
    pub fn new(config: &'a GuardrailsConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, job_id: &JobId, candidates: &[CandidateScore]) -> ShortlistResult {
        let mut notes = Vec::new();
        let mut ranked = strategy::run_strategy(candidates.to_vec(), self.config, &mut notes);

        let limit = self.config.thresholds.shortlist_max_candidates;
        if ranked.len() > limit {
            notes.push(format!(
                "kept top {limit} of {} eligible candidates",
                ranked.len()
            ));
            ranked.truncate(limit);
        }

        let entries: Vec<ShortlistEntry> = ranked
            .into_iter()
            .map(|candidate| ShortlistEntry {
                candidate_id: candidate.candidate_id,
                score: candidate.score,
                confidence_band: candidate.confidence_band,
            })
            .collect();
        let cutoff_score = entries.last().map(|entry| entry.score);

        info!(
            job = %job_id,
            strategy = self.config.shortlist_strategy.label(),
            considered = candidates.len(),
            retained = entries.len(),
            cutoff = ?cutoff_score,
            "shortlist built"
        );

        ShortlistResult {
            job_id: job_id.clone(),
            shortlisted_candidate_ids: entries
                .iter()
                .map(|entry| entry.candidate_id.clone())
                .collect(),
            entries,
            cutoff_score,
            notes,
        }
    }
}
