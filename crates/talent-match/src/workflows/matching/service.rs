use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::domain::{CandidateId, JobId, JobRecord, SkillRequirement};
use super::repository::{CandidateSignalScorer, DirectoryError, MatchingDirectory};
use super::scoring::{freshness_from_posting, MatchInputs, MatchScore, MatchScoreComposer};
use super::shortlist::{classify_match_score, CandidateScore, ShortlistBuilder, ShortlistResult};
use crate::config::KillSwitchConfig;
use crate::workflows::guardrails::{
    AgentFlags, GuardrailsError, GuardrailsResolver, ResolvedGuardrails, TenantConfigStore,
    TenantId, TenantMode,
};

/// Agent name gating per-candidate match scoring.
pub const MATCH_SCORING_AGENT: &str = "match_scoring";
/// Agent name gating shortlist construction.
pub const SHORTLIST_AGENT: &str = "shortlist_builder";

/// Service composing the guardrail resolver, directory, signal scorer, and kill switches.
pub struct MatchingService<D, T, S, F> {
    directory: Arc<D>,
    resolver: GuardrailsResolver<T>,
    signals: Arc<S>,
    flags: Arc<F>,
}

/// Job-level data loaded once and reused for every candidate in a batch.
struct JobContext {
    job: JobRecord,
    skills: Vec<SkillRequirement>,
    freshness: Option<u8>,
}

/// Output of a full job evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct JobEvaluation {
    pub guardrails: ResolvedGuardrails,
    pub scores: Vec<MatchScore>,
    pub shortlist: ShortlistResult,
    pub skipped_candidates: Vec<CandidateId>,
}

impl<D, T, S, F> MatchingService<D, T, S, F>
where
    D: MatchingDirectory + 'static,
    T: TenantConfigStore + 'static,
    S: CandidateSignalScorer + 'static,
    F: AgentFlags + 'static,
{
    pub fn new(
        directory: Arc<D>,
        tenants: Arc<T>,
        signals: Arc<S>,
        flags: Arc<F>,
        kill_switches: KillSwitchConfig,
    ) -> Self {
        Self::with_resolver(
            directory,
            GuardrailsResolver::new(tenants, kill_switches),
            signals,
            flags,
        )
    }

    pub fn with_resolver(
        directory: Arc<D>,
        resolver: GuardrailsResolver<T>,
        signals: Arc<S>,
        flags: Arc<F>,
    ) -> Self {
        Self {
            directory,
            resolver,
            signals,
            flags,
        }
    }

    /// Resolve the guardrails every candidate in a batch is judged under.
    pub fn resolve_guardrails(
        &self,
        tenant_id: &TenantId,
    ) -> Result<ResolvedGuardrails, MatchingServiceError> {
        Ok(self.resolver.resolve(tenant_id)?)
    }

    /// Fail fast when the agent is switched off or the tenant mode pauses automation.
    pub fn ensure_agent_ready(
        &self,
        agent: &str,
        guardrails: &ResolvedGuardrails,
    ) -> Result<(), MatchingServiceError> {
        let tenant = &guardrails.tenant_id;
        if self.resolver.kill_switches().agent_disabled(agent)
            || !self.flags.is_enabled(agent, tenant)
        {
            return Err(MatchingServiceError::AgentDisabled {
                agent: agent.to_string(),
                tenant: tenant.clone(),
            });
        }

        if !guardrails.mode.allows_automation() {
            return Err(MatchingServiceError::AgentPaused {
                agent: agent.to_string(),
                mode: guardrails.mode,
            });
        }

        Ok(())
    }

    /// Score one candidate against one job under already resolved guardrails.
    pub fn compute_match_score(
        &self,
        candidate_id: &CandidateId,
        job_id: &JobId,
        guardrails: &ResolvedGuardrails,
        today: NaiveDate,
    ) -> Result<MatchScore, MatchingServiceError> {
        self.ensure_agent_ready(MATCH_SCORING_AGENT, guardrails)?;
        let context = self.load_job(job_id, today)?;
        let composer = MatchScoreComposer::from_guardrails(&guardrails.config);
        Ok(self.score_candidate(&composer, &context, candidate_id)?)
    }

    pub fn build_shortlist(
        &self,
        job_id: &JobId,
        candidate_scores: &[CandidateScore],
        guardrails: &ResolvedGuardrails,
    ) -> Result<ShortlistResult, MatchingServiceError> {
        self.ensure_agent_ready(SHORTLIST_AGENT, guardrails)?;
        Ok(ShortlistBuilder::new(&guardrails.config).build(job_id, candidate_scores))
    }

    /// Resolve guardrails once, score every candidate, and build the shortlist.
    ///
    /// Cancellation is checked between candidates; a candidate already being
    /// scored always finishes.
    pub fn evaluate_job(
        &self,
        tenant_id: &TenantId,
        job_id: &JobId,
        candidate_ids: &[CandidateId],
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<JobEvaluation, MatchingServiceError> {
        let guardrails = self.resolve_guardrails(tenant_id)?;
        self.ensure_agent_ready(MATCH_SCORING_AGENT, &guardrails)?;
        self.ensure_agent_ready(SHORTLIST_AGENT, &guardrails)?;

        let context = self.load_job(job_id, today)?;
        let composer = MatchScoreComposer::from_guardrails(&guardrails.config);

        let mut seen = HashSet::new();
        let mut scores = Vec::new();
        let mut skipped_candidates = Vec::new();
        for candidate_id in candidate_ids {
            if !seen.insert(candidate_id) {
                continue;
            }
            if cancel.is_cancelled() {
                return Err(MatchingServiceError::Cancelled {
                    scored: scores.len(),
                });
            }

            match self.score_candidate(&composer, &context, candidate_id) {
                Ok(score) => scores.push(score),
                Err(DirectoryError::CandidateNotFound(missing)) => {
                    warn!(job = %job_id, candidate = %missing, "candidate skipped; not found");
                    skipped_candidates.push(missing);
                }
                Err(other) => return Err(other.into()),
            }
        }

        let bands = &guardrails.config.confidence_bands;
        let candidate_scores: Vec<CandidateScore> = scores
            .iter()
            .map(|score| {
                let band = classify_match_score(score.score, bands);
                CandidateScore::from_match(score, Some(band))
            })
            .collect();
        let shortlist = ShortlistBuilder::new(&guardrails.config).build(job_id, &candidate_scores);

        Ok(JobEvaluation {
            guardrails,
            scores,
            shortlist,
            skipped_candidates,
        })
    }

    fn load_job(&self, job_id: &JobId, today: NaiveDate) -> Result<JobContext, DirectoryError> {
        let job = self
            .directory
            .job(job_id)?
            .ok_or_else(|| DirectoryError::JobNotFound(job_id.clone()))?;
        let skills = self.directory.job_skills(job_id)?;
        let freshness = job
            .posted_on
            .map(|posted_on| freshness_from_posting(posted_on, today));

        Ok(JobContext {
            job,
            skills,
            freshness,
        })
    }

    fn score_candidate(
        &self,
        composer: &MatchScoreComposer,
        context: &JobContext,
        candidate_id: &CandidateId,
    ) -> Result<MatchScore, DirectoryError> {
        let candidate = self
            .directory
            .candidate(candidate_id)?
            .ok_or_else(|| DirectoryError::CandidateNotFound(candidate_id.clone()))?;
        let candidate_skills = self.directory.candidate_skills(candidate_id)?;

        let signal = match self.signals.score(&candidate) {
            Ok(signal) => signal,
            Err(err) => {
                warn!(candidate = %candidate_id, error = %err, "candidate signal unavailable");
                None
            }
        };

        let score = composer.compose(&MatchInputs {
            candidate: &candidate,
            job: &context.job,
            job_skills: &context.skills,
            candidate_skills: &candidate_skills,
            signal: signal.as_ref(),
            job_freshness: context.freshness,
        });

        debug!(
            candidate = %candidate_id,
            job = %context.job.id,
            score = score.score,
            skills = score.skill_score,
            "candidate scored"
        );

        Ok(score)
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error("agent {agent} is disabled for tenant {tenant}")]
    AgentDisabled { agent: String, tenant: TenantId },
    #[error("agent {agent} is paused while the tenant is in {mode} mode")]
    AgentPaused { agent: String, mode: TenantMode },
    #[error(transparent)]
    Guardrails(#[from] GuardrailsError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("evaluation cancelled after scoring {scored} candidate(s)")]
    Cancelled { scored: usize },
}
