//! Candidate-job match scoring, explanations, and shortlist construction.
//!
//! Every evaluation runs under one `ResolvedGuardrails` value resolved at the
//! start of the request; nothing here mutates shared state.

pub mod domain;
pub mod explanation;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod shortlist;


pub use domain::{
    dedupe_requirements, normalize_skill_name, CandidateId, CandidateRecord, CandidateSignal,
    CandidateSkill, ConfidenceBand, JobId, JobRecord, SkillRequirement,
};
pub use explanation::{format_explanation, ExplanationInput, NO_RISKS_DETECTED};
pub use repository::{CandidateSignalScorer, DirectoryError, MatchingDirectory, SignalError};
pub use router::{matching_router, status_for, MatchRequest, ShortlistRequest};
pub use scoring::{MatchInputs, MatchScore, MatchScoreComposer, SkillSummary, TOP_REASON_LIMIT};
pub use service::{
    JobEvaluation, MatchingService, MatchingServiceError, MATCH_SCORING_AGENT, SHORTLIST_AGENT,
};
pub use shortlist::{
    classify_confidence, classify_match_score, CandidateScore, ShortlistBuilder, ShortlistEntry, ShortlistResult,
};
