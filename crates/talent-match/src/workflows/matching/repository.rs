use super::domain::{
    CandidateId, CandidateRecord, CandidateSignal, CandidateSkill, JobId, JobRecord,
    SkillRequirement,
};

/// Read access to candidate and job records owned by the persistence layer.
pub trait MatchingDirectory: Send + Sync {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, DirectoryError>;
    fn job(&self, id: &JobId) -> Result<Option<JobRecord>, DirectoryError>;
    fn candidate_skills(&self, id: &CandidateId) -> Result<Vec<CandidateSkill>, DirectoryError>;
    fn job_skills(&self, id: &JobId) -> Result<Vec<SkillRequirement>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Engagement scoring collaborator. `Ok(None)` means no interaction history exists.
pub trait CandidateSignalScorer: Send + Sync {
    fn score(&self, candidate: &CandidateRecord) -> Result<Option<CandidateSignal>, SignalError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("signal scorer unavailable: {0}")]
    Unavailable(String),
}
