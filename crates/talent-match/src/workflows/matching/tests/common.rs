use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::KillSwitchConfig;
use crate::workflows::guardrails::{
    AgentFlags, TenantConfigStore, TenantGuardrailsRecord, TenantId, TenantMode, TenantStoreError,
};
use crate::workflows::matching::domain::{
    CandidateId, CandidateRecord, CandidateSignal, CandidateSkill, JobId, JobRecord,
    SkillRequirement,
};
use crate::workflows::matching::repository::{
    CandidateSignalScorer, DirectoryError, MatchingDirectory, SignalError,
};
use crate::workflows::matching::MatchingService;

pub(super) type TestService =
    MatchingService<MemoryDirectory, MemoryTenantStore, MemorySignals, MemoryFlags>;

pub(super) const DEFAULT_TENANT: &str = "acme";
pub(super) const DRILL_TENANT: &str = "drill";
pub(super) const PAUSED_TENANT: &str = "paused";
pub(super) const JOB: &str = "job-frontend";

pub(super) fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 15).expect("valid date")
}

pub(super) fn candidate_id(id: &str) -> CandidateId {
    CandidateId(id.to_string())
}

pub(super) fn job_id() -> JobId {
    JobId(JOB.to_string())
}

pub(super) fn tenant(id: &str) -> TenantId {
    TenantId(id.to_string())
}

pub(super) fn job() -> JobRecord {
    JobRecord {
        id: job_id(),
        title: "Senior Frontend Engineer".to_string(),
        seniority: Some("Senior".to_string()),
        location: Some("Remote".to_string()),
        posted_on: NaiveDate::from_ymd_opt(2025, 10, 10),
    }
}

pub(super) fn job_skills() -> Vec<SkillRequirement> {
    vec![
        SkillRequirement::required("React"),
        SkillRequirement::new("GraphQL", true, Some(1.0)),
        SkillRequirement::preferred("Figma"),
    ]
}

pub(super) fn candidate(id: &str, seniority: Option<&str>, location: Option<&str>) -> CandidateRecord {
    CandidateRecord {
        id: candidate_id(id),
        display_name: format!("Candidate {id}"),
        seniority: seniority.map(str::to_string),
        location: location.map(str::to_string),
    }
}

pub(super) fn skills(names: &[&str]) -> Vec<CandidateSkill> {
    names.iter().map(|name| CandidateSkill::new(*name)).collect()
}

pub(super) fn signal(score: f64, reason: &str) -> CandidateSignal {
    CandidateSignal {
        score,
        reasons: vec![reason.to_string()],
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    candidates: Mutex<HashMap<CandidateId, (CandidateRecord, Vec<CandidateSkill>)>>,
    jobs: Mutex<HashMap<JobId, (JobRecord, Vec<SkillRequirement>)>>,
}

impl MemoryDirectory {
    pub(super) fn with_job(self, job: JobRecord, skills: Vec<SkillRequirement>) -> Self {
        self.jobs
            .lock()
            .expect("job mutex poisoned")
            .insert(job.id.clone(), (job, skills));
        self
    }

    pub(super) fn with_candidate(self, record: CandidateRecord, skills: Vec<CandidateSkill>) -> Self {
        self.candidates
            .lock()
            .expect("candidate mutex poisoned")
            .insert(record.id.clone(), (record, skills));
        self
    }
}

impl MatchingDirectory for MemoryDirectory {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, DirectoryError> {
        let guard = self.candidates.lock().expect("candidate mutex poisoned");
        Ok(guard.get(id).map(|(record, _)| record.clone()))
    }

    fn job(&self, id: &JobId) -> Result<Option<JobRecord>, DirectoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).map(|(record, _)| record.clone()))
    }

    fn candidate_skills(&self, id: &CandidateId) -> Result<Vec<CandidateSkill>, DirectoryError> {
        let guard = self.candidates.lock().expect("candidate mutex poisoned");
        Ok(guard
            .get(id)
            .map(|(_, skills)| skills.clone())
            .unwrap_or_default())
    }

    fn job_skills(&self, id: &JobId) -> Result<Vec<SkillRequirement>, DirectoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard
            .get(id)
            .map(|(_, skills)| skills.clone())
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub(super) struct MemoryTenantStore {
    tenants: Mutex<HashMap<TenantId, (TenantMode, TenantGuardrailsRecord)>>,
}

impl MemoryTenantStore {
    pub(super) fn with_tenant(self, id: &str, mode: TenantMode, stored: Option<Value>) -> Self {
        let record = TenantGuardrailsRecord {
            configured: stored.is_some(),
            stored,
        };
        self.tenants
            .lock()
            .expect("tenant mutex poisoned")
            .insert(tenant(id), (mode, record));
        self
    }
}

impl TenantConfigStore for MemoryTenantStore {
    fn load_guardrails(
        &self,
        tenant: &TenantId,
    ) -> Result<TenantGuardrailsRecord, TenantStoreError> {
        let guard = self.tenants.lock().expect("tenant mutex poisoned");
        guard
            .get(tenant)
            .map(|(_, record)| record.clone())
            .ok_or_else(|| TenantStoreError::NotFound(tenant.clone()))
    }

    fn load_mode(&self, tenant: &TenantId) -> Result<TenantMode, TenantStoreError> {
        let guard = self.tenants.lock().expect("tenant mutex poisoned");
        guard
            .get(tenant)
            .map(|(mode, _)| *mode)
            .ok_or_else(|| TenantStoreError::NotFound(tenant.clone()))
    }
}

#[derive(Default)]
pub(super) struct MemorySignals {
    signals: HashMap<CandidateId, CandidateSignal>,
    failing: HashSet<CandidateId>,
}

impl MemorySignals {
    pub(super) fn with_signal(mut self, id: &str, signal: CandidateSignal) -> Self {
        self.signals.insert(candidate_id(id), signal);
        self
    }

    pub(super) fn failing_for(mut self, id: &str) -> Self {
        self.failing.insert(candidate_id(id));
        self
    }
}

impl CandidateSignalScorer for MemorySignals {
    fn score(&self, candidate: &CandidateRecord) -> Result<Option<CandidateSignal>, SignalError> {
        if self.failing.contains(&candidate.id) {
            return Err(SignalError::Unavailable("engagement api timeout".to_string()));
        }
        Ok(self.signals.get(&candidate.id).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryFlags {
    disabled: Mutex<HashSet<(String, TenantId)>>,
}

impl MemoryFlags {
    pub(super) fn disable(&self, agent: &str, id: &str) {
        self.disabled
            .lock()
            .expect("flag mutex poisoned")
            .insert((agent.to_string(), tenant(id)));
    }
}

impl AgentFlags for MemoryFlags {
    fn is_enabled(&self, agent: &str, tenant: &TenantId) -> bool {
        !self
            .disabled
            .lock()
            .expect("flag mutex poisoned")
            .contains(&(agent.to_string(), tenant.clone()))
    }
}

/// Four candidates for the frontend job:
/// `cand-a` matches everything, `cand-b` is missing GraphQL and seniority,
/// `cand-c` is in the wrong location, and `cand-d` matches nothing.
pub(super) fn directory() -> MemoryDirectory {
    MemoryDirectory::default()
        .with_job(job(), job_skills())
        .with_candidate(
            candidate("cand-a", Some("Senior"), Some("Remote")),
            skills(&["React", "GraphQL", "Figma"]),
        )
        .with_candidate(
            candidate("cand-b", Some("Mid"), Some("Remote")),
            skills(&["react"]),
        )
        .with_candidate(
            candidate("cand-c", Some("Senior"), Some("Berlin")),
            skills(&["React", "graphql", "FIGMA"]),
        )
        .with_candidate(
            candidate("cand-d", Some("Junior"), Some("Onsite")),
            Vec::new(),
        )
}

pub(super) fn tenants() -> MemoryTenantStore {
    MemoryTenantStore::default()
        .with_tenant(DEFAULT_TENANT, TenantMode::Production, None)
        .with_tenant(
            DRILL_TENANT,
            TenantMode::FireDrill,
            Some(json!({ "shortlistStrategy": "broad" })),
        )
        .with_tenant(PAUSED_TENANT, TenantMode::Maintenance, None)
}

pub(super) fn signals() -> MemorySignals {
    MemorySignals::default()
        .with_signal("cand-a", signal(80.0, "Replied to outreach within a day"))
        .with_signal("cand-c", signal(60.0, "Opened last two messages"))
}

pub(super) fn build_service() -> (TestService, Arc<MemoryFlags>) {
    build_service_with(signals(), KillSwitchConfig::default())
}

pub(super) fn build_service_with(
    signals: MemorySignals,
    kill_switches: KillSwitchConfig,
) -> (TestService, Arc<MemoryFlags>) {
    let flags = Arc::new(MemoryFlags::default());
    let service = MatchingService::new(
        Arc::new(directory()),
        Arc::new(tenants()),
        Arc::new(signals),
        flags.clone(),
        kill_switches,
    );
    (service, flags)
}

pub(super) fn all_candidates() -> Vec<CandidateId> {
    ["cand-a", "cand-b", "cand-c", "cand-d"]
        .into_iter()
        .map(candidate_id)
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
