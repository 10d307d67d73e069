use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_match::config::KillSwitchConfig;
use talent_match::workflows::guardrails::{
    AgentFlags, TenantConfigStore, TenantGuardrailsRecord, TenantId, TenantMode, TenantStoreError,
};
use talent_match::workflows::matching::{
    CandidateId, CandidateRecord, CandidateSignal, CandidateSignalScorer, CandidateSkill,
    DirectoryError, JobId, JobRecord, MatchingDirectory, MatchingService, SignalError,
    SkillRequirement, SHORTLIST_AGENT,
};

pub(crate) type DemoMatchingService = MatchingService<
    InMemoryDirectory,
    InMemoryTenantStore,
    InMemorySignalScorer,
    InMemoryAgentFlags,
>;

pub(crate) const DEMO_TENANT: &str = "globex";
pub(crate) const DEMO_JOB: &str = "req-platform-01";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectory {
    candidates: Arc<Mutex<HashMap<CandidateId, (CandidateRecord, Vec<CandidateSkill>)>>>,
    jobs: Arc<Mutex<HashMap<JobId, (JobRecord, Vec<SkillRequirement>)>>>,
}

impl InMemoryDirectory {
    pub(crate) fn insert_candidate(&self, record: CandidateRecord, skills: Vec<CandidateSkill>) {
        let mut guard = self.candidates.lock().expect("directory mutex poisoned");
        guard.insert(record.id.clone(), (record, skills));
    }

    pub(crate) fn insert_job(&self, record: JobRecord, skills: Vec<SkillRequirement>) {
        let mut guard = self.jobs.lock().expect("directory mutex poisoned");
        guard.insert(record.id.clone(), (record, skills));
    }

    pub(crate) fn candidate_ids(&self) -> Vec<CandidateId> {
        let guard = self.candidates.lock().expect("directory mutex poisoned");
        let mut ids: Vec<CandidateId> = guard.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl MatchingDirectory for InMemoryDirectory {
    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, DirectoryError> {
        let guard = self.candidates.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).map(|(record, _)| record.clone()))
    }

    fn job(&self, id: &JobId) -> Result<Option<JobRecord>, DirectoryError> {
        let guard = self.jobs.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).map(|(record, _)| record.clone()))
    }

    fn candidate_skills(&self, id: &CandidateId) -> Result<Vec<CandidateSkill>, DirectoryError> {
        let guard = self.candidates.lock().expect("directory mutex poisoned");
        Ok(guard
            .get(id)
            .map(|(_, skills)| skills.clone())
            .unwrap_or_default())
    }

    fn job_skills(&self, id: &JobId) -> Result<Vec<SkillRequirement>, DirectoryError> {
        let guard = self.jobs.lock().expect("directory mutex poisoned");
        Ok(guard
            .get(id)
            .map(|(_, skills)| skills.clone())
            .unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTenantStore {
    tenants: Arc<Mutex<HashMap<TenantId, (TenantMode, TenantGuardrailsRecord)>>>,
}

impl InMemoryTenantStore {
    pub(crate) fn insert(&self, tenant: &str, mode: TenantMode, stored: Option<Value>) {
        let record = TenantGuardrailsRecord {
            configured: stored.is_some(),
            stored,
        };
        let mut guard = self.tenants.lock().expect("tenant mutex poisoned");
        guard.insert(TenantId(tenant.to_string()), (mode, record));
    }
}

impl TenantConfigStore for InMemoryTenantStore {
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

#[derive(Default, Clone)]
pub(crate) struct InMemorySignalScorer {
    signals: Arc<Mutex<HashMap<CandidateId, CandidateSignal>>>,
}

impl InMemorySignalScorer {
    pub(crate) fn insert(&self, candidate: &str, score: f64, reason: &str) {
        let mut guard = self.signals.lock().expect("signal mutex poisoned");
        guard.insert(
            CandidateId(candidate.to_string()),
            CandidateSignal {
                score,
                reasons: vec![reason.to_string()],
            },
        );
    }
}

impl CandidateSignalScorer for InMemorySignalScorer {
    fn score(&self, candidate: &CandidateRecord) -> Result<Option<CandidateSignal>, SignalError> {
        let guard = self.signals.lock().expect("signal mutex poisoned");
        Ok(guard.get(&candidate.id).cloned())
    }
}

/// Per-tenant agent switches. Everything is enabled unless disabled here.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAgentFlags {
    disabled: Arc<Mutex<HashSet<(String, TenantId)>>>,
}

impl InMemoryAgentFlags {
    pub(crate) fn disable(&self, agent: &str, tenant: &str) {
        let mut guard = self.disabled.lock().expect("flag mutex poisoned");
        guard.insert((agent.to_string(), TenantId(tenant.to_string())));
    }
}

impl AgentFlags for InMemoryAgentFlags {
    fn is_enabled(&self, agent: &str, tenant: &TenantId) -> bool {
        let guard = self.disabled.lock().expect("flag mutex poisoned");
        !guard.contains(&(agent.to_string(), tenant.clone()))
    }
}

/// Demo collaborators shared by the HTTP service and the CLI.
pub(crate) struct DemoData {
    pub(crate) directory: InMemoryDirectory,
    pub(crate) tenants: InMemoryTenantStore,
    pub(crate) signals: InMemorySignalScorer,
    pub(crate) flags: InMemoryAgentFlags,
}

impl DemoData {
    pub(crate) fn seeded(today: NaiveDate) -> Self {
        let data = Self {
            directory: InMemoryDirectory::default(),
            tenants: InMemoryTenantStore::default(),
            signals: InMemorySignalScorer::default(),
            flags: InMemoryAgentFlags::default(),
        };
        seed_tenants(&data.tenants);
        seed_directory(&data.directory, today);
        seed_signals(&data.signals);
        data.flags.disable(SHORTLIST_AGENT, "initech");
        data
    }

    pub(crate) fn into_service(self, kill_switches: KillSwitchConfig) -> DemoMatchingService {
        MatchingService::new(
            Arc::new(self.directory),
            Arc::new(self.tenants),
            Arc::new(self.signals),
            Arc::new(self.flags),
            kill_switches,
        )
    }
}

fn seed_tenants(store: &InMemoryTenantStore) {
    store.insert(
        DEMO_TENANT,
        TenantMode::Production,
        Some(json!({
            "scoringWeights": { "skills": 0.6, "seniority": 0.15, "location": 0.1, "candidateSignals": 0.15 },
            "thresholds": { "minMatchScore": 0.55, "shortlistMaxCandidates": 3 },
            "shortlistStrategy": "quality",
            "safety": { "requireMustHaves": true },
        })),
    );
    store.insert("initech", TenantMode::Sandbox, None);
    store.insert(
        "umbrella",
        TenantMode::FireDrill,
        Some(json!({ "shortlistStrategy": "broad", "thresholds": { "minMatchScore": 0.4 } })),
    );
    store.insert("hooli", TenantMode::Maintenance, None);
}

fn seed_directory(directory: &InMemoryDirectory, today: NaiveDate) {
    directory.insert_job(
        JobRecord {
            id: JobId(DEMO_JOB.to_string()),
            title: "Senior Platform Engineer".to_string(),
            seniority: Some("Senior".to_string()),
            location: Some("Remote".to_string()),
            posted_on: today.checked_sub_days(chrono::Days::new(12)),
        },
        vec![
            SkillRequirement::required("Rust"),
            SkillRequirement::required("Kubernetes"),
            SkillRequirement::preferred("PostgreSQL"),
            SkillRequirement::preferred("Terraform"),
        ],
    );

    let candidates: [(&str, &str, Option<&str>, Option<&str>, &[&str]); 5] = [
        ("cand-001", "Priya Natarajan", Some("Senior"), Some("Remote"), &["Rust", "Kubernetes", "PostgreSQL"]),
        ("cand-002", "Tomás Ferreira", Some("Senior"), Some("Lisbon"), &["rust", "kubernetes", "terraform"]),
        ("cand-003", "Grace Okafor", Some("Mid"), Some("Remote"), &["Rust", "PostgreSQL", "Terraform"]),
        ("cand-004", "Liam Chen", None, Some("Remote"), &["Go", "Kubernetes"]),
        ("cand-005", "Sofia Russo", Some("Senior"), None, &["Rust", "Kubernetes", "Terraform", "PostgreSQL"]),
    ];
    for (id, name, seniority, location, skills) in candidates {
        directory.insert_candidate(
            CandidateRecord {
                id: CandidateId(id.to_string()),
                display_name: name.to_string(),
                seniority: seniority.map(str::to_string),
                location: location.map(str::to_string),
            },
            skills.iter().map(|skill| CandidateSkill::new(*skill)).collect(),
        );
    }
}

fn seed_signals(signals: &InMemorySignalScorer) {
    signals.insert("cand-001", 85.0, "Replied to recruiter within a day");
    signals.insert("cand-002", 60.0, "Opened two of three outreach emails");
    signals.insert("cand-005", 40.0, "No response to last outreach");
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
