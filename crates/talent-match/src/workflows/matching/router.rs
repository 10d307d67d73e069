use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::domain::{CandidateId, JobId};
use super::repository::{CandidateSignalScorer, DirectoryError, MatchingDirectory};
use super::service::{MatchingService, MatchingServiceError};
use crate::workflows::guardrails::{AgentFlags, GuardrailsError, TenantConfigStore, TenantId};

#[derive(Debug, Deserialize)]
pub struct ShortlistRequest {
    pub candidate_ids: Vec<CandidateId>,
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
}

/// Router builder exposing guardrail resolution, match scoring, and shortlists.
pub fn matching_router<D, T, S, F>(service: Arc<MatchingService<D, T, S, F>>) -> Router
where
    D: MatchingDirectory + 'static,
    T: TenantConfigStore + 'static,
    S: CandidateSignalScorer + 'static,
    F: AgentFlags + 'static,
{
    Router::new()
        .route(
            "/api/v1/tenants/:tenant_id/guardrails",
            get(guardrails_handler::<D, T, S, F>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/jobs/:job_id/shortlist",
            post(shortlist_handler::<D, T, S, F>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/jobs/:job_id/candidates/:candidate_id/match",
            post(match_handler::<D, T, S, F>),
        )
        .with_state(service)
}

pub(crate) async fn guardrails_handler<D, T, S, F>(
    State(service): State<Arc<MatchingService<D, T, S, F>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    D: MatchingDirectory + 'static,
    T: TenantConfigStore + 'static,
    S: CandidateSignalScorer + 'static,
    F: AgentFlags + 'static,
{
    let tenant_id = TenantId(tenant_id);
    let outcome =
        tokio::task::spawn_blocking(move || service.resolve_guardrails(&tenant_id)).await;

    match outcome {
        Ok(Ok(resolved)) => (StatusCode::OK, axum::Json(resolved)).into_response(),
        Ok(Err(error)) => error_response(&error),
        Err(join_error) => internal_error(&join_error.to_string()),
    }
}

pub(crate) async fn shortlist_handler<D, T, S, F>(
    State(service): State<Arc<MatchingService<D, T, S, F>>>,
    Path((tenant_id, job_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ShortlistRequest>,
) -> Response
where
    D: MatchingDirectory + 'static,
    T: TenantConfigStore + 'static,
    S: CandidateSignalScorer + 'static,
    F: AgentFlags + 'static,
{
    let tenant_id = TenantId(tenant_id);
    let job_id = JobId(job_id);
    let today = request
        .evaluation_date
        .unwrap_or_else(|| Local::now().date_naive());

    // Dropping the handler (client gone) cancels the batch between candidates.
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let outcome = tokio::task::spawn_blocking(move || {
        service.evaluate_job(&tenant_id, &job_id, &request.candidate_ids, today, &cancel)
    })
    .await;
    guard.disarm();

    match outcome {
        Ok(Ok(evaluation)) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Ok(Err(error)) => error_response(&error),
        Err(join_error) => internal_error(&join_error.to_string()),
    }
}

pub(crate) async fn match_handler<D, T, S, F>(
    State(service): State<Arc<MatchingService<D, T, S, F>>>,
    Path((tenant_id, job_id, candidate_id)): Path<(String, String, String)>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response
where
    D: MatchingDirectory + 'static,
    T: TenantConfigStore + 'static,
    S: CandidateSignalScorer + 'static,
    F: AgentFlags + 'static,
{
    let tenant_id = TenantId(tenant_id);
    let job_id = JobId(job_id);
    let candidate_id = CandidateId(candidate_id);
    let today = request
        .evaluation_date
        .unwrap_or_else(|| Local::now().date_naive());

    let outcome = tokio::task::spawn_blocking(move || {
        let guardrails = service.resolve_guardrails(&tenant_id)?;
        service.compute_match_score(&candidate_id, &job_id, &guardrails, today)
    })
    .await;

    match outcome {
        Ok(Ok(score)) => (StatusCode::OK, axum::Json(score)).into_response(),
        Ok(Err(error)) => error_response(&error),
        Err(join_error) => internal_error(&join_error.to_string()),
    }
}

/// HTTP status for a matching failure. Preconditions map to 4xx.
pub fn status_for(error: &MatchingServiceError) -> StatusCode {
    match error {
        MatchingServiceError::Guardrails(GuardrailsError::TenantNotFound(_))
        | MatchingServiceError::Directory(DirectoryError::JobNotFound(_))
        | MatchingServiceError::Directory(DirectoryError::CandidateNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        MatchingServiceError::AgentDisabled { .. } => StatusCode::FORBIDDEN,
        MatchingServiceError::AgentPaused { .. } => StatusCode::CONFLICT,
        MatchingServiceError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        MatchingServiceError::Guardrails(GuardrailsError::Store(_))
        | MatchingServiceError::Directory(DirectoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: &MatchingServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_for(error), axum::Json(payload)).into_response()
}

fn internal_error(detail: &str) -> Response {
    let payload = json!({
        "error": format!("evaluation task failed: {detail}"),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
