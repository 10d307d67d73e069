//! Deterministic match scoring, tenant guardrails, and explainable shortlists for
//! recruiting workflows.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
