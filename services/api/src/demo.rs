use crate::infra::{DemoData, DEMO_JOB, DEMO_TENANT};
use chrono::{Local, NaiveDate};
use clap::Args;
use talent_match::config::{AppConfig, KillSwitchConfig};
use talent_match::error::AppError;
use talent_match::telemetry;
use talent_match::workflows::guardrails::{ResolvedGuardrails, TenantId};
use talent_match::workflows::matching::{JobEvaluation, JobId};
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub(crate) struct GuardrailsArgs {
    /// Demo tenant to resolve (globex, initech, umbrella, hooli)
    #[arg(long, default_value = DEMO_TENANT)]
    pub(crate) tenant: String,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Demo tenant whose guardrails govern the run
    #[arg(long, default_value = DEMO_TENANT)]
    pub(crate) tenant: String,
    /// Job requisition to shortlist for
    #[arg(long, default_value = DEMO_JOB)]
    pub(crate) job: String,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_guardrails(args: GuardrailsArgs) -> Result<(), AppError> {
    let kill_switches = load_kill_switches()?;
    let service = DemoData::seeded(Local::now().date_naive()).into_service(kill_switches);

    let resolved = service.resolve_guardrails(&TenantId(args.tenant))?;
    render_guardrails(&resolved);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { tenant, job, today } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let kill_switches = load_kill_switches()?;
    let data = DemoData::seeded(today);
    let candidates = data.directory.candidate_ids();
    let service = data.into_service(kill_switches);

    println!("Talent match demo ({today})");
    let evaluation = service.evaluate_job(
        &TenantId(tenant),
        &JobId(job),
        &candidates,
        today,
        &CancellationToken::new(),
    )?;

    render_guardrails(&evaluation.guardrails);
    render_evaluation(&evaluation);
    Ok(())
}

// Subcommands install the same subscriber as the server so guardrail
// anomalies are logged.
fn load_kill_switches() -> Result<KillSwitchConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;
    Ok(config.kill_switches)
}

fn render_guardrails(resolved: &ResolvedGuardrails) {
    let config = &resolved.config;
    println!(
        "\nGuardrails for tenant {} (mode {}{})",
        resolved.tenant_id,
        resolved.mode,
        if resolved.fire_drill_applied {
            ", fire drill applied"
        } else {
            ""
        }
    );
    let weights = &config.scoring_weights;
    println!(
        "- Weights: skills {:.2} | seniority {:.2} | location {:.2} | signals {:.2}",
        weights.skills, weights.seniority, weights.location, weights.candidate_signals
    );
    let thresholds = &config.thresholds;
    println!(
        "- Min match {:.0}% | shortlist floor {:.0} | max {} candidates",
        thresholds.min_match_score * 100.0,
        thresholds.shortlist_floor(),
        thresholds.shortlist_max_candidates
    );
    println!(
        "- Strategy {} | bands high {:.2} / medium {:.2} | must-haves {}",
        config.shortlist_strategy.label(),
        config.confidence_bands.high,
        config.confidence_bands.medium,
        if config.safety.require_must_haves {
            "required"
        } else {
            "optional"
        }
    );
    if !resolved.notes.is_empty() {
        println!("Resolution notes:");
        for note in &resolved.notes {
            println!("  - {note}");
        }
    }
}

fn render_evaluation(evaluation: &JobEvaluation) {
    let shortlist = &evaluation.shortlist;
    println!("\nScored {} candidate(s) for {}", evaluation.scores.len(), shortlist.job_id);
    for score in &evaluation.scores {
        println!(
            "- {}: {} (skills {} | seniority {} | location {} | signals {}{})",
            score.candidate_id,
            score.score,
            score.skill_score,
            score.seniority_score,
            score.location_score,
            score.candidate_signal_score,
            if score.candidate_signal_available {
                ""
            } else {
                ", neutral"
            }
        );
    }
    if !evaluation.skipped_candidates.is_empty() {
        println!("Skipped (not found):");
        for candidate in &evaluation.skipped_candidates {
            println!("  - {candidate}");
        }
    }

    match shortlist.cutoff_score {
        Some(cutoff) => println!(
            "\nShortlist ({} candidate(s), cutoff {cutoff})",
            shortlist.entries.len()
        ),
        None => println!("\nShortlist is empty"),
    }
    for (rank, entry) in shortlist.entries.iter().enumerate() {
        let band = entry
            .confidence_band
            .map(|band| band.label())
            .unwrap_or("unknown");
        println!("{}. {} score {} ({band})", rank + 1, entry.candidate_id, entry.score);

        if let Some(score) = evaluation
            .scores
            .iter()
            .find(|score| score.candidate_id == entry.candidate_id)
        {
            for line in score.explanation.lines() {
                println!("   {line}");
            }
        }
    }
    if !shortlist.notes.is_empty() {
        println!("Shortlist notes:");
        for note in &shortlist.notes {
            println!("  - {note}");
        }
    }
}
