//! No-Show Engine — Demo CLI
//!
//! Runs the forecasting pipeline against the seeded in-memory clinic: a
//! simulated model behind timeout and cache decorators, the heuristic
//! fallback, and a hash-chained prediction log. Output is the JSON each
//! tool operation would hand the conversational layer.
//!
//! Usage:
//!   cargo run -p demo -- forecast              # today's daily card
//!   cargo run -p demo -- forecast --week       # seven-day card
//!   cargo run -p demo -- actions --capacity 3  # confirmation calls + overbooks
//!   cargo run -p demo -- profile 2             # one patient's risk profile
//!   cargo run -p demo -- outage                # forecast with the model down

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use noshow_api::{dispatch, ToolOp};
use noshow_cache::{CachedScorer, InMemoryPredictionLog};
use noshow_clinic::{seeded_store, SimulatedModelScorer};
use noshow_core::{infer::TimeoutScorer, EngineConfig, RiskEngine};
use noshow_heuristic::HeuristicEstimator;

// ── CLI definition ────────────────────────────────────────────────────────────

/// No-show risk forecasting demo over a seeded week of clinic data.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "No-show risk engine demo",
    long_about = "Scores a seeded week of fictional appointments through the full\n\
                  pipeline: simulated model, heuristic fallback, tier classification,\n\
                  forecast aggregation, and action planning."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Forecast card for a day (default today) or the week from it.
    Forecast {
        /// Date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Cover the seven days starting at the date.
        #[arg(long)]
        week: bool,
    },
    /// Prioritized confirmation calls and overbook suggestions for one day.
    Actions {
        /// Date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Open slots available for overbooking on that day.
        #[arg(long)]
        capacity: Option<u32>,
    },
    /// Risk profile for one patient (seeded ids are 1-12).
    Profile {
        patient_id: i64,
    },
    /// Weekly forecast with the scoring endpoint down: every appointment
    /// falls back to the heuristic estimator.
    Outage,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    match cli.command {
        Command::Forecast { date, week } => {
            let (engine, log) = build_engine(SimulatedModelScorer::new());
            let start = date.unwrap_or_else(|| Utc::now().date_naive());
            let params = if week {
                json!({ "dateRange": format!("{}/{}", start, start + chrono::Days::new(6)) })
            } else {
                json!({ "date": start.to_string() })
            };
            print_payload(dispatch(&engine, ToolOp::GetNoShowRisk, &params));
            print_log_summary(&log);
        }
        Command::Actions { date, capacity } => {
            let (engine, log) = build_engine(SimulatedModelScorer::new());
            let start = date.unwrap_or_else(|| Utc::now().date_naive());
            let params = json!({ "date": start.to_string(), "capacity": capacity });
            print_payload(dispatch(&engine, ToolOp::GetSchedulingActions, &params));
            print_log_summary(&log);
        }
        Command::Profile { patient_id } => {
            let (engine, _) = build_engine(SimulatedModelScorer::new());
            let params = json!({ "patientId": patient_id });
            print_payload(dispatch(&engine, ToolOp::GetPatientRiskProfile, &params));
        }
        Command::Outage => {
            let (engine, log) = build_engine(SimulatedModelScorer::unavailable());
            let start = Utc::now().date_naive();
            let params =
                json!({ "dateRange": format!("{}/{}", start, start + chrono::Days::new(6)) });
            println!("Scoring endpoint is DOWN; expect source=Heuristic throughout.");
            println!();
            print_payload(dispatch(&engine, ToolOp::GetNoShowRisk, &params));
            print_log_summary(&log);
        }
    }
}

// ── Engine assembly ───────────────────────────────────────────────────────────

/// Wire the full pipeline: seeded store, model behind timeout + cache
/// decorators, heuristic fallback, and a shared prediction log handle.
fn build_engine(model: SimulatedModelScorer) -> (RiskEngine, InMemoryPredictionLog) {
    let scorer = CachedScorer::with_default_ttl(Arc::new(TimeoutScorer::new(
        Arc::new(model),
        Duration::from_secs(2),
    )));
    let log = InMemoryPredictionLog::new();

    let engine = RiskEngine::new(
        Box::new(seeded_store()),
        Box::new(scorer),
        Box::new(HeuristicEstimator::with_defaults()),
        Some(Box::new(log.clone())),
        EngineConfig::default(),
    );
    (engine, log)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_payload(payload: serde_json::Value) {
    match serde_json::to_string_pretty(&payload) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
    println!();
}

fn print_log_summary(log: &InMemoryPredictionLog) {
    let entries = log.export();
    println!(
        "Prediction log: {} record(s), chain {}",
        entries.len(),
        if log.verify_integrity() { "VERIFIED" } else { "BROKEN" }
    );
    println!();
}

fn print_banner() {
    println!();
    println!("No-Show Risk Engine");
    println!("Seeded Clinic Demo");
    println!("===================");
    println!();
    println!("Pipeline per request:");
    println!("  [1] Store fetch: still-scheduled appointments joined with patient data");
    println!("  [2] Batched model scoring (timeout + short-TTL cache decorators)");
    println!("  [3] Heuristic fallback for anything the model could not cover");
    println!("  [4] Tier classification: Low < 0.30 <= Medium <= 0.60 < High");
    println!("  [5] Aggregation into forecast cards / prioritized actions");
    println!("  [6] Every score appended to the SHA-256 prediction chain");
    println!();
}
