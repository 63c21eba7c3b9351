//! Core trait definitions for the risk pipeline.
//!
//! Four seams define the engine's collaborators:
//!
//! - `AppointmentStore`   — read-only gateway to scheduling data
//! - `RiskScorer`         — the remote probability model (may fail)
//! - `FallbackEstimator`  — deterministic rule-based estimate (never fails)
//! - `PredictionWriter`   — append-only sink for produced scores
//!
//! The engine wires them together: any appointment the scorer cannot cover
//! is routed through the fallback estimator, so the pipeline never produces
//! "no answer". All implementations are built once at process start and
//! passed in explicitly — no ambient lookup.

use std::collections::HashMap;

use chrono::NaiveDate;

use noshow_contracts::{
    appointment::AppointmentRecord,
    error::EngineResult,
    features::{FeatureVector, ModelScore},
    forecast::DateRange,
    ids::{AppointmentId, PatientId},
    patient::{OutcomeRecord, Patient},
    risk::PredictionRecord,
};

/// Read-only access to appointment, patient, and historical-outcome records.
///
/// Queries must never mutate scheduling data, and results must be
/// deterministic for a fixed snapshot.
pub trait AppointmentStore: Send + Sync {
    /// Every appointment whose date falls in `range`, joined with patient,
    /// provider, and department.
    ///
    /// Ordered by scheduled start ascending, ties broken by appointment id
    /// ascending. Fails with `DataUnavailable` when the store is unreachable.
    fn fetch_appointments(&self, range: DateRange) -> EngineResult<Vec<AppointmentRecord>>;

    /// One appointment by id, or `NotFound`.
    fn fetch_appointment(&self, id: AppointmentId) -> EngineResult<AppointmentRecord>;

    /// One patient by id, or `NotFound`.
    fn fetch_patient(&self, id: PatientId) -> EngineResult<Patient>;

    /// Past appointment outcomes for one patient, oldest first.
    ///
    /// An empty sequence is a valid answer for patients with no history.
    fn fetch_history(&self, id: PatientId) -> EngineResult<Vec<OutcomeRecord>>;

    /// The patient's earliest still-scheduled appointment on or after the
    /// given date, when one exists.
    fn fetch_next_appointment(
        &self,
        id: PatientId,
        on_or_after: NaiveDate,
    ) -> EngineResult<Option<AppointmentRecord>>;
}

/// The remote scoring service, consumed as an opaque probability source.
///
/// One batched call per invocation. On timeout or any transport failure the
/// whole batch fails with `InferenceUnavailable` — implementations must never
/// substitute a zero or placeholder probability. A successful response may
/// omit ids (e.g. entries a caching layer could not serve); callers treat
/// absent ids as unscored and route them to the fallback estimator.
pub trait RiskScorer: Send + Sync {
    fn score(
        &self,
        batch: &[FeatureVector],
    ) -> EngineResult<HashMap<AppointmentId, ModelScore>>;
}

/// The deterministic rule-based estimator used when the model is unavailable.
///
/// Total over every well-formed input: returns a probability in [0,1] plus an
/// ordered list of contributing-factor descriptions, strongest first.
pub trait FallbackEstimator: Send + Sync {
    fn estimate(&self, features: &FeatureVector) -> (f64, Vec<String>);
}

/// Append-only sink for produced risk scores.
///
/// Records are write-once, keyed by appointment + timestamp; the engine
/// appends one record per scored appointment for later audit.
pub trait PredictionWriter: Send + Sync {
    fn record(&self, record: &PredictionRecord) -> EngineResult<()>;
}
