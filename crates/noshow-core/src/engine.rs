//! The risk engine: fetch → score → fallback → classify orchestration.
//!
//! The engine owns its collaborators as trait objects and enforces the
//! pipeline ordering on every invocation:
//!
//!   Store fetch → batched model scoring → per-appointment fallback for
//!   anything unscored → tier classification → aggregation/planning
//!
//! The recovery invariant is absolute: a scoring failure never fails the
//! invocation. Whatever the model could not cover is estimated by the
//! fallback, tagged `source = Heuristic`, and flows through the same
//! classification path. Only a store failure aborts the request, since a
//! partial forecast would report misleading tier counts.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use noshow_contracts::{
    action::ScheduledAction,
    appointment::{AppointmentRecord, AppointmentStatus},
    error::EngineResult,
    features::FeatureVector,
    forecast::{DateRange, ForecastCard},
    ids::PatientId,
    patient::HistoryStats,
    profile::{RiskProfile, UpcomingRisk},
    risk::{PredictionRecord, RiskScore, RiskTier, ScoreSource},
};

use crate::actions;
use crate::classify::classify;
use crate::forecast::build_forecast;
use crate::traits::{AppointmentStore, FallbackEstimator, PredictionWriter, RiskScorer};

/// Engine-level tunables. Thresholds for risk tiers are fixed by contract
/// and deliberately not configurable.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on extra bookings suggested per slot-block.
    pub max_overbook_per_block: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_overbook_per_block: 2 }
    }
}

/// One appointment carried through the pipeline with its score and tier.
#[derive(Debug, Clone)]
pub struct ScoredAppointment {
    pub record: AppointmentRecord,
    pub score: RiskScore,
    pub tier: RiskTier,
}

/// The central engine driving forecast, action, and profile requests.
///
/// Built once at process start with explicit collaborators — no ambient or
/// global lookup. Each request is independent; the engine holds no mutable
/// state of its own.
pub struct RiskEngine {
    store: Box<dyn AppointmentStore>,
    scorer: Box<dyn RiskScorer>,
    fallback: Box<dyn FallbackEstimator>,
    log: Option<Box<dyn PredictionWriter>>,
    config: EngineConfig,
}

impl RiskEngine {
    /// Assemble an engine from its collaborators.
    pub fn new(
        store: Box<dyn AppointmentStore>,
        scorer: Box<dyn RiskScorer>,
        fallback: Box<dyn FallbackEstimator>,
        log: Option<Box<dyn PredictionWriter>>,
        config: EngineConfig,
    ) -> Self {
        Self { store, scorer, fallback, log, config }
    }

    /// Build the forecast card for a date or date range.
    ///
    /// Fails with `DataUnavailable` if the store cannot be reached;
    /// inference failures are recovered via the fallback estimator.
    pub fn forecast(&self, range: DateRange) -> EngineResult<ForecastCard> {
        let scored = self.score_range(range, Utc::now())?;
        info!(
            range = %range,
            scheduled = scored.len(),
            heuristic = scored.iter().filter(|s| s.score.source == ScoreSource::Heuristic).count(),
            "forecast scored"
        );
        Ok(build_forecast(range, &scored))
    }

    /// Build the prioritized action list for one day.
    pub fn plan_actions(
        &self,
        date: NaiveDate,
        capacity: Option<u32>,
    ) -> EngineResult<Vec<ScheduledAction>> {
        let scored = self.score_range(DateRange::single(date), Utc::now())?;
        Ok(actions::plan(
            &scored,
            date,
            capacity,
            self.config.max_overbook_per_block,
        ))
    }

    /// Resolve one patient's current risk profile.
    ///
    /// Fails with `NotFound` for unknown patient ids. A patient with no
    /// upcoming appointment gets a historical-only profile with
    /// `no_active_score = true` — that case is not an error.
    pub fn resolve_profile(
        &self,
        patient_id: PatientId,
        reference_date: Option<NaiveDate>,
    ) -> EngineResult<RiskProfile> {
        let now = Utc::now();
        let reference = reference_date.unwrap_or_else(|| now.date_naive());

        let patient = self.store.fetch_patient(patient_id)?;
        let outcomes = self.store.fetch_history(patient_id)?;
        let history = HistoryStats::from_outcomes(&outcomes);

        let upcoming = self.store.fetch_next_appointment(patient_id, reference)?;
        let (upcoming, factors) = match upcoming {
            Some(record) => {
                let entry = self.score_one(&record, history, now);
                let risk = UpcomingRisk {
                    appointment_id: record.appointment.id,
                    scheduled_start: record.appointment.start,
                    probability: entry.score.probability,
                    tier: entry.tier,
                    source: entry.score.source,
                };
                (Some(risk), entry.score.factors)
            }
            None => {
                debug!(patient_id = %patient_id, "no upcoming appointment for profile");
                (None, Vec::new())
            }
        };

        Ok(RiskProfile {
            patient_id,
            age_bucket: patient.age_bucket,
            gender: patient.gender,
            no_active_score: upcoming.is_none(),
            upcoming,
            historical_no_show_rate: history.rate(),
            history,
            factors,
        })
    }

    // ── Scoring pipeline ──────────────────────────────────────────────────────

    /// Fetch and score every still-scheduled appointment in `range`.
    fn score_range(
        &self,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<ScoredAppointment>> {
        let records = self.store.fetch_appointments(range)?;
        let records: Vec<AppointmentRecord> = records
            .into_iter()
            .filter(|r| r.appointment.status == AppointmentStatus::Scheduled)
            .collect();

        // One history fetch per distinct patient; feeds both the feature
        // vectors and the fallback estimator.
        let mut histories: HashMap<PatientId, HistoryStats> = HashMap::new();
        for record in &records {
            let patient_id = record.patient.id;
            if !histories.contains_key(&patient_id) {
                let outcomes = self.store.fetch_history(patient_id)?;
                histories.insert(patient_id, HistoryStats::from_outcomes(&outcomes));
            }
        }

        let features: Vec<FeatureVector> = records
            .iter()
            .map(|r| {
                let history = histories.get(&r.patient.id).copied().unwrap_or_default();
                FeatureVector::from_record(r, history, now)
            })
            .collect();

        // Single batched model call. Unavailability is recovered, not
        // surfaced: every id the model did not cover falls back below.
        let model_scores = match self.scorer.score(&features) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, batch = features.len(), "model scoring unavailable, using fallback");
                HashMap::new()
            }
        };

        let scored: Vec<ScoredAppointment> = records
            .into_iter()
            .zip(features)
            .map(|(record, feature)| {
                let score = match model_scores.get(&record.appointment.id) {
                    Some(model) => RiskScore {
                        appointment_id: record.appointment.id,
                        probability: model.probability.clamp(0.0, 1.0),
                        source: ScoreSource::Model,
                        model_version: Some(model.model_version.clone()),
                        factors: Vec::new(),
                    },
                    None => {
                        let (probability, factors) = self.fallback.estimate(&feature);
                        RiskScore {
                            appointment_id: record.appointment.id,
                            probability,
                            source: ScoreSource::Heuristic,
                            model_version: None,
                            factors,
                        }
                    }
                };
                let tier = classify(score.probability);
                ScoredAppointment { record, score, tier }
            })
            .collect();

        self.log_predictions(&scored, now);
        Ok(scored)
    }

    /// Score one appointment, preferring the model, falling back as needed.
    fn score_one(
        &self,
        record: &AppointmentRecord,
        history: HistoryStats,
        now: DateTime<Utc>,
    ) -> ScoredAppointment {
        let feature = FeatureVector::from_record(record, history, now);
        let batch = [feature];

        let score = match self.scorer.score(&batch) {
            Ok(scores) => scores.get(&record.appointment.id).map(|model| RiskScore {
                appointment_id: record.appointment.id,
                probability: model.probability.clamp(0.0, 1.0),
                source: ScoreSource::Model,
                model_version: Some(model.model_version.clone()),
                factors: Vec::new(),
            }),
            Err(e) => {
                warn!(error = %e, appointment_id = %record.appointment.id, "single-appointment scoring unavailable");
                None
            }
        };

        let score = score.unwrap_or_else(|| {
            let (probability, factors) = self.fallback.estimate(&batch[0]);
            RiskScore {
                appointment_id: record.appointment.id,
                probability,
                source: ScoreSource::Heuristic,
                model_version: None,
                factors,
            }
        });

        let tier = classify(score.probability);
        let entry = ScoredAppointment { record: record.clone(), score, tier };
        self.log_predictions(std::slice::from_ref(&entry), now);
        entry
    }

    /// Append every produced score to the prediction log.
    ///
    /// Forecasts are read paths: a log write failure is reported but does
    /// not fail the invocation.
    fn log_predictions(&self, scored: &[ScoredAppointment], now: DateTime<Utc>) {
        let Some(log) = &self.log else { return };
        for entry in scored {
            let record = PredictionRecord::from_score(&entry.score, entry.tier, now);
            if let Err(e) = log.record(&record) {
                warn!(
                    appointment_id = %entry.score.appointment_id,
                    error = %e,
                    "prediction log write failed"
                );
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
