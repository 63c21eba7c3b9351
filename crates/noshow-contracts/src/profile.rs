//! Per-patient risk profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AppointmentId, PatientId};
use crate::patient::{AgeBucket, Gender, HistoryStats};
use crate::risk::{RiskTier, ScoreSource};

/// Risk of a patient's next upcoming appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRisk {
    pub appointment_id: AppointmentId,
    pub scheduled_start: DateTime<Utc>,
    pub probability: f64,
    pub tier: RiskTier,
    pub source: ScoreSource,
}

/// The answer to a single-patient risk query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub patient_id: PatientId,
    pub age_bucket: AgeBucket,
    pub gender: Gender,
    /// Risk of the next upcoming appointment, when one exists.
    pub upcoming: Option<UpcomingRisk>,
    /// Explicit flag: the patient exists but carries no active risk score.
    pub no_active_score: bool,
    pub history: HistoryStats,
    pub historical_no_show_rate: f64,
    /// Contributing signals, strongest first. Empty for model-sourced scores
    /// unless the model supplied its own factors.
    pub factors: Vec<String>,
}
