//! Risk score, tier, and prediction-record types.
//!
//! A `RiskScore` is the output of scoring one appointment, whether by the
//! remote model or the fallback heuristic. The `source` field is part of the
//! contract: downstream consumers disclose heuristic-derived confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::AppointmentId;

/// Where a probability came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSource {
    /// The remote probability model.
    Model,
    /// The deterministic rule-based fallback estimator.
    Heuristic,
}

/// The scored no-show probability for one appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub appointment_id: AppointmentId,
    /// No-show probability, always in [0,1], never null.
    pub probability: f64,
    pub source: ScoreSource,
    /// Version of the model that produced the score; `None` for heuristic scores.
    pub model_version: Option<String>,
    /// Human-readable contributing signals, strongest first.
    pub factors: Vec<String>,
}

/// Discretization of a no-show probability.
///
/// The partition of [0,1] is total and non-overlapping:
/// Low < 0.30, Medium in [0.30, 0.60], High > 0.60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Lower tier boundary: probabilities below this are Low.
pub const TIER_LOW_UPPER: f64 = 0.30;
/// Upper tier boundary: probabilities above this are High.
pub const TIER_MEDIUM_UPPER: f64 = 0.60;

impl RiskTier {
    /// Inclusive/exclusive probability bounds of this tier as `(lower, upper)`.
    ///
    /// Low covers [0, 0.30), Medium [0.30, 0.60], High (0.60, 1].
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            RiskTier::Low => (0.0, TIER_LOW_UPPER),
            RiskTier::Medium => (TIER_LOW_UPPER, TIER_MEDIUM_UPPER),
            RiskTier::High => (TIER_MEDIUM_UPPER, 1.0),
        }
    }
}

/// One write-once row in the prediction audit log.
///
/// Keyed by appointment + timestamp; records are appended, never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub appointment_id: AppointmentId,
    pub probability: f64,
    pub tier: RiskTier,
    pub source: ScoreSource,
    pub model_version: Option<String>,
    pub factors: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Build a log record from a score and its tier, stamped `now`.
    pub fn from_score(score: &RiskScore, tier: RiskTier, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            appointment_id: score.appointment_id,
            probability: score.probability,
            tier,
            source: score.source,
            model_version: score.model_version.clone(),
            factors: score.factors.clone(),
            recorded_at: now,
        }
    }
}
