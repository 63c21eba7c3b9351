//! Scheduled intervention types produced by the action planner.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AppointmentId, PatientId};

/// A recommended scheduling intervention.
///
/// The planner emits these in a total, deterministic priority order. The
/// `kind` tag is the JSON discriminator for the tool layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScheduledAction {
    /// Call the patient to confirm one specific High-risk appointment.
    #[serde(rename_all = "camelCase")]
    ConfirmationCall {
        /// 1-based rank within the action list.
        priority: u32,
        appointment_id: AppointmentId,
        patient_id: PatientId,
        scheduled_start: DateTime<Utc>,
        probability: f64,
        rationale: String,
    },

    /// Add patients to a day's schedule to offset expected no-shows.
    ///
    /// Slot-level: no single appointment or patient is targeted.
    #[serde(rename_all = "camelCase")]
    OverbookSuggestion {
        priority: u32,
        date: NaiveDate,
        /// How many extra bookings to open; `floor(expected no-shows)`,
        /// capped by the configured per-block maximum.
        slots: u32,
        expected_no_shows: f64,
        /// False when no capacity information was supplied to verify against.
        capacity_verified: bool,
        rationale: String,
    },
}

impl ScheduledAction {
    /// The action's rank within its list (1 = first).
    pub fn priority(&self) -> u32 {
        match self {
            ScheduledAction::ConfirmationCall { priority, .. } => *priority,
            ScheduledAction::OverbookSuggestion { priority, .. } => *priority,
        }
    }
}
