//! Appointment, provider, and department types.
//!
//! `AppointmentRecord` is the joined read model the store gateway returns:
//! one appointment with its patient, provider, and department resolved. The
//! engine never re-queries reference tables per appointment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AppointmentId, DepartmentId, PatientId, ProviderId};
use crate::patient::Patient;

/// Appointment status values from the EHR source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    #[serde(rename = "Checked In")]
    CheckedIn,
    #[serde(rename = "Checked Out")]
    CheckedOut,
    Complete,
    Cancelled,
    #[serde(rename = "No Show")]
    NoShow,
    Rescheduled,
}

/// Appointment modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VirtualFlag {
    #[serde(rename = "Non-Virtual")]
    NonVirtual,
    #[serde(rename = "Virtual-Video")]
    VirtualVideo,
    #[serde(rename = "Virtual-Telephone")]
    VirtualTelephone,
}

/// Whether the patient is new to the practice for this visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewPatientFlag {
    #[serde(rename = "NEW PATIENT")]
    New,
    #[serde(rename = "EST PATIENT")]
    Established,
}

/// A scheduled visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub provider_id: ProviderId,
    pub department_id: DepartmentId,
    /// When the visit takes place.
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    /// When the appointment row was created in the EHR.
    pub created_at: DateTime<Utc>,
    /// When the slot was booked (may differ from `created_at` after reschedules).
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub virtual_flag: VirtualFlag,
    pub new_patient_flag: NewPatientFlag,
}

impl Appointment {
    /// Calendar date of the visit.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Days between booking and the visit, clamped at zero.
    ///
    /// Walk-ins occasionally carry a booking timestamp minutes after the
    /// visit start; those must not produce a negative lead time.
    pub fn lead_time_days(&self) -> i64 {
        (self.date() - self.scheduled_at.date_naive()).num_days().max(0)
    }

    /// Day of week, Monday = 0 .. Sunday = 6.
    pub fn day_of_week(&self) -> u32 {
        use chrono::Datelike;
        self.start.date_naive().weekday().num_days_from_monday()
    }

    /// Hour of the visit start, 0-23.
    pub fn hour_of_day(&self) -> u32 {
        use chrono::Timelike;
        self.start.hour()
    }
}

/// A healthcare provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub provider_type: String,
    pub specialty: String,
}

/// A clinic/department location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub specialty: String,
}

/// One appointment joined with its patient, provider, and department.
///
/// This is the unit the store gateway emits and the scoring pipeline consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment: Appointment,
    pub patient: Patient,
    pub provider: Provider,
    pub department: Department,
}
