//! Inference wire types.
//!
//! `FeatureVector` is one row of the batched scoring request; `ModelScore`
//! is one entry of the response. Field set mirrors the scoring endpoint's
//! published input schema — the model is consumed as an opaque service.

use serde::{Deserialize, Serialize};

use crate::appointment::{AppointmentRecord, NewPatientFlag, VirtualFlag};
use crate::ids::AppointmentId;
use crate::patient::{AgeBucket, Gender, HistoryStats, PayerGroup};

/// The feature row sent to the scoring service for one appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    pub appointment_id: AppointmentId,
    pub patient_age_bucket: AgeBucket,
    pub patient_gender: Gender,
    pub patient_zip_code: Option<String>,
    pub payer_group: PayerGroup,
    pub portal_engaged: bool,
    pub historical_no_show_rate: f64,
    pub historical_no_show_count: u32,
    /// Total past appointments with a known outcome (sample size behind the rate).
    pub historical_appointments: u32,
    pub lead_time_days: i64,
    pub virtual_flag: VirtualFlag,
    pub new_patient_flag: NewPatientFlag,
    pub day_of_week: u32,
    pub hour_of_day: u32,
    pub appointment_duration: u32,
    pub provider_specialty: String,
    pub department_specialty: String,
}

impl FeatureVector {
    /// Build the feature row for one joined appointment record.
    ///
    /// `now` anchors the portal-engagement window; `history` carries the
    /// patient's pre-computed outcome stats (zeroed when none exist).
    pub fn from_record(
        record: &AppointmentRecord,
        history: HistoryStats,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            appointment_id: record.appointment.id,
            patient_age_bucket: record.patient.age_bucket,
            patient_gender: record.patient.gender,
            patient_zip_code: record.patient.zip_code.clone(),
            payer_group: record.patient.payer_group,
            portal_engaged: record.patient.portal_engaged(now),
            historical_no_show_rate: history.rate(),
            historical_no_show_count: history.no_shows,
            historical_appointments: history.total,
            lead_time_days: record.appointment.lead_time_days(),
            virtual_flag: record.appointment.virtual_flag,
            new_patient_flag: record.appointment.new_patient_flag,
            day_of_week: record.appointment.day_of_week(),
            hour_of_day: record.appointment.hour_of_day(),
            appointment_duration: record.appointment.duration_minutes,
            provider_specialty: record.provider.specialty.clone(),
            department_specialty: record.department.specialty.clone(),
        }
    }
}

/// One scored appointment in the inference response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelScore {
    /// No-show probability in [0,1].
    pub probability: f64,
    /// Version of the model that produced the score.
    pub model_version: String,
}
