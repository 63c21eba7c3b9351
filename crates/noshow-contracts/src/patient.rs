//! Patient demographics and historical-outcome types.
//!
//! Wire strings for enums match the source EHR schema exactly; downstream
//! feature vectors and JSON payloads depend on them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AppointmentId, PatientId};

/// Days of portal inactivity after which a patient no longer counts as engaged.
pub const PORTAL_ENGAGEMENT_WINDOW_DAYS: i64 = 90;

/// Patient gender as recorded by the EHR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    Other,
}

/// Insurance payer grouping, a moderate no-show predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayerGroup {
    Commercial,
    Medicare,
    Medicaid,
    #[serde(rename = "Self-Pay")]
    SelfPay,
}

/// Patient age range categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    #[serde(rename = "0-17")]
    Pediatric,
    #[serde(rename = "18-39")]
    YoungAdult,
    #[serde(rename = "40-64")]
    MiddleAged,
    #[serde(rename = "65+")]
    Senior,
}

/// A care recipient.
///
/// `portal_last_login = None` means the patient has never activated the
/// portal, which downstream scoring treats as a disengagement signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub age_bucket: AgeBucket,
    pub gender: Gender,
    pub zip_code: Option<String>,
    pub payer_group: PayerGroup,
    pub portal_last_login: Option<DateTime<Utc>>,
}

impl Patient {
    /// True if the patient logged into the portal within the engagement
    /// window (90 days) before `now`. Absence of any login is never engaged.
    pub fn portal_engaged(&self, now: DateTime<Utc>) -> bool {
        match self.portal_last_login {
            Some(login) => (now - login).num_days() <= PORTAL_ENGAGEMENT_WINDOW_DAYS,
            None => false,
        }
    }
}

/// The outcome of one past appointment, as consumed by the fallback estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub appointment_id: AppointmentId,
    pub date: NaiveDate,
    pub no_show: bool,
}

/// Summary statistics over a patient's historical outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of past appointments with a known outcome.
    pub total: u32,
    /// How many of them were no-shows.
    pub no_shows: u32,
}

impl HistoryStats {
    /// Derive stats from a sequence of outcomes.
    pub fn from_outcomes(outcomes: &[OutcomeRecord]) -> Self {
        Self {
            total: outcomes.len() as u32,
            no_shows: outcomes.iter().filter(|o| o.no_show).count() as u32,
        }
    }

    /// Historical no-show rate in [0,1]; 0.0 when no history exists.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.no_shows) / f64::from(self.total)
        }
    }
}
