//! Seeded clinic fixture for demos and scenario tests.
//!
//! All data in this module is hardcoded and fictional; no external systems
//! are contacted. The fixture is anchored on a caller-supplied `now` so
//! portal-engagement windows and lead times stay meaningful whenever it is
//! built: appointments land on the seven days starting at `now`'s date,
//! portal logins and outcome history sit at fixed offsets into the past.
//!
//! The roster covers the signal combinations the scoring pipeline cares
//! about: perfect attenders, repeat no-showers, thin histories, brand-new
//! patients, engaged and disengaged portal users, same-day bookings and
//! month-out bookings.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use noshow_contracts::{
    appointment::{
        Appointment, AppointmentStatus, Department, NewPatientFlag, Provider, VirtualFlag,
    },
    ids::{AppointmentId, DepartmentId, PatientId, ProviderId},
    patient::{AgeBucket, Gender, OutcomeRecord, Patient, PayerGroup},
};

use crate::store::InMemoryClinicStore;

/// Build the seeded clinic anchored on the current wall clock.
pub fn seeded_store() -> InMemoryClinicStore {
    seeded_store_at(Utc::now())
}

/// Build the seeded clinic anchored on an explicit instant.
///
/// Appointment days 0..=6 are `now`'s date onward; histories and portal
/// logins are offsets before `now`. Deterministic for a fixed `now`.
pub fn seeded_store_at(now: DateTime<Utc>) -> InMemoryClinicStore {
    let today = now.date_naive();
    let mut store = InMemoryClinicStore::new();

    store.add_department(Department {
        id: DepartmentId(101),
        name: "Riverside Primary Care".to_string(),
        specialty: "Family Medicine".to_string(),
    });
    store.add_department(Department {
        id: DepartmentId(102),
        name: "Eastgate Cardiology".to_string(),
        specialty: "Cardiology".to_string(),
    });

    store.add_provider(Provider {
        id: ProviderId(11),
        name: "Dr. Elena Marsh".to_string(),
        provider_type: "Physician".to_string(),
        specialty: "Family Medicine".to_string(),
    });
    store.add_provider(Provider {
        id: ProviderId(12),
        name: "Dr. Samuel Okafor".to_string(),
        provider_type: "Physician".to_string(),
        specialty: "Cardiology".to_string(),
    });
    store.add_provider(Provider {
        id: ProviderId(13),
        name: "Priya Nair, NP".to_string(),
        provider_type: "Nurse Practitioner".to_string(),
        specialty: "Family Medicine".to_string(),
    });

    // (id, age, gender, zip, payer, portal login days ago; None = never activated)
    let roster: [(i64, AgeBucket, Gender, &str, PayerGroup, Option<i64>); 12] = [
        (1, AgeBucket::YoungAdult, Gender::F, "94110", PayerGroup::Commercial, Some(12)),
        (2, AgeBucket::MiddleAged, Gender::M, "94112", PayerGroup::Commercial, None),
        (3, AgeBucket::Senior, Gender::F, "94117", PayerGroup::Medicare, Some(150)),
        (4, AgeBucket::Pediatric, Gender::M, "94110", PayerGroup::Medicaid, Some(5)),
        (5, AgeBucket::YoungAdult, Gender::Other, "94114", PayerGroup::Commercial, Some(30)),
        (6, AgeBucket::MiddleAged, Gender::F, "94121", PayerGroup::Commercial, None),
        (7, AgeBucket::Senior, Gender::M, "94118", PayerGroup::Medicare, Some(45)),
        (8, AgeBucket::YoungAdult, Gender::M, "94112", PayerGroup::SelfPay, None),
        (9, AgeBucket::MiddleAged, Gender::F, "94110", PayerGroup::Commercial, Some(20)),
        (10, AgeBucket::Senior, Gender::F, "94122", PayerGroup::Medicare, None),
        (11, AgeBucket::YoungAdult, Gender::F, "94103", PayerGroup::Medicaid, Some(200)),
        (12, AgeBucket::Pediatric, Gender::F, "94114", PayerGroup::Commercial, Some(8)),
    ];
    for (id, age_bucket, gender, zip, payer_group, login_days_ago) in roster {
        store.add_patient(Patient {
            id: PatientId(id),
            age_bucket,
            gender,
            zip_code: Some(zip.to_string()),
            payer_group,
            portal_last_login: login_days_ago.map(|d| now - Duration::days(d)),
        });
    }

    // Outcome histories, oldest first. `true` marks a no-show.
    let histories: [(i64, &[bool]); 10] = [
        (1, &[false, false, false, false]),
        (2, &[true, false, true, false, true]),
        (3, &[false, false, true, false, false, false]),
        (5, &[true, false]),
        (6, &[false, false, false]),
        (7, &[false, true, false, false, false, true, false, false]),
        (9, &[false, true, true, false]),
        (10, &[false, false, false, true, false, false, false, false, false, false]),
        (11, &[true, false, true]),
        (12, &[false]),
    ];
    for (patient_id, pattern) in histories {
        let outcomes = pattern
            .iter()
            .enumerate()
            .map(|(i, &no_show)| OutcomeRecord {
                appointment_id: AppointmentId(9000 + patient_id * 10 + i as i64),
                date: today - Duration::days(30 * (pattern.len() - i) as i64),
                no_show,
            })
            .collect();
        store.add_outcomes(PatientId(patient_id), outcomes);
    }

    // (id, patient, provider, dept, day offset, hour, minute, duration,
    //  lead-time days, status, modality, new-patient flag)
    #[allow(clippy::type_complexity)]
    let schedule: [(
        i64,
        i64,
        i64,
        i64,
        i64,
        u32,
        u32,
        u32,
        i64,
        AppointmentStatus,
        VirtualFlag,
        NewPatientFlag,
    ); 22] = [
        (1001, 1, 11, 101, 0, 9, 0, 30, 2, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1002, 2, 11, 101, 0, 10, 0, 30, 21, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1003, 3, 12, 102, 0, 11, 0, 45, 10, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1004, 4, 13, 101, 0, 14, 0, 30, 5, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::New),
        (1005, 5, 11, 101, 1, 9, 0, 30, 0, AppointmentStatus::Scheduled, VirtualFlag::VirtualVideo, NewPatientFlag::Established),
        (1006, 6, 13, 101, 1, 10, 30, 30, 14, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1007, 7, 12, 102, 1, 13, 0, 45, 7, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1008, 8, 11, 101, 1, 15, 0, 30, 30, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1009, 9, 12, 102, 2, 9, 30, 30, 18, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1010, 10, 13, 101, 2, 11, 0, 30, 3, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1011, 11, 11, 101, 2, 14, 0, 30, 25, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1012, 12, 13, 101, 3, 9, 0, 30, 6, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::New),
        (1013, 1, 12, 102, 3, 10, 0, 45, 12, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1014, 2, 11, 101, 3, 15, 30, 30, 35, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1015, 5, 13, 101, 4, 9, 0, 30, 1, AppointmentStatus::Scheduled, VirtualFlag::VirtualTelephone, NewPatientFlag::Established),
        (1016, 7, 11, 101, 4, 10, 0, 30, 9, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1017, 3, 13, 101, 4, 13, 30, 30, 4, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1018, 9, 12, 102, 5, 10, 0, 30, 16, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1019, 6, 11, 101, 5, 11, 0, 30, 8, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1020, 10, 12, 102, 6, 9, 0, 30, 2, AppointmentStatus::Scheduled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        // Non-scheduled rows; the engine must skip these.
        (1021, 4, 11, 101, 0, 16, 0, 30, 3, AppointmentStatus::Cancelled, VirtualFlag::NonVirtual, NewPatientFlag::Established),
        (1022, 8, 13, 101, 1, 8, 30, 30, 2, AppointmentStatus::CheckedIn, VirtualFlag::NonVirtual, NewPatientFlag::Established),
    ];
    for (id, patient, provider, dept, day, hour, minute, duration, lead, status, virtual_flag, new_patient_flag) in schedule {
        let start = slot(today + Duration::days(day), hour, minute);
        let scheduled_at = start - Duration::days(lead);
        store.add_appointment(Appointment {
            id: AppointmentId(id),
            patient_id: PatientId(patient),
            provider_id: ProviderId(provider),
            department_id: DepartmentId(dept),
            start,
            duration_minutes: duration,
            created_at: scheduled_at,
            scheduled_at,
            status,
            virtual_flag,
            new_patient_flag,
        });
    }

    store
}

fn slot(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let time = date
        .and_hms_opt(hour, minute, 0)
        .expect("seed slot time in range");
    Utc.from_utc_datetime(&time)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use noshow_contracts::{
        appointment::AppointmentStatus,
        forecast::DateRange,
        ids::{AppointmentId, PatientId},
        patient::HistoryStats,
    };
    use noshow_core::traits::AppointmentStore;

    use super::seeded_store_at;

    fn anchor() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap()
    }

    #[test]
    fn week_window_covers_every_scheduled_slot() {
        let store = seeded_store_at(anchor());
        let range = DateRange::week_of(anchor().date_naive());

        let records = store.fetch_appointments(range).unwrap();
        assert_eq!(records.len(), 22);
        let scheduled = records
            .iter()
            .filter(|r| r.appointment.status == AppointmentStatus::Scheduled)
            .count();
        assert_eq!(scheduled, 20);
    }

    #[test]
    fn histories_match_roster_patterns() {
        let store = seeded_store_at(anchor());

        let stats = HistoryStats::from_outcomes(&store.fetch_history(PatientId(2)).unwrap());
        assert_eq!((stats.total, stats.no_shows), (5, 3));

        let clean = HistoryStats::from_outcomes(&store.fetch_history(PatientId(1)).unwrap());
        assert_eq!((clean.total, clean.no_shows), (4, 0));

        assert!(store.fetch_history(PatientId(8)).unwrap().is_empty());
    }

    #[test]
    fn portal_engagement_is_relative_to_anchor() {
        let store = seeded_store_at(anchor());
        let now = anchor();

        assert!(store.fetch_patient(PatientId(1)).unwrap().portal_engaged(now));
        assert!(!store.fetch_patient(PatientId(2)).unwrap().portal_engaged(now));
        // Logged in 150 days ago: outside the 90-day window.
        assert!(!store.fetch_patient(PatientId(3)).unwrap().portal_engaged(now));
    }

    #[test]
    fn lead_times_are_encoded_in_booking_timestamps() {
        let store = seeded_store_at(anchor());

        let same_day = store.fetch_appointment(AppointmentId(1005)).unwrap();
        assert_eq!(same_day.appointment.lead_time_days(), 0);

        let month_out = store.fetch_appointment(AppointmentId(1014)).unwrap();
        assert_eq!(month_out.appointment.lead_time_days(), 35);
    }

    #[test]
    fn next_appointment_resolves_from_anchor_date() {
        let store = seeded_store_at(anchor());
        let next = store
            .fetch_next_appointment(PatientId(1), anchor().date_naive())
            .unwrap()
            .unwrap();
        assert_eq!(next.appointment.id, AppointmentId(1001));

        let after_first = store
            .fetch_next_appointment(PatientId(1), anchor().date_naive() + Duration::days(1))
            .unwrap()
            .unwrap();
        assert_eq!(after_first.appointment.id, AppointmentId(1013));
    }
}
