//! Action planning: classified appointments → prioritized interventions.

use chrono::NaiveDate;
use tracing::debug;

use noshow_contracts::{action::ScheduledAction, risk::RiskTier};

use crate::engine::ScoredAppointment;

/// Derive the prioritized action list for one day's classified appointments.
///
/// One confirmation call per High-tier appointment, ranked by probability
/// descending; ties break by earliest scheduled start, then ascending
/// appointment id — a total order, so output is reproducible regardless of
/// input order. An overbook suggestion follows when the day's expected
/// no-shows floor to at least one slot: count = `floor(Σp)`, capped by
/// `max_overbook` and by `capacity` when supplied. Without capacity
/// information the suggestion is flagged capacity-unverified.
pub fn plan(
    scored: &[ScoredAppointment],
    date: NaiveDate,
    capacity: Option<u32>,
    max_overbook: u32,
) -> Vec<ScheduledAction> {
    let mut high: Vec<&ScoredAppointment> = scored
        .iter()
        .filter(|s| s.tier == RiskTier::High)
        .collect();

    high.sort_by(|a, b| {
        b.score
            .probability
            .total_cmp(&a.score.probability)
            .then(a.record.appointment.start.cmp(&b.record.appointment.start))
            .then(a.record.appointment.id.cmp(&b.record.appointment.id))
    });

    let mut actions: Vec<ScheduledAction> = high
        .iter()
        .enumerate()
        .map(|(i, s)| ScheduledAction::ConfirmationCall {
            priority: i as u32 + 1,
            appointment_id: s.record.appointment.id,
            patient_id: s.record.patient.id,
            scheduled_start: s.record.appointment.start,
            probability: s.score.probability,
            rationale: format!(
                "{:.0}% no-show risk for the {} visit with {}",
                s.score.probability * 100.0,
                s.record.appointment.start.format("%Y-%m-%d %H:%M"),
                s.record.provider.name,
            ),
        })
        .collect();

    let expected: f64 = scored.iter().map(|s| s.score.probability).sum();
    let mut slots = expected.floor() as u32;
    slots = slots.min(max_overbook);
    if let Some(cap) = capacity {
        slots = slots.min(cap);
    }

    if slots >= 1 {
        let capacity_verified = capacity.is_some();
        actions.push(ScheduledAction::OverbookSuggestion {
            priority: actions.len() as u32 + 1,
            date,
            slots,
            expected_no_shows: expected,
            capacity_verified,
            rationale: format!(
                "{:.1} expected no-shows on {}; open {} extra slot{}{}",
                expected,
                date,
                slots,
                if slots == 1 { "" } else { "s" },
                if capacity_verified { "" } else { " (capacity unverified)" },
            ),
        });
    }

    debug!(
        date = %date,
        confirmation_calls = actions.len().saturating_sub(usize::from(slots >= 1)),
        overbook_slots = slots,
        "action plan built"
    );

    actions
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use noshow_contracts::{
        action::ScheduledAction,
        appointment::{
            Appointment, AppointmentRecord, AppointmentStatus, Department, NewPatientFlag,
            Provider, VirtualFlag,
        },
        ids::{AppointmentId, DepartmentId, PatientId, ProviderId},
        patient::{AgeBucket, Gender, Patient, PayerGroup},
        risk::{RiskScore, ScoreSource},
    };

    use crate::classify::classify;
    use crate::engine::ScoredAppointment;

    use super::plan;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 6).unwrap()
    }

    fn scored(id: i64, hour: u32, probability: f64) -> ScoredAppointment {
        let start = Utc.with_ymd_and_hms(2026, 3, 6, hour, 0, 0).unwrap();
        ScoredAppointment {
            record: AppointmentRecord {
                appointment: Appointment {
                    id: AppointmentId(id),
                    patient_id: PatientId(id),
                    provider_id: ProviderId(1),
                    department_id: DepartmentId(1),
                    start,
                    duration_minutes: 30,
                    created_at: start - chrono::Duration::days(10),
                    scheduled_at: start - chrono::Duration::days(10),
                    status: AppointmentStatus::Scheduled,
                    virtual_flag: VirtualFlag::NonVirtual,
                    new_patient_flag: NewPatientFlag::Established,
                },
                patient: Patient {
                    id: PatientId(id),
                    age_bucket: AgeBucket::YoungAdult,
                    gender: Gender::M,
                    zip_code: None,
                    payer_group: PayerGroup::Commercial,
                    portal_last_login: None,
                },
                provider: Provider {
                    id: ProviderId(1),
                    name: "Dr. A. Rivera".to_string(),
                    provider_type: "Physician".to_string(),
                    specialty: "Family Medicine".to_string(),
                },
                department: Department {
                    id: DepartmentId(1),
                    name: "Downtown Clinic".to_string(),
                    specialty: "Family Medicine".to_string(),
                },
            },
            score: RiskScore {
                appointment_id: AppointmentId(id),
                probability,
                source: ScoreSource::Heuristic,
                model_version: None,
                factors: vec![],
            },
            tier: classify(probability),
        }
    }

    fn call_ids(actions: &[ScheduledAction]) -> Vec<i64> {
        actions
            .iter()
            .filter_map(|a| match a {
                ScheduledAction::ConfirmationCall { appointment_id, .. } => Some(appointment_id.0),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn one_call_per_high_tier_appointment_ranked_by_probability() {
        let entries = vec![
            scored(1, 9, 0.65),
            scored(2, 10, 0.90),
            scored(3, 11, 0.45), // Medium: no call
            scored(4, 12, 0.75),
        ];
        let actions = plan(&entries, date(), None, 2);
        assert_eq!(call_ids(&actions), vec![2, 4, 1]);

        // Priorities are a contiguous 1-based ranking.
        let priorities: Vec<u32> = actions.iter().map(|a| a.priority()).collect();
        assert_eq!(priorities, (1..=actions.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn equal_probability_ranks_earlier_start_first() {
        let entries = vec![scored(7, 14, 0.80), scored(8, 9, 0.80)];
        let actions = plan(&entries, date(), None, 2);
        assert_eq!(call_ids(&actions), vec![8, 7]);
    }

    #[test]
    fn equal_probability_and_start_ranks_lower_id_first() {
        let entries = vec![scored(12, 9, 0.80), scored(3, 9, 0.80)];
        let actions = plan(&entries, date(), None, 2);
        assert_eq!(call_ids(&actions), vec![3, 12]);
    }

    #[test]
    fn overbook_count_floors_and_caps_at_maximum() {
        // Expected no-shows = 2.3 → floor 2, within the default cap of 2.
        let entries = vec![
            scored(1, 9, 0.80),
            scored(2, 10, 0.80),
            scored(3, 11, 0.70),
        ];
        let actions = plan(&entries, date(), None, 2);
        match actions.last().unwrap() {
            ScheduledAction::OverbookSuggestion { slots, capacity_verified, expected_no_shows, .. } => {
                assert_eq!(*slots, 2);
                assert!(!*capacity_verified);
                assert!((expected_no_shows - 2.3).abs() < 1e-9);
            }
            other => panic!("expected OverbookSuggestion, got {:?}", other),
        }
    }

    #[test]
    fn overbook_cap_bounds_runaway_expected_sums() {
        // Σp = 4.0 would floor to 4; the per-block cap of 2 must win.
        let entries: Vec<_> = (1..=5).map(|i| scored(i, 9, 0.80)).collect();
        let actions = plan(&entries, date(), None, 2);
        match actions.last().unwrap() {
            ScheduledAction::OverbookSuggestion { slots, .. } => assert_eq!(*slots, 2),
            other => panic!("expected OverbookSuggestion, got {:?}", other),
        }
    }

    #[test]
    fn supplied_capacity_verifies_and_further_caps() {
        let entries: Vec<_> = (1..=4).map(|i| scored(i, 9, 0.80)).collect();
        let actions = plan(&entries, date(), Some(1), 2);
        match actions.last().unwrap() {
            ScheduledAction::OverbookSuggestion { slots, capacity_verified, .. } => {
                assert_eq!(*slots, 1);
                assert!(*capacity_verified);
            }
            other => panic!("expected OverbookSuggestion, got {:?}", other),
        }
    }

    #[test]
    fn no_overbook_when_expected_sum_below_one() {
        let entries = vec![scored(1, 9, 0.40), scored(2, 10, 0.30)];
        let actions = plan(&entries, date(), None, 2);
        assert!(actions
            .iter()
            .all(|a| !matches!(a, ScheduledAction::OverbookSuggestion { .. })));
    }

    #[test]
    fn empty_day_produces_no_actions() {
        assert!(plan(&[], date(), None, 2).is_empty());
    }

    #[test]
    fn actions_serialize_with_kind_discriminator() {
        let entries = vec![scored(1, 9, 0.90), scored(2, 10, 0.90)];
        let actions = plan(&entries, date(), None, 2);
        let json = serde_json::to_value(&actions).unwrap();

        assert_eq!(json[0]["kind"], "confirmationCall");
        assert_eq!(json[0]["appointmentId"], 1);
        let last = json.as_array().unwrap().last().unwrap().clone();
        assert_eq!(last["kind"], "overbookSuggestion");
        assert_eq!(last["capacityVerified"], false);
    }
}
