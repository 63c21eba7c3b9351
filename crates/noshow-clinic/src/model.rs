//! Simulated scoring service.
//!
//! Stands in for the deployed gradient-boosted model behind the inference
//! endpoint. The probability is a deterministic additive function of the
//! feature row, shaped after the factor effects the real model learned:
//! lead time is the strongest signal, then patient history, with smaller
//! demographic and schedule effects. Output is clamped to [0.03, 0.85].
//!
//! `SimulatedModelScorer::unavailable()` builds a scorer whose every call
//! fails with `InferenceUnavailable`, for exercising fallback paths.

use std::collections::HashMap;

use tracing::debug;

use noshow_contracts::{
    appointment::{NewPatientFlag, VirtualFlag},
    error::{EngineError, EngineResult},
    features::{FeatureVector, ModelScore},
    ids::AppointmentId,
    patient::{AgeBucket, PayerGroup},
};
use noshow_core::traits::RiskScorer;

pub const SIMULATED_MODEL_VERSION: &str = "noshow-gbm-2026.02";

const PROBABILITY_FLOOR: f64 = 0.03;
const PROBABILITY_CEILING: f64 = 0.85;

/// Deterministic stand-in for the remote probability model.
pub struct SimulatedModelScorer {
    available: bool,
}

impl Default for SimulatedModelScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedModelScorer {
    pub fn new() -> Self {
        Self { available: true }
    }

    /// A scorer that fails every batch, simulating an endpoint outage.
    pub fn unavailable() -> Self {
        Self { available: false }
    }

    fn probability(features: &FeatureVector) -> f64 {
        let mut p = 0.18;

        // Lead time, the dominant factor.
        p += match features.lead_time_days {
            d if d <= 0 => -0.12,
            d if d <= 3 => -0.06,
            d if d <= 7 => 0.04,
            d if d <= 14 => 0.10,
            d if d <= 30 => 0.14,
            _ => 0.16,
        };

        p += match features.patient_age_bucket {
            AgeBucket::Pediatric => 0.03,
            AgeBucket::YoungAdult => 0.04,
            AgeBucket::MiddleAged => -0.02,
            AgeBucket::Senior => -0.05,
        };

        if features.historical_no_show_count > 0 {
            p += (features.historical_no_show_rate * 0.5).min(0.20);
        } else if features.historical_appointments > 0 {
            p -= 0.08;
        }

        p += match features.payer_group {
            PayerGroup::SelfPay => 0.08,
            PayerGroup::Medicaid => 0.06,
            PayerGroup::Medicare => -0.03,
            PayerGroup::Commercial => 0.0,
        };

        match features.day_of_week {
            0 => p += 0.03,
            4 => p += 0.02,
            _ => {}
        }
        match features.hour_of_day {
            14..=16 => p += 0.02,
            7..=9 => p -= 0.03,
            _ => {}
        }

        if features.new_patient_flag == NewPatientFlag::New {
            p += 0.04;
        }
        match features.virtual_flag {
            VirtualFlag::VirtualVideo => p -= 0.05,
            VirtualFlag::VirtualTelephone => p -= 0.03,
            VirtualFlag::NonVirtual => {}
        }
        if !features.portal_engaged {
            p += 0.03;
        }

        p.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
    }
}

impl RiskScorer for SimulatedModelScorer {
    fn score(
        &self,
        batch: &[FeatureVector],
    ) -> EngineResult<HashMap<AppointmentId, ModelScore>> {
        if !self.available {
            return Err(EngineError::InferenceUnavailable {
                reason: "scoring endpoint unreachable".to_string(),
            });
        }

        debug!(batch_size = batch.len(), "simulated model scoring batch");

        Ok(batch
            .iter()
            .map(|f| {
                (
                    f.appointment_id,
                    ModelScore {
                        probability: Self::probability(f),
                        model_version: SIMULATED_MODEL_VERSION.to_string(),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use noshow_contracts::{
        appointment::{NewPatientFlag, VirtualFlag},
        error::EngineError,
        features::FeatureVector,
        ids::AppointmentId,
        patient::{AgeBucket, Gender, PayerGroup},
    };
    use noshow_core::traits::RiskScorer;

    use super::{SimulatedModelScorer, SIMULATED_MODEL_VERSION};

    fn features(id: i64) -> FeatureVector {
        FeatureVector {
            appointment_id: AppointmentId(id),
            patient_age_bucket: AgeBucket::MiddleAged,
            patient_gender: Gender::F,
            patient_zip_code: Some("94110".to_string()),
            payer_group: PayerGroup::Commercial,
            portal_engaged: true,
            historical_no_show_rate: 0.0,
            historical_no_show_count: 0,
            historical_appointments: 0,
            lead_time_days: 5,
            virtual_flag: VirtualFlag::NonVirtual,
            new_patient_flag: NewPatientFlag::Established,
            day_of_week: 2,
            hour_of_day: 10,
            appointment_duration: 30,
            provider_specialty: "Family Medicine".to_string(),
            department_specialty: "Family Medicine".to_string(),
        }
    }

    #[test]
    fn scores_cover_the_batch_with_version_tag() {
        let scorer = SimulatedModelScorer::new();
        let batch = vec![features(1), features(2), features(3)];

        let scores = scorer.score(&batch).unwrap();
        assert_eq!(scores.len(), 3);
        for score in scores.values() {
            assert!((0.03..=0.85).contains(&score.probability));
            assert_eq!(score.model_version, SIMULATED_MODEL_VERSION);
        }
    }

    #[test]
    fn longer_lead_time_never_lowers_probability() {
        let scorer = SimulatedModelScorer::new();
        let mut previous = 0.0;
        for lead in [0, 2, 5, 10, 20, 40] {
            let mut f = features(1);
            f.lead_time_days = lead;
            let p = scorer.score(&[f]).unwrap()[&AppointmentId(1)].probability;
            assert!(p >= previous, "lead {} lowered probability", lead);
            previous = p;
        }
    }

    #[test]
    fn repeat_no_shower_outranks_perfect_attender() {
        let scorer = SimulatedModelScorer::new();

        let mut risky = features(1);
        risky.historical_no_show_count = 3;
        risky.historical_appointments = 5;
        risky.historical_no_show_rate = 0.6;

        let mut reliable = features(2);
        reliable.historical_appointments = 5;

        let scores = scorer.score(&[risky, reliable]).unwrap();
        assert!(
            scores[&AppointmentId(1)].probability > scores[&AppointmentId(2)].probability
        );
    }

    #[test]
    fn payer_group_orders_risk_self_pay_highest() {
        let scorer = SimulatedModelScorer::new();
        let p = |payer: PayerGroup| {
            let mut f = features(1);
            f.payer_group = payer;
            scorer.score(&[f]).unwrap()[&AppointmentId(1)].probability
        };

        let self_pay = p(PayerGroup::SelfPay);
        let medicaid = p(PayerGroup::Medicaid);
        let commercial = p(PayerGroup::Commercial);
        let medicare = p(PayerGroup::Medicare);

        assert!(self_pay > medicaid);
        assert!(medicaid > commercial);
        assert!(commercial > medicare);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let scorer = SimulatedModelScorer::new();
        let a = scorer.score(&[features(1)]).unwrap()[&AppointmentId(1)].probability;
        let b = scorer.score(&[features(1)]).unwrap()[&AppointmentId(1)].probability;
        assert_eq!(a, b);
    }

    #[test]
    fn unavailable_scorer_fails_the_whole_batch() {
        let scorer = SimulatedModelScorer::unavailable();
        let err = scorer.score(&[features(1)]).unwrap_err();
        assert!(matches!(err, EngineError::InferenceUnavailable { .. }));
    }
}
