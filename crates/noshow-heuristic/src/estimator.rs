//! The rule-based fallback estimator.
//!
//! Deterministic, total, and never failing: for any well-formed feature
//! vector it produces a probability in [0,1] plus an ordered explanation.
//! This is the guarantee that lets the engine answer even when the remote
//! model is down.

use tracing::debug;

use noshow_contracts::appointment::NewPatientFlag;
use noshow_contracts::features::FeatureVector;
use noshow_contracts::patient::PayerGroup;
use noshow_core::traits::FallbackEstimator;

use crate::config::HeuristicConfig;

/// One applied adjustment, kept for explanation ordering.
struct Signal {
    label: String,
    delta: f64,
}

/// Rule-based estimator over configured weights.
pub struct HeuristicEstimator {
    config: HeuristicConfig,
}

impl HeuristicEstimator {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    /// Estimator with the default calibrated weights.
    pub fn with_defaults() -> Self {
        Self::new(HeuristicConfig::default())
    }

    fn lead_time_signal(&self, days: i64) -> Signal {
        let w = &self.config.lead_time;
        let (delta, label) = if days <= 0 {
            (w.same_day, "same-day booking".to_string())
        } else if days <= 3 {
            (w.within_3, format!("short lead time ({} days)", days))
        } else if days <= 7 {
            (w.within_7, format!("one-week lead time ({} days)", days))
        } else if days <= 14 {
            (w.within_14, format!("two-week lead time ({} days)", days))
        } else if days <= 30 {
            (w.within_30, format!("long lead time ({} days)", days))
        } else {
            (w.beyond_30, format!("very long lead time ({} days)", days))
        };
        Signal { label, delta }
    }
}

impl FallbackEstimator for HeuristicEstimator {
    fn estimate(&self, features: &FeatureVector) -> (f64, Vec<String>) {
        let cfg = &self.config;
        let mut signals: Vec<Signal> = Vec::new();

        signals.push(self.lead_time_signal(features.lead_time_days));

        if !features.portal_engaged {
            signals.push(Signal {
                label: "no recent portal activity".to_string(),
                delta: cfg.no_portal_activity,
            });
        }

        if features.new_patient_flag == NewPatientFlag::New {
            signals.push(Signal {
                label: "new patient".to_string(),
                delta: cfg.new_patient,
            });
        }

        match features.payer_group {
            PayerGroup::SelfPay => signals.push(Signal {
                label: "self-pay coverage".to_string(),
                delta: cfg.payer.self_pay,
            }),
            PayerGroup::Medicaid => signals.push(Signal {
                label: "Medicaid coverage".to_string(),
                delta: cfg.payer.medicaid,
            }),
            PayerGroup::Medicare => signals.push(Signal {
                label: "Medicare coverage".to_string(),
                delta: cfg.payer.medicare,
            }),
            PayerGroup::Commercial => {}
        }

        // The patient's own record outweighs the structural signals, but
        // only once the sample is large enough to mean something.
        if features.historical_appointments >= cfg.history_min_samples {
            if features.historical_no_show_count > 0 {
                let delta = (features.historical_no_show_rate * cfg.history_weight)
                    .min(cfg.history_cap);
                signals.push(Signal {
                    label: format!(
                        "prior no-show rate {:.0}% over {} visits",
                        features.historical_no_show_rate * 100.0,
                        features.historical_appointments
                    ),
                    delta,
                });
            } else {
                signals.push(Signal {
                    label: format!(
                        "perfect attendance over {} visits",
                        features.historical_appointments
                    ),
                    delta: -cfg.perfect_attendance,
                });
            }
        }

        let raw: f64 = cfg.base_rate + signals.iter().map(|s| s.delta).sum::<f64>();
        let probability = raw.clamp(cfg.floor, cfg.ceiling);

        // Strongest contribution first; equal magnitudes keep rule order.
        signals.sort_by(|a, b| b.delta.abs().total_cmp(&a.delta.abs()));
        let factors: Vec<String> = signals.into_iter().map(|s| s.label).collect();

        debug!(
            appointment_id = %features.appointment_id,
            probability,
            "heuristic estimate"
        );

        (probability, factors)
    }
}
