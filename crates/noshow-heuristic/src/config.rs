//! Heuristic weight configuration.
//!
//! Weights are additive probability adjustments applied on top of the base
//! rate. Defaults carry the calibration of the production model's training
//! data; deployments can override any subset from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use noshow_contracts::error::{EngineError, EngineResult};

/// Additive adjustments keyed by lead-time bracket (days between booking
/// and visit). Longer lead time raises risk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadTimeWeights {
    /// Booked the same day as the visit.
    pub same_day: f64,
    /// 1-3 days out.
    pub within_3: f64,
    /// 4-7 days out.
    pub within_7: f64,
    /// 8-14 days out.
    pub within_14: f64,
    /// 15-30 days out.
    pub within_30: f64,
    /// More than 30 days out.
    pub beyond_30: f64,
}

impl Default for LeadTimeWeights {
    fn default() -> Self {
        Self {
            same_day: -0.12,
            within_3: -0.06,
            within_7: 0.04,
            within_14: 0.10,
            within_30: 0.14,
            beyond_30: 0.16,
        }
    }
}

/// Additive adjustments keyed by insurance payer grouping. Commercial
/// coverage is the baseline and carries no weight of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayerWeights {
    pub self_pay: f64,
    pub medicaid: f64,
    pub medicare: f64,
}

impl Default for PayerWeights {
    fn default() -> Self {
        Self {
            self_pay: 0.08,
            medicaid: 0.06,
            medicare: -0.03,
        }
    }
}

/// The full heuristic weight set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Baseline no-show probability before adjustments.
    pub base_rate: f64,
    pub lead_time: LeadTimeWeights,
    pub payer: PayerWeights,
    /// Added when the patient shows no recent portal activity.
    pub no_portal_activity: f64,
    /// Added for new-patient visits.
    pub new_patient: f64,
    /// Minimum historical sample size before the patient's own no-show
    /// rate dominates the structural signals. Tunable, not a fixed law.
    pub history_min_samples: u32,
    /// Multiplier applied to the historical rate when it qualifies.
    pub history_weight: f64,
    /// Upper bound on the historical adjustment.
    pub history_cap: f64,
    /// Subtracted for a qualifying history with zero no-shows.
    pub perfect_attendance: f64,
    /// Final clamp bounds; must sit inside [0,1].
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.18,
            lead_time: LeadTimeWeights::default(),
            payer: PayerWeights::default(),
            no_portal_activity: 0.03,
            new_patient: 0.04,
            history_min_samples: 3,
            history_weight: 0.5,
            history_cap: 0.20,
            perfect_attendance: 0.08,
            floor: 0.03,
            ceiling: 0.85,
        }
    }
}

impl HeuristicConfig {
    /// Parse a TOML document into a config, filling omitted fields with
    /// defaults. Malformed input is a `ConfigError`.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::ConfigError {
            reason: format!("failed to parse heuristic TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the file at `path`.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigError {
            reason: format!("failed to read heuristic config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.floor)
            || !(0.0..=1.0).contains(&self.ceiling)
            || self.floor > self.ceiling
        {
            return Err(EngineError::ConfigError {
                reason: format!(
                    "clamp bounds [{}, {}] must be an interval inside [0,1]",
                    self.floor, self.ceiling
                ),
            });
        }
        if self.history_weight < 0.0 || self.history_cap < 0.0 {
            return Err(EngineError::ConfigError {
                reason: "history weight and cap must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}
