//! # noshow-heuristic
//!
//! The deterministic fallback estimator for no-show risk.
//!
//! When the remote scoring service is unavailable or times out, the engine
//! routes affected appointments here. The estimate is an additive model over
//! structural signals — lead time, portal engagement, new-vs-established,
//! payer grouping — with the patient's own no-show history dominating once
//! enough samples exist. Weights are tunable from TOML; defaults carry the calibration of
//! the production model's training data.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use noshow_heuristic::{HeuristicConfig, HeuristicEstimator};
//!
//! let estimator = HeuristicEstimator::with_defaults();
//! // Or override weights:
//! let estimator = HeuristicEstimator::new(HeuristicConfig::from_file(path)?);
//! ```

pub mod config;
pub mod estimator;

pub use config::{HeuristicConfig, LeadTimeWeights, PayerWeights};
pub use estimator::HeuristicEstimator;
