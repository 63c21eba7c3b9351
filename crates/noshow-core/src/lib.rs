//! # noshow-core
//!
//! Trait seams and the risk/recommendation engine: classification,
//! forecast aggregation, action planning, and profile resolution over
//! pluggable store, scorer, and fallback implementations.

pub mod actions;
pub mod classify;
pub mod engine;
pub mod forecast;
pub mod infer;
pub mod traits;

pub use engine::{EngineConfig, RiskEngine, ScoredAppointment};
