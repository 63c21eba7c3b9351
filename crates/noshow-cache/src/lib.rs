//! Caching and audit-log layers for the no-show risk engine.
//!
//! Two concerns live here:
//!
//! - [`CachedScorer`] wraps any [`noshow_core::traits::RiskScorer`] with a
//!   short-TTL score cache, so repeated forecasts over the same window do
//!   not re-invoke the model, and a model outage can be partially absorbed
//!   by recently cached scores.
//! - [`InMemoryPredictionLog`] is an append-only, hash-chained record of
//!   every score the engine produces, with tamper detection.

pub mod log;
pub mod scorer;
pub mod ttl;

pub use log::{verify_chain, InMemoryPredictionLog, LogEntry, GENESIS_HASH};
pub use scorer::{CachedScorer, DEFAULT_SCORE_TTL};
pub use ttl::TtlCache;
