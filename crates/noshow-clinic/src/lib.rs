//! Seeded clinic data and a simulated inference model.
//!
//! This crate is the reference environment for the no-show engine: an
//! in-memory [`store::InMemoryClinicStore`] implementing the appointment
//! gateway, a hardcoded week of fictional clinic data in [`seed`], and a
//! deterministic [`model::SimulatedModelScorer`] standing in for the
//! deployed scoring endpoint. Demos and scenario tests run entirely
//! against this crate; no external systems are contacted.

pub mod model;
pub mod seed;
pub mod store;

pub use model::{SimulatedModelScorer, SIMULATED_MODEL_VERSION};
pub use seed::{seeded_store, seeded_store_at};
pub use store::InMemoryClinicStore;
