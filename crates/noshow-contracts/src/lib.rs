//! # noshow-contracts
//!
//! Shared types and error contracts for the no-show risk engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, wire contracts, and error types.

pub mod action;
pub mod appointment;
pub mod error;
pub mod features;
pub mod forecast;
pub mod ids;
pub mod patient;
pub mod profile;
pub mod risk;
