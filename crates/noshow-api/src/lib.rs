//! # noshow-api
//!
//! The tool-operation surface of the no-show engine: a closed set of named
//! operations ([`ToolOp`]) and a [`dispatch`] function mapping each one to
//! an engine call. Payloads in and out are JSON values; failures come back
//! as a structured error envelope rather than propagating.

pub mod dispatch;
pub mod ops;

pub use dispatch::{dispatch, error_envelope};
pub use ops::ToolOp;
