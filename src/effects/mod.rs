//! Effects-as-data for tracking-service operations.
//!
//! This module defines effect types that describe operations without
//! executing them. This enables:
//! - Pure orchestration logic that issues effects as data
//! - Testability via mock interpreters
//! - Logging/tracing of intended operations
//!
//! The interpreter that executes these effects against the real service is
//! in the `azure` module.

pub mod interpreter;
pub mod tracking;

pub use interpreter::TrackingInterpreter;
pub use tracking::{TrackingEffect, TrackingResponse};
