//! Effect interpreter trait.
//!
//! The trait defines how tracking-service effects are executed. The real
//! implementation lives in the `azure` module; tests substitute mocks.
//!
//! The trait-based design enables:
//! - Mock interpreters for testing the orchestration core without I/O
//! - Logging/tracing interpreters
//! - Swapping the backing service without touching the core

use std::future::Future;

use super::tracking::{TrackingEffect, TrackingResponse};

/// Interprets tracking-service effects against the tracking service.
///
/// Implementations are constructed with an organization and project, so all
/// effects executed through a single interpreter instance are scoped to that
/// project.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct MockTracking {
///     responses: HashMap<TrackingEffect, TrackingResponse>,
/// }
///
/// impl TrackingInterpreter for MockTracking {
///     type Error = String;
///
///     async fn interpret(&self, effect: TrackingEffect) -> Result<TrackingResponse, Self::Error> {
///         self.responses.get(&effect)
///             .cloned()
///             .ok_or_else(|| format!("unexpected effect: {:?}", effect))
///     }
/// }
/// ```
pub trait TrackingInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Execute a tracking effect and return its response.
    fn interpret(
        &self,
        effect: TrackingEffect,
    ) -> impl Future<Output = Result<TrackingResponse, Self::Error>> + Send;
}
