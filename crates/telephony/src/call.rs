//! Call control
//!
//! Hanging up the live call after the closing narration has played. The
//! runtime integration supplies a real implementation; the library ships a
//! no-op and a test double.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::TelephonyError;

/// Terminates the live call.
#[async_trait]
pub trait CallControl: Send + Sync {
    /// Hang up. Must only be invoked after in-flight narration has
    /// finished playing so the closing sentence is not cut off.
    async fn hang_up(&self) -> Result<(), TelephonyError>;
}

/// Logs the hang-up request without doing anything. Used when no transport
/// is attached (local runs, unit tests that don't assert on hang-up).
#[derive(Debug, Default)]
pub struct NoopCallControl;

#[async_trait]
impl CallControl for NoopCallControl {
    async fn hang_up(&self) -> Result<(), TelephonyError> {
        tracing::info!("hang-up requested (no transport attached)");
        Ok(())
    }
}

/// Test double counting hang-ups.
#[derive(Debug, Default)]
pub struct SimulatedCallControl {
    hang_ups: AtomicUsize,
}

impl SimulatedCallControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hang_up_count(&self) -> usize {
        self.hang_ups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallControl for SimulatedCallControl {
    async fn hang_up(&self) -> Result<(), TelephonyError> {
        self.hang_ups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
