//! Progress sink port for long-running supervisor operations.
//!
//! The supervisor pushes rendered progress to a sink on every tick of a boot
//! watch or stop. Adapters decide how to show it (terminal bar, chat message
//! edit, nothing at all).

use crate::progress::ProgressUpdate;

/// Port receiving progress updates.
///
/// Implementations must be cheap and must not block; they are called from
/// the caller's control flow once per tick.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait ProgressSink: Send + Sync {
    /// Replace the displayed status with this update.
    fn update(&self, update: &ProgressUpdate);
}

/// Sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn update(&self, _update: &ProgressUpdate) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::StopStage;

    #[test]
    fn test_noop_sink_accepts_updates() {
        NoopProgressSink.update(&ProgressUpdate::Stop(StopStage::Requested));
    }

    #[test]
    fn test_mock_sink_records_calls() {
        let mut sink = MockProgressSink::new();
        sink.expect_update()
            .withf(|u| matches!(u, ProgressUpdate::Stop(StopStage::Requested)))
            .times(1)
            .return_const(());
        sink.update(&ProgressUpdate::Stop(StopStage::Requested));
    }
}
