//! Training run results.

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The patience budget ran out before the epoch limit.
    PatienceExhausted,
    /// The configured epoch limit was reached.
    MaxEpochs,
}

/// Result of a completed training run.
#[derive(Clone, Debug)]
pub struct TrainReport<S> {
    /// Lowest validation error rate reached.
    pub best_validation_loss: f32,
    /// Test error rate measured when the best validation error was found.
    pub test_score: f32,
    /// Global step at which the best validation error was found.
    pub best_iter: usize,
    /// Epochs actually run.
    pub epochs_run: usize,
    /// Why the run ended.
    pub stop_reason: StopReason,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
    /// Parameter state at the best validation error. Absent only if no
    /// validation pass ever ran.
    pub best_snapshot: Option<S>,
}

/// Snapshot-free summary handed to observers when a run completes.
#[derive(Clone, Copy, Debug)]
pub struct TrainSummary {
    /// Lowest validation error rate reached.
    pub best_validation_loss: f32,
    /// Test error rate at the best validation error.
    pub test_score: f32,
    /// Epochs actually run.
    pub epochs_run: usize,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
}

impl<S> TrainReport<S> {
    /// The observer-facing summary of this report.
    pub fn summary(&self) -> TrainSummary {
        TrainSummary {
            best_validation_loss: self.best_validation_loss,
            test_score: self.test_score,
            epochs_run: self.epochs_run,
            elapsed_secs: self.elapsed_secs,
        }
    }
}
