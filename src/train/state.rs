//! Mutable state owned by the controller for the duration of one run.

/// Bookkeeping for a single training run. Created when the run starts and
/// consumed into the final report; nothing here outlives the run.
pub(crate) struct TrainingState<S> {
    /// Completed-or-current pass over the training split, starting at 0.
    pub epoch: usize,
    /// Global step: `(epoch - 1) * num_train_batches + minibatch_index`.
    pub iter: usize,
    /// Upper bound on `iter` before stopping is forced. Only ever grows.
    pub patience: usize,
    /// Lowest validation error seen so far. Only ever shrinks.
    pub best_validation_loss: f32,
    /// Global step at which the best validation error was found.
    pub best_iter: usize,
    /// Test error measured at the best validation error. Reporting only.
    pub test_score: f32,
    /// Parameter state captured at the last improvement.
    pub best_snapshot: Option<S>,
}

impl<S> TrainingState<S> {
    pub fn new(initial_patience: usize) -> Self {
        Self {
            epoch: 0,
            iter: 0,
            patience: initial_patience,
            best_validation_loss: f32::INFINITY,
            best_iter: 0,
            test_score: 0.0,
            best_snapshot: None,
        }
    }
}
