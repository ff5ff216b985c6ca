//! Reporting hooks for training runs.
//!
//! Observers are strictly informational: they see validation results,
//! improvements, and the final summary, but they cannot influence the
//! loop. Stopping belongs to the controller's patience logic alone.

use super::result::TrainSummary;

/// Receives progress events during a run. All methods default to no-ops,
/// so implementors pick the events they care about.
pub trait TrainObserver: Send {
    /// A validation pass finished. `validation_error` is the mean error
    /// rate over the validation split, in `[0, 1]`.
    fn on_validation(
        &mut self,
        _epoch: usize,
        _minibatch_index: usize,
        _num_train_batches: usize,
        _validation_error: f32,
    ) {
    }

    /// A validation pass found a new best model. `test_error` is the mean
    /// test-split error rate measured at that model.
    fn on_improvement(
        &mut self,
        _epoch: usize,
        _minibatch_index: usize,
        _num_train_batches: usize,
        _test_error: f32,
    ) {
    }

    /// The run finished.
    fn on_complete(&mut self, _summary: &TrainSummary) {}
}

/// Dispatches events to a list of observers in registration order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn TrainObserver>>,
}

impl ObserverSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    /// Register an observer.
    pub fn add<O: TrainObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn on_validation(
        &mut self,
        epoch: usize,
        minibatch_index: usize,
        num_train_batches: usize,
        validation_error: f32,
    ) {
        for observer in &mut self.observers {
            observer.on_validation(epoch, minibatch_index, num_train_batches, validation_error);
        }
    }

    pub(crate) fn on_improvement(
        &mut self,
        epoch: usize,
        minibatch_index: usize,
        num_train_batches: usize,
        test_error: f32,
    ) {
        for observer in &mut self.observers {
            observer.on_improvement(epoch, minibatch_index, num_train_batches, test_error);
        }
    }

    pub(crate) fn on_complete(&mut self, summary: &TrainSummary) {
        for observer in &mut self.observers {
            observer.on_complete(summary);
        }
    }
}

/// Prints progress in the classic percentage format.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleReporter;

impl TrainObserver for ConsoleReporter {
    fn on_validation(
        &mut self,
        epoch: usize,
        minibatch_index: usize,
        num_train_batches: usize,
        validation_error: f32,
    ) {
        println!(
            "epoch {epoch}, minibatch {}/{num_train_batches}, validation error {:.4}%",
            minibatch_index + 1,
            validation_error * 100.0
        );
    }

    fn on_improvement(
        &mut self,
        epoch: usize,
        minibatch_index: usize,
        num_train_batches: usize,
        test_error: f32,
    ) {
        println!(
            "  epoch {epoch}, minibatch {}/{num_train_batches}, test error of best model {:.4}%",
            minibatch_index + 1,
            test_error * 100.0
        );
    }

    fn on_complete(&mut self, summary: &TrainSummary) {
        println!(
            "Training complete: best validation error {:.4}%, test error {:.4}%",
            summary.best_validation_loss * 100.0,
            summary.test_score * 100.0
        );
        println!(
            "Ran {} epochs in {:.1}s",
            summary.epochs_run, summary.elapsed_secs
        );
    }
}
