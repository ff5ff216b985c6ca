//! The training controller: epoch/minibatch iteration, validation cadence,
//! and the patience stopping criterion.

use super::checkpoint::CheckpointSink;
use super::config::TrainConfig;
use super::observer::{ObserverSet, TrainObserver};
use super::result::{StopReason, TrainReport};
use super::state::TrainingState;
use crate::data::{Dataset, Split};
use crate::error::{Error, Result};
use crate::model::Model;
use std::time::Instant;

/// Runs the mini-batch training loop with patience-based early stopping.
///
/// The controller owns iteration order, the validation cadence, and the
/// stopping decision; the model owns everything numeric. One pass over the
/// training split is an epoch. Every `validation_frequency` steps the model
/// is scored on the validation split; a new best score refreshes the saved
/// snapshot and the test score, and a *significant* improvement extends the
/// patience budget multiplicatively. The run ends when the budget is
/// exhausted or the epoch limit is reached.
///
/// The test split never influences any decision: it is measured only to
/// report alongside whichever model is currently best.
///
/// # Example
///
/// ```no_run
/// use paciencia::models::LogisticRegression;
/// use paciencia::train::{ConsoleReporter, TrainConfig, TrainingController};
/// # fn dataset() -> paciencia::data::InMemoryDataset { unimplemented!() }
///
/// let config = TrainConfig::default().with_learning_rate(0.13).with_batch_size(600);
/// let dataset = dataset();
/// let mut model = LogisticRegression::new(784, 10, config.learning_rate).unwrap();
///
/// let mut controller = TrainingController::new(config).unwrap();
/// controller.add_observer(ConsoleReporter);
/// let report = controller.run(&mut model, &dataset).unwrap();
/// println!("best validation error: {:.2}%", report.best_validation_loss * 100.0);
/// ```
pub struct TrainingController<S> {
    config: TrainConfig,
    observers: ObserverSet,
    checkpoint: Option<Box<dyn CheckpointSink<S>>>,
}

impl<S> TrainingController<S> {
    /// Create a controller for a validated configuration.
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, observers: ObserverSet::new(), checkpoint: None })
    }

    /// The configuration this controller runs with.
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Register a progress observer.
    pub fn add_observer<O: TrainObserver + 'static>(&mut self, observer: O) {
        self.observers.add(observer);
    }

    /// Persist best snapshots through `sink` at each improvement event.
    pub fn set_checkpoint<C: CheckpointSink<S> + 'static>(&mut self, sink: C) {
        self.checkpoint = Some(Box::new(sink));
    }

    /// Train `model` on `dataset` until patience or the epoch limit runs
    /// out.
    ///
    /// Fails fast if any split yields zero batches. Model failures and
    /// non-finite losses abort the run; checkpoint write failures only
    /// warn.
    pub fn run<M, D>(&mut self, model: &mut M, dataset: &D) -> Result<TrainReport<S>>
    where
        M: Model<Snapshot = S>,
        D: Dataset,
    {
        if dataset.batch_size() != self.config.batch_size {
            return Err(Error::config(
                "batch_size",
                format!(
                    "configured {} but the dataset batches {} examples",
                    self.config.batch_size,
                    dataset.batch_size()
                ),
            ));
        }
        let n_train = dataset.num_batches(Split::Train);
        let n_valid = dataset.num_batches(Split::Valid);
        let n_test = dataset.num_batches(Split::Test);
        for (split, n) in [(Split::Train, n_train), (Split::Valid, n_valid), (Split::Test, n_test)]
        {
            if n == 0 {
                return Err(Error::EmptySplit { split });
            }
        }
        let validation_frequency = self.config.effective_validation_frequency(n_train);

        let start = Instant::now();
        let mut state = TrainingState::<S>::new(self.config.initial_patience);
        let mut stop = false;

        while state.epoch < self.config.max_epochs && !stop {
            state.epoch += 1;
            for minibatch_index in 0..n_train {
                let batch = dataset.minibatch(Split::Train, minibatch_index)?;
                let loss = model.train_step(&batch)?;
                state.iter = (state.epoch - 1) * n_train + minibatch_index;
                if !loss.is_finite() {
                    return Err(Error::NonFiniteLoss { epoch: state.epoch, iter: state.iter });
                }

                if (state.iter + 1) % validation_frequency == 0 {
                    let validation_loss =
                        self.mean_error(model, dataset, Split::Valid, n_valid, &state)?;
                    self.observers.on_validation(
                        state.epoch,
                        minibatch_index,
                        n_train,
                        validation_loss,
                    );

                    if validation_loss < state.best_validation_loss {
                        let significant = validation_loss
                            < state.best_validation_loss * self.config.improvement_threshold;
                        if significant {
                            state.patience =
                                state.patience.max(state.iter * self.config.patience_increase);
                        }
                        state.best_validation_loss = validation_loss;
                        state.best_iter = state.iter;
                        state.test_score =
                            self.mean_error(model, dataset, Split::Test, n_test, &state)?;
                        self.observers.on_improvement(
                            state.epoch,
                            minibatch_index,
                            n_train,
                            state.test_score,
                        );

                        let snapshot = model.snapshot();
                        if let Some(sink) = self.checkpoint.as_mut() {
                            if let Err(e) = sink.save(&snapshot) {
                                eprintln!("warning: failed to persist best model: {e}");
                            }
                        }
                        state.best_snapshot = Some(snapshot);
                    }
                }

                if self.config.boundary.exhausted(state.patience, state.iter) {
                    stop = true;
                    break;
                }
            }
        }

        let report = TrainReport {
            best_validation_loss: state.best_validation_loss,
            test_score: state.test_score,
            best_iter: state.best_iter,
            epochs_run: state.epoch,
            stop_reason: if stop { StopReason::PatienceExhausted } else { StopReason::MaxEpochs },
            elapsed_secs: start.elapsed().as_secs_f64(),
            best_snapshot: state.best_snapshot,
        };
        self.observers.on_complete(&report.summary());
        Ok(report)
    }

    /// Mean error rate over every batch of `split`.
    fn mean_error<M, D>(
        &self,
        model: &M,
        dataset: &D,
        split: Split,
        num_batches: usize,
        state: &TrainingState<S>,
    ) -> Result<f32>
    where
        M: Model<Snapshot = S>,
        D: Dataset,
    {
        let mut total = 0.0;
        for index in 0..num_batches {
            let batch = dataset.minibatch(split, index)?;
            let error = model.evaluate(&batch, split)?;
            if !error.is_finite() {
                return Err(Error::NonFiniteLoss { epoch: state.epoch, iter: state.iter });
            }
            total += error;
        }
        Ok(total / num_batches as f32)
    }
}
