//! Training configuration and the patience stopping boundary.

use crate::error::{Error, Result};

/// Which side of the patience budget ends the run.
///
/// The historical renditions of this loop disagree by one step: one stops
/// as soon as the global step reaches the budget, the other allows a single
/// extra step. Both are available; `Inclusive` is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatienceBoundary {
    /// Stop the first time `iter >= patience`.
    #[default]
    Inclusive,
    /// Stop the first time `iter > patience`, allowing one extra step.
    Exclusive,
}

impl PatienceBoundary {
    /// Whether the patience budget is exhausted at global step `iter`.
    pub fn exhausted(self, patience: usize, iter: usize) -> bool {
        match self {
            PatienceBoundary::Inclusive => patience <= iter,
            PatienceBoundary::Exclusive => patience < iter,
        }
    }
}

/// Configuration for a training run.
///
/// # Example
///
/// ```
/// use paciencia::train::TrainConfig;
///
/// let config = TrainConfig::default()
///     .with_max_epochs(100)
///     .with_initial_patience(5000)
///     .with_improvement_threshold(0.995);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TrainConfig {
    /// SGD step size, consumed by the model's update rule. The controller
    /// carries it so one value configures the whole run.
    pub learning_rate: f32,
    /// Hard upper bound on passes over the training split.
    pub max_epochs: usize,
    /// Examples per minibatch.
    pub batch_size: usize,
    /// Initial patience budget, counted in global steps.
    pub initial_patience: usize,
    /// Multiplier applied to the current step when patience is extended.
    pub patience_increase: usize,
    /// Relative-improvement fraction below which an improvement counts as
    /// significant (e.g. 0.995 requires at least a 0.5% relative gain).
    pub improvement_threshold: f32,
    /// Steps between validation passes. `None` derives
    /// `min(num_train_batches, initial_patience / 2)`, clamped to 1.
    pub validation_frequency: Option<usize>,
    /// Stopping boundary variant.
    pub boundary: PatienceBoundary,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_epochs: 1000,
            batch_size: 20,
            initial_patience: 5000,
            patience_increase: 2,
            improvement_threshold: 0.995,
            validation_frequency: None,
            boundary: PatienceBoundary::Inclusive,
        }
    }
}

impl TrainConfig {
    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the epoch limit.
    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    /// Set the minibatch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the initial patience budget.
    pub fn with_initial_patience(mut self, initial_patience: usize) -> Self {
        self.initial_patience = initial_patience;
        self
    }

    /// Set the patience extension multiplier.
    pub fn with_patience_increase(mut self, patience_increase: usize) -> Self {
        self.patience_increase = patience_increase;
        self
    }

    /// Set the significant-improvement threshold.
    pub fn with_improvement_threshold(mut self, improvement_threshold: f32) -> Self {
        self.improvement_threshold = improvement_threshold;
        self
    }

    /// Fix the validation cadence instead of deriving it.
    pub fn with_validation_frequency(mut self, steps: usize) -> Self {
        self.validation_frequency = Some(steps);
        self
    }

    /// Choose the stopping boundary variant.
    pub fn with_boundary(mut self, boundary: PatienceBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Check every field, reporting the first offending one.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::config("learning_rate", "must be a positive finite number"));
        }
        if self.max_epochs == 0 {
            return Err(Error::config("max_epochs", "must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(Error::config("batch_size", "must be at least 1"));
        }
        if self.initial_patience == 0 {
            return Err(Error::config("initial_patience", "must be at least 1"));
        }
        if self.patience_increase == 0 {
            return Err(Error::config("patience_increase", "must be at least 1"));
        }
        if !(self.improvement_threshold > 0.0 && self.improvement_threshold <= 1.0) {
            return Err(Error::config("improvement_threshold", "must be within (0, 1]"));
        }
        if self.validation_frequency == Some(0) {
            return Err(Error::config("validation_frequency", "must be at least 1"));
        }
        Ok(())
    }

    /// Steps between validation passes for a training split of
    /// `num_train_batches` batches.
    pub fn effective_validation_frequency(&self, num_train_batches: usize) -> usize {
        match self.validation_frequency {
            Some(steps) => steps,
            None => num_train_batches.min(self.initial_patience / 2).max(1),
        }
    }
}
