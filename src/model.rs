//! The model seam: everything numeric lives behind this trait.
//!
//! The training controller drives a model one minibatch at a time and never
//! looks inside it. Gradients, parameter layout, and the update rule are the
//! implementor's business; the controller only sees scalar losses, scalar
//! error rates, and opaque snapshots.

use crate::data::{Minibatch, Split};
use crate::error::Result;

/// A trainable classifier as seen by the controller.
pub trait Model {
    /// Persistable parameter state, captured at improvement events.
    type Snapshot;

    /// Apply one gradient update on `batch` and return the batch loss
    /// measured at the pre-update parameters.
    fn train_step(&mut self, batch: &Minibatch<'_>) -> Result<f32>;

    /// Error rate in `[0, 1]` on `batch`. Read-only: parameters are not
    /// touched. `split` identifies which split the batch was drawn from.
    fn evaluate(&self, batch: &Minibatch<'_>, split: Split) -> Result<f32>;

    /// Capture the current parameter state.
    fn snapshot(&self) -> Self::Snapshot;
}
