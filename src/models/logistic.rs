//! Multinomial logistic regression trained with plain SGD.

use super::{
    check_batch, linear, mismatch_rate, negative_log_likelihood, output_delta, softmax_rows,
};
use crate::data::{Minibatch, Split};
use crate::error::{Error, Result};
use crate::model::Model;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Softmax classifier: `p(y | x) = softmax(x · w + b)`.
///
/// Weights start at zero, the classic initialization for a convex loss.
/// Each `train_step` applies one SGD update from the closed-form gradient
/// of the mean negative log-likelihood.
///
/// # Example
///
/// ```
/// use paciencia::models::LogisticRegression;
///
/// let model = LogisticRegression::new(64, 10, 0.13).unwrap();
/// assert_eq!(model.num_features(), 64);
/// assert_eq!(model.num_classes(), 10);
/// ```
pub struct LogisticRegression {
    w: Array2<f32>,
    b: Array1<f32>,
    learning_rate: f32,
}

/// Serializable parameter state of a [`LogisticRegression`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogisticSnapshot {
    /// Input feature count.
    pub n_in: usize,
    /// Output class count.
    pub n_out: usize,
    /// Weight matrix, row-major `n_in × n_out`.
    pub w: Vec<f32>,
    /// Per-class bias.
    pub b: Vec<f32>,
}

impl LogisticRegression {
    /// Create a zero-initialized classifier mapping `n_in` features to
    /// `n_out` classes.
    pub fn new(n_in: usize, n_out: usize, learning_rate: f32) -> Result<Self> {
        if n_in == 0 || n_out == 0 {
            return Err(Error::config("dimensions", "n_in and n_out must be at least 1"));
        }
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(Error::config("learning_rate", "must be a positive finite number"));
        }
        Ok(Self {
            w: Array2::zeros((n_in, n_out)),
            b: Array1::zeros(n_out),
            learning_rate,
        })
    }

    /// Rebuild a classifier from a persisted snapshot.
    pub fn from_snapshot(snapshot: &LogisticSnapshot, learning_rate: f32) -> Result<Self> {
        let mut model = Self::new(snapshot.n_in, snapshot.n_out, learning_rate)?;
        if snapshot.w.len() != snapshot.n_in * snapshot.n_out
            || snapshot.b.len() != snapshot.n_out
        {
            return Err(Error::Serialization(format!(
                "snapshot data does not match {}x{} dimensions",
                snapshot.n_in, snapshot.n_out
            )));
        }
        model.w = Array2::from_shape_vec((snapshot.n_in, snapshot.n_out), snapshot.w.clone())
            .map_err(|e| Error::Serialization(e.to_string()))?;
        model.b = Array1::from_vec(snapshot.b.clone());
        Ok(model)
    }

    /// Input feature count.
    pub fn num_features(&self) -> usize {
        self.w.nrows()
    }

    /// Output class count.
    pub fn num_classes(&self) -> usize {
        self.w.ncols()
    }

    /// Class probabilities for a batch of inputs.
    pub fn predict_proba(&self, inputs: &ArrayView2<'_, f32>) -> Array2<f32> {
        let mut logits = linear(inputs, &self.w, &self.b);
        softmax_rows(&mut logits);
        logits
    }
}

impl Model for LogisticRegression {
    type Snapshot = LogisticSnapshot;

    fn train_step(&mut self, batch: &Minibatch<'_>) -> Result<f32> {
        check_batch(batch, self.num_features())?;
        let probs = self.predict_proba(&batch.inputs);
        let loss = negative_log_likelihood(&probs, &batch.targets)?;

        let delta = output_delta(probs, &batch.targets)?;
        let grad_w = batch.inputs.t().dot(&delta);
        let grad_b = delta.sum_axis(Axis(0));
        self.w -= &(grad_w * self.learning_rate);
        self.b -= &(grad_b * self.learning_rate);
        Ok(loss)
    }

    fn evaluate(&self, batch: &Minibatch<'_>, _split: Split) -> Result<f32> {
        check_batch(batch, self.num_features())?;
        let probs = self.predict_proba(&batch.inputs);
        Ok(mismatch_rate(&probs, &batch.targets))
    }

    fn snapshot(&self) -> LogisticSnapshot {
        LogisticSnapshot {
            n_in: self.num_features(),
            n_out: self.num_classes(),
            w: self.w.iter().copied().collect(),
            b: self.b.iter().copied().collect(),
        }
    }
}
