//! One-hidden-layer perceptron: tanh hidden units feeding a softmax output
//! layer, with optional L1/L2 weight penalties.

use super::{
    check_batch, linear, mismatch_rate, negative_log_likelihood, output_delta, softmax_rows,
};
use crate::data::{Minibatch, Split};
use crate::error::{Error, Result};
use crate::model::Model;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

/// Hyperparameters for an [`Mlp`].
#[derive(Clone, Copy, Debug)]
pub struct MlpConfig {
    /// Input feature count.
    pub n_in: usize,
    /// Hidden unit count.
    pub n_hidden: usize,
    /// Output class count.
    pub n_out: usize,
    /// SGD step size.
    pub learning_rate: f32,
    /// L1 penalty weight on both weight matrices (biases unpenalized).
    pub l1: f32,
    /// L2 penalty weight on both weight matrices.
    pub l2: f32,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self { n_in: 784, n_hidden: 500, n_out: 10, learning_rate: 0.01, l1: 0.0, l2: 1e-4 }
    }
}

/// Two-layer classifier: `softmax(tanh(x · w1 + b1) · w2 + b2)`.
///
/// Hidden weights are drawn uniformly from `±sqrt(6 / (n_in + n_hidden))`,
/// the range that keeps tanh activations out of saturation at the start of
/// training; the output layer starts at zero like a plain logistic
/// classifier. Pass a seeded RNG for reproducible runs.
pub struct Mlp {
    w1: Array2<f32>,
    b1: Array1<f32>,
    w2: Array2<f32>,
    b2: Array1<f32>,
    config: MlpConfig,
}

/// Serializable parameter state of an [`Mlp`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MlpSnapshot {
    /// Input feature count.
    pub n_in: usize,
    /// Hidden unit count.
    pub n_hidden: usize,
    /// Output class count.
    pub n_out: usize,
    /// Hidden weights, row-major `n_in × n_hidden`.
    pub w1: Vec<f32>,
    /// Hidden bias.
    pub b1: Vec<f32>,
    /// Output weights, row-major `n_hidden × n_out`.
    pub w2: Vec<f32>,
    /// Output bias.
    pub b2: Vec<f32>,
}

impl Mlp {
    /// Create a randomly initialized perceptron.
    pub fn new(config: MlpConfig, rng: &mut StdRng) -> Result<Self> {
        if config.n_in == 0 || config.n_hidden == 0 || config.n_out == 0 {
            return Err(Error::config("dimensions", "layer sizes must be at least 1"));
        }
        if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
            return Err(Error::config("learning_rate", "must be a positive finite number"));
        }
        if config.l1 < 0.0 || config.l2 < 0.0 || !config.l1.is_finite() || !config.l2.is_finite()
        {
            return Err(Error::config("penalty", "l1 and l2 must be non-negative"));
        }
        let bound = (6.0 / (config.n_in + config.n_hidden) as f32).sqrt();
        Ok(Self {
            w1: Array2::random_using(
                (config.n_in, config.n_hidden),
                Uniform::new(-bound, bound),
                rng,
            ),
            b1: Array1::zeros(config.n_hidden),
            w2: Array2::zeros((config.n_hidden, config.n_out)),
            b2: Array1::zeros(config.n_out),
            config,
        })
    }

    /// Rebuild a perceptron from a persisted snapshot.
    pub fn from_snapshot(snapshot: &MlpSnapshot, learning_rate: f32, l1: f32, l2: f32) -> Result<Self> {
        let expected = [
            snapshot.n_in * snapshot.n_hidden,
            snapshot.n_hidden,
            snapshot.n_hidden * snapshot.n_out,
            snapshot.n_out,
        ];
        let actual = [snapshot.w1.len(), snapshot.b1.len(), snapshot.w2.len(), snapshot.b2.len()];
        if expected != actual {
            return Err(Error::Serialization(format!(
                "snapshot data does not match {}x{}x{} dimensions",
                snapshot.n_in, snapshot.n_hidden, snapshot.n_out
            )));
        }
        let config = MlpConfig {
            n_in: snapshot.n_in,
            n_hidden: snapshot.n_hidden,
            n_out: snapshot.n_out,
            learning_rate,
            l1,
            l2,
        };
        Ok(Self {
            w1: Array2::from_shape_vec((config.n_in, config.n_hidden), snapshot.w1.clone())
                .map_err(|e| Error::Serialization(e.to_string()))?,
            b1: Array1::from_vec(snapshot.b1.clone()),
            w2: Array2::from_shape_vec((config.n_hidden, config.n_out), snapshot.w2.clone())
                .map_err(|e| Error::Serialization(e.to_string()))?,
            b2: Array1::from_vec(snapshot.b2.clone()),
            config,
        })
    }

    /// Input feature count.
    pub fn num_features(&self) -> usize {
        self.config.n_in
    }

    /// Output class count.
    pub fn num_classes(&self) -> usize {
        self.config.n_out
    }

    /// Hidden activations for a batch of inputs.
    fn hidden(&self, inputs: &ArrayView2<'_, f32>) -> Array2<f32> {
        linear(inputs, &self.w1, &self.b1).mapv(f32::tanh)
    }

    /// Class probabilities for a batch of inputs.
    pub fn predict_proba(&self, inputs: &ArrayView2<'_, f32>) -> Array2<f32> {
        let hidden = self.hidden(inputs);
        let mut logits = linear(&hidden.view(), &self.w2, &self.b2);
        softmax_rows(&mut logits);
        logits
    }

    /// Sum of `l1 * Σ|w| + l2 * Σw²` over both weight matrices.
    fn penalty(&self) -> f32 {
        let abs_sum = self.w1.mapv(f32::abs).sum() + self.w2.mapv(f32::abs).sum();
        let sq_sum = self.w1.mapv(|v| v * v).sum() + self.w2.mapv(|v| v * v).sum();
        self.config.l1 * abs_sum + self.config.l2 * sq_sum
    }

    /// Penalty gradient for one weight matrix: `l1 * sign(w) + 2 * l2 * w`.
    fn penalty_grad(&self, w: &Array2<f32>) -> Array2<f32> {
        w.mapv(|v| self.config.l1 * v.signum() + 2.0 * self.config.l2 * v)
    }
}

impl Model for Mlp {
    type Snapshot = MlpSnapshot;

    fn train_step(&mut self, batch: &Minibatch<'_>) -> Result<f32> {
        check_batch(batch, self.config.n_in)?;
        let hidden = self.hidden(&batch.inputs);
        let mut probs = linear(&hidden.view(), &self.w2, &self.b2);
        softmax_rows(&mut probs);
        let loss = negative_log_likelihood(&probs, &batch.targets)? + self.penalty();

        // Output layer gradient, then backprop through tanh.
        let delta2 = output_delta(probs, &batch.targets)?;
        let grad_w2 = hidden.t().dot(&delta2) + self.penalty_grad(&self.w2);
        let grad_b2 = delta2.sum_axis(Axis(0));

        let tanh_grad = hidden.mapv(|a| 1.0 - a * a);
        let delta1 = delta2.dot(&self.w2.t()) * &tanh_grad;
        let grad_w1 = batch.inputs.t().dot(&delta1) + self.penalty_grad(&self.w1);
        let grad_b1 = delta1.sum_axis(Axis(0));

        let lr = self.config.learning_rate;
        self.w2 -= &(grad_w2 * lr);
        self.b2 -= &(grad_b2 * lr);
        self.w1 -= &(grad_w1 * lr);
        self.b1 -= &(grad_b1 * lr);
        Ok(loss)
    }

    fn evaluate(&self, batch: &Minibatch<'_>, _split: Split) -> Result<f32> {
        check_batch(batch, self.config.n_in)?;
        let probs = self.predict_proba(&batch.inputs);
        Ok(mismatch_rate(&probs, &batch.targets))
    }

    fn snapshot(&self) -> MlpSnapshot {
        MlpSnapshot {
            n_in: self.config.n_in,
            n_hidden: self.config.n_hidden,
            n_out: self.config.n_out,
            w1: self.w1.iter().copied().collect(),
            b1: self.b1.iter().copied().collect(),
            w2: self.w2.iter().copied().collect(),
            b2: self.b2.iter().copied().collect(),
        }
    }
}
