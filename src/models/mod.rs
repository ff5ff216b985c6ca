//! Reference classifiers: multinomial logistic regression and a one-hidden-
//! layer perceptron. Both use closed-form gradients over ndarray matrices
//! and plain SGD updates.

mod logistic;
mod mlp;

pub use logistic::{LogisticRegression, LogisticSnapshot};
pub use mlp::{Mlp, MlpConfig, MlpSnapshot};

use crate::data::Minibatch;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Row-wise softmax, max-shifted for numerical stability.
pub(crate) fn softmax_rows(logits: &mut Array2<f32>) {
    for mut row in logits.outer_iter_mut() {
        let max = row.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
}

/// Mean negative log-likelihood of the target class under `probs`.
pub(crate) fn negative_log_likelihood(
    probs: &Array2<f32>,
    targets: &ArrayView1<'_, u8>,
) -> Result<f32> {
    let classes = probs.ncols();
    let mut total = 0.0;
    for (row, &label) in probs.outer_iter().zip(targets.iter()) {
        let class = usize::from(label);
        if class >= classes {
            return Err(Error::LabelOutOfRange { label, classes });
        }
        total -= row[class].max(f32::MIN_POSITIVE).ln();
    }
    Ok(total / probs.nrows() as f32)
}

/// Fraction of rows whose most probable class differs from the target.
pub(crate) fn mismatch_rate(probs: &Array2<f32>, targets: &ArrayView1<'_, u8>) -> f32 {
    let mut wrong = 0usize;
    for (row, &label) in probs.outer_iter().zip(targets.iter()) {
        if argmax(&row) != usize::from(label) {
            wrong += 1;
        }
    }
    wrong as f32 / probs.nrows() as f32
}

/// Turn class probabilities into the softmax/NLL output delta,
/// `(probs - onehot(targets)) / batch_len`, reusing the `probs` storage.
pub(crate) fn output_delta(
    mut probs: Array2<f32>,
    targets: &ArrayView1<'_, u8>,
) -> Result<Array2<f32>> {
    let classes = probs.ncols();
    let scale = 1.0 / probs.nrows() as f32;
    for (i, &label) in targets.iter().enumerate() {
        let class = usize::from(label);
        if class >= classes {
            return Err(Error::LabelOutOfRange { label, classes });
        }
        probs[[i, class]] -= 1.0;
    }
    probs.mapv_inplace(|v| v * scale);
    Ok(probs)
}

/// Index of the largest value in a probability row.
fn argmax(row: &ArrayView1<'_, f32>) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// Reject empty or wrong-width batches before any math runs.
pub(crate) fn check_batch(batch: &Minibatch<'_>, expected_features: usize) -> Result<()> {
    if batch.is_empty() {
        return Err(Error::ShapeMismatch {
            expected: "a non-empty batch".to_string(),
            actual: "0 examples".to_string(),
        });
    }
    if batch.num_features() != expected_features {
        return Err(Error::ShapeMismatch {
            expected: format!("{expected_features} features"),
            actual: format!("{} features", batch.num_features()),
        });
    }
    Ok(())
}

/// Logits for one linear layer: `x · w + b`.
pub(crate) fn linear(x: &ArrayView2<'_, f32>, w: &Array2<f32>, b: &Array1<f32>) -> Array2<f32> {
    x.dot(w) + b
}
