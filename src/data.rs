//! Dataset abstraction: fixed splits sliced into fixed-size minibatches.
//!
//! A dataset exposes three immutable splits (train, validation, test), each
//! an ordered sequence of same-sized batches addressed by a zero-based
//! index. The trailing examples that do not fill a complete batch are never
//! visited.

use crate::error::{Error, Result};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};
use std::fmt;

/// One of the three fixed dataset splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    /// Examples used for gradient updates.
    Train,
    /// Examples used to drive the stopping decision.
    Valid,
    /// Examples used only for reporting, never for decisions.
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => write!(f, "train"),
            Split::Valid => write!(f, "validation"),
            Split::Test => write!(f, "test"),
        }
    }
}

/// A borrowed minibatch: one row per example, labels as class indices.
#[derive(Clone, Copy)]
pub struct Minibatch<'a> {
    /// Input features, one example per row.
    pub inputs: ArrayView2<'a, f32>,
    /// Target class labels, one per example.
    pub targets: ArrayView1<'a, u8>,
}

impl Minibatch<'_> {
    /// Number of examples in the batch.
    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    /// Whether the batch holds no examples.
    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }

    /// Number of input features per example.
    pub fn num_features(&self) -> usize {
        self.inputs.ncols()
    }
}

/// Indexed batch access over the three splits.
///
/// Implementations are immutable once constructed; the controller iterates
/// batch indices `0..num_batches(split)` and never touches raw examples.
pub trait Dataset {
    /// Examples per batch, identical across splits.
    fn batch_size(&self) -> usize;

    /// Number of complete batches in a split.
    fn num_batches(&self, split: Split) -> usize;

    /// Borrow the batch at `index` within `split`.
    fn minibatch(&self, split: Split, index: usize) -> Result<Minibatch<'_>>;
}

/// The examples of a single split: a feature matrix plus a label per row.
#[derive(Clone, Debug)]
pub struct SplitData {
    inputs: Array2<f32>,
    targets: Array1<u8>,
}

impl SplitData {
    /// Pair a feature matrix with its labels.
    pub fn new(inputs: Array2<f32>, targets: Array1<u8>) -> Result<Self> {
        if inputs.nrows() != targets.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} labels", inputs.nrows()),
                actual: format!("{} labels", targets.len()),
            });
        }
        Ok(Self { inputs, targets })
    }

    /// Number of examples in the split.
    pub fn num_examples(&self) -> usize {
        self.inputs.nrows()
    }

    /// Number of input features per example.
    pub fn num_features(&self) -> usize {
        self.inputs.ncols()
    }
}

/// A dataset held entirely in memory as ndarray arrays.
///
/// # Example
///
/// ```
/// use ndarray::{Array1, Array2};
/// use paciencia::data::{Dataset, InMemoryDataset, Split, SplitData};
///
/// let split = || {
///     SplitData::new(Array2::zeros((6, 4)), Array1::zeros(6)).unwrap()
/// };
/// let data = InMemoryDataset::new(split(), split(), split(), 2).unwrap();
/// assert_eq!(data.num_batches(Split::Train), 3);
/// ```
pub struct InMemoryDataset {
    train: SplitData,
    valid: SplitData,
    test: SplitData,
    batch_size: usize,
}

impl InMemoryDataset {
    /// Assemble a dataset from its three splits.
    ///
    /// Fails if `batch_size` is zero or larger than any split, or if the
    /// splits disagree on feature width.
    pub fn new(
        train: SplitData,
        valid: SplitData,
        test: SplitData,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::config("batch_size", "must be at least 1"));
        }
        for (split, data) in
            [(Split::Train, &train), (Split::Valid, &valid), (Split::Test, &test)]
        {
            if batch_size > data.num_examples() {
                return Err(Error::config(
                    "batch_size",
                    format!(
                        "{batch_size} exceeds the {split} split ({} examples)",
                        data.num_examples()
                    ),
                ));
            }
        }
        let width = train.num_features();
        for data in [&valid, &test] {
            if data.num_features() != width {
                return Err(Error::ShapeMismatch {
                    expected: format!("{width} features"),
                    actual: format!("{} features", data.num_features()),
                });
            }
        }
        Ok(Self { train, valid, test, batch_size })
    }

    fn split(&self, split: Split) -> &SplitData {
        match split {
            Split::Train => &self.train,
            Split::Valid => &self.valid,
            Split::Test => &self.test,
        }
    }
}

impl Dataset for InMemoryDataset {
    fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Integer division: a trailing partial batch is dropped, so examples
    /// beyond `num_batches * batch_size` are never visited.
    fn num_batches(&self, split: Split) -> usize {
        self.split(split).num_examples() / self.batch_size
    }

    fn minibatch(&self, split: Split, index: usize) -> Result<Minibatch<'_>> {
        let len = self.num_batches(split);
        if index >= len {
            return Err(Error::BatchOutOfRange { split, index, len });
        }
        let data = self.split(split);
        let start = index * self.batch_size;
        let end = start + self.batch_size;
        Ok(Minibatch {
            inputs: data.inputs.slice(s![start..end, ..]),
            targets: data.targets.slice(s![start..end]),
        })
    }
}

/// Synthetic clustered data for demos and tests.
pub mod synthetic {
    use super::SplitData;
    use crate::error::{Error, Result};
    use ndarray::{Array1, Array2};
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::Rng;
    use ndarray_rand::rand_distr::StandardNormal;

    /// Generate `examples` points in `classes` Gaussian clusters.
    ///
    /// Class `c` is centered at 2.0 along every feature axis congruent to
    /// `c` modulo `classes`; points scatter around the center with standard
    /// deviation `spread`. Labels cycle through the classes so every class
    /// is equally represented. Deterministic for a given RNG state.
    pub fn clustered(
        examples: usize,
        classes: usize,
        features: usize,
        spread: f32,
        rng: &mut StdRng,
    ) -> Result<SplitData> {
        if classes == 0 || classes > u8::MAX as usize + 1 {
            return Err(Error::config("classes", "must be between 1 and 256"));
        }
        if features == 0 {
            return Err(Error::config("features", "must be at least 1"));
        }
        if !(spread.is_finite() && spread > 0.0) {
            return Err(Error::config("spread", "must be a positive finite number"));
        }
        let mut inputs = Array2::<f32>::zeros((examples, features));
        let mut targets = Array1::<u8>::zeros(examples);
        for i in 0..examples {
            let class = i % classes;
            for j in 0..features {
                let center = if j % classes == class { 2.0 } else { 0.0 };
                let noise: f32 = rng.sample(StandardNormal);
                inputs[[i, j]] = center + spread * noise;
            }
            targets[i] = class as u8;
        }
        SplitData::new(inputs, targets)
    }

    /// Generate train/validation/test splits from one RNG stream.
    pub fn splits(
        counts: (usize, usize, usize),
        classes: usize,
        features: usize,
        spread: f32,
        rng: &mut StdRng,
    ) -> Result<(SplitData, SplitData, SplitData)> {
        let (n_train, n_valid, n_test) = counts;
        let train = clustered(n_train, classes, features, spread, rng)?;
        let valid = clustered(n_valid, classes, features, spread, rng)?;
        let test = clustered(n_test, classes, features, spread, rng)?;
        Ok((train, valid, test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;

    fn split_of(examples: usize, features: usize) -> SplitData {
        let inputs = Array2::from_shape_fn((examples, features), |(i, j)| (i * features + j) as f32);
        let targets = Array1::from_shape_fn(examples, |i| (i % 3) as u8);
        SplitData::new(inputs, targets).unwrap()
    }

    #[test]
    fn test_split_data_rejects_mismatched_labels() {
        let result = SplitData::new(Array2::zeros((4, 2)), Array1::zeros(3));
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_num_batches_drops_trailing_partial_batch() {
        let data =
            InMemoryDataset::new(split_of(7, 2), split_of(5, 2), split_of(5, 2), 2).unwrap();
        assert_eq!(data.num_batches(Split::Train), 3);
        assert_eq!(data.num_batches(Split::Valid), 2);
        assert_eq!(data.num_batches(Split::Test), 2);
    }

    #[test]
    fn test_minibatch_slices_contiguous_rows() {
        let data =
            InMemoryDataset::new(split_of(6, 2), split_of(4, 2), split_of(4, 2), 2).unwrap();
        let batch = data.minibatch(Split::Train, 1).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.num_features(), 2);
        // Rows 2 and 3 of the train split.
        assert_eq!(batch.inputs[[0, 0]], 4.0);
        assert_eq!(batch.inputs[[1, 1]], 7.0);
        assert_eq!(batch.targets[0], 2);
        assert_eq!(batch.targets[1], 0);
    }

    #[test]
    fn test_minibatch_out_of_range() {
        let data =
            InMemoryDataset::new(split_of(6, 2), split_of(4, 2), split_of(4, 2), 2).unwrap();
        let result = data.minibatch(Split::Valid, 2);
        assert!(matches!(
            result,
            Err(Error::BatchOutOfRange { split: Split::Valid, index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_batch_size_larger_than_split_is_rejected() {
        let result = InMemoryDataset::new(split_of(6, 2), split_of(4, 2), split_of(4, 2), 5);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let result = InMemoryDataset::new(split_of(6, 2), split_of(4, 2), split_of(4, 2), 0);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_mismatched_feature_width_is_rejected() {
        let result = InMemoryDataset::new(split_of(6, 2), split_of(4, 3), split_of(4, 2), 2);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_synthetic_clusters_are_deterministic() {
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = synthetic::clustered(12, 3, 6, 0.5, &mut rng_a).unwrap();
        let b = synthetic::clustered(12, 3, 6, 0.5, &mut rng_b).unwrap();
        assert_eq!(a.num_examples(), 12);
        for i in 0..12 {
            for j in 0..6 {
                assert_eq!(a.inputs[[i, j]], b.inputs[[i, j]]);
            }
        }
    }

    #[test]
    fn test_synthetic_labels_are_balanced() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = synthetic::clustered(9, 3, 4, 0.1, &mut rng).unwrap();
        let mut counts = [0usize; 3];
        for &label in data.targets.iter() {
            counts[label as usize] += 1;
        }
        assert_eq!(counts, [3, 3, 3]);
    }

    #[test]
    fn test_synthetic_rejects_bad_spread() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(synthetic::clustered(4, 2, 2, 0.0, &mut rng).is_err());
        assert!(synthetic::clustered(4, 2, 2, f32::NAN, &mut rng).is_err());
    }
}
