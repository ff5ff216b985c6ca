//! Mini-batch training with patience-based early stopping.
//!
//! The core of the crate is [`train::TrainingController`]: it owns the
//! epoch/minibatch iteration, the validation cadence, and the adaptive
//! stopping criterion, while everything numeric lives behind the
//! [`model::Model`] and [`data::Dataset`] traits. Two reference
//! classifiers ([`models::LogisticRegression`] and [`models::Mlp`]) and an
//! in-memory dataset make the loop runnable out of the box.
//!
//! # Example
//!
//! ```
//! use ndarray_rand::rand::rngs::StdRng;
//! use ndarray_rand::rand::SeedableRng;
//! use paciencia::data::{synthetic, InMemoryDataset};
//! use paciencia::models::LogisticRegression;
//! use paciencia::train::{TrainConfig, TrainingController};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let (train, valid, test) =
//!     synthetic::splits((60, 20, 20), 2, 4, 0.5, &mut rng).unwrap();
//! let dataset = InMemoryDataset::new(train, valid, test, 10).unwrap();
//!
//! let config = TrainConfig::default()
//!     .with_learning_rate(0.1)
//!     .with_batch_size(10)
//!     .with_max_epochs(5)
//!     .with_initial_patience(100);
//! let mut model = LogisticRegression::new(4, 2, config.learning_rate).unwrap();
//!
//! let mut controller = TrainingController::new(config).unwrap();
//! let report = controller.run(&mut model, &dataset).unwrap();
//! assert!(report.best_validation_loss <= 1.0);
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod model;
pub mod models;
pub mod train;

pub use data::{Dataset, InMemoryDataset, Minibatch, Split, SplitData};
pub use error::{Error, Result};
pub use model::Model;
pub use train::{
    PatienceBoundary, StopReason, TrainConfig, TrainReport, TrainSummary, TrainingController,
};
