//! The training loop: configuration, controller, reporting, and
//! best-model persistence.
//!
//! # Example
//!
//! ```no_run
//! use paciencia::models::LogisticRegression;
//! use paciencia::train::{ConsoleReporter, JsonCheckpoint, TrainConfig, TrainingController};
//! # fn dataset() -> paciencia::data::InMemoryDataset { unimplemented!() }
//!
//! let config = TrainConfig::default().with_max_epochs(100);
//! let mut model = LogisticRegression::new(64, 10, config.learning_rate).unwrap();
//!
//! let mut controller = TrainingController::new(config).unwrap();
//! controller.add_observer(ConsoleReporter);
//! controller.set_checkpoint(JsonCheckpoint::new("best_model.json"));
//!
//! let report = controller.run(&mut model, &dataset()).unwrap();
//! ```

mod checkpoint;
mod config;
mod controller;
mod observer;
mod result;
mod state;


pub use checkpoint::{CheckpointSink, JsonCheckpoint};
pub use config::{PatienceBoundary, TrainConfig};
pub use controller::TrainingController;
pub use observer::{ConsoleReporter, ObserverSet, TrainObserver};
pub use result::{StopReason, TrainReport, TrainSummary};
