//! End-to-end training runs over synthetic clustered data.

use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use paciencia::data::{synthetic, Dataset, InMemoryDataset, Split};
use paciencia::models::{LogisticRegression, LogisticSnapshot, Mlp, MlpConfig};
use paciencia::train::{JsonCheckpoint, StopReason, TrainConfig, TrainingController};
use paciencia::Model;

/// Well-separated clusters: 4 classes in 16 dimensions, light noise.
fn logistic_dataset(seed: u64, batch_size: usize) -> InMemoryDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let (train, valid, test) =
        synthetic::splits((600, 200, 200), 4, 16, 0.5, &mut rng).unwrap();
    InMemoryDataset::new(train, valid, test, batch_size).unwrap()
}

#[test]
fn logistic_regression_learns_clustered_data() {
    let config = TrainConfig::default()
        .with_learning_rate(0.2)
        .with_batch_size(20)
        .with_max_epochs(30)
        .with_initial_patience(2000);
    let dataset = logistic_dataset(7, config.batch_size);
    let mut model = LogisticRegression::new(16, 4, config.learning_rate).unwrap();

    let mut controller = TrainingController::new(config).unwrap();
    let report = controller.run(&mut model, &dataset).unwrap();

    // The patience budget outlasts every step, so the epoch limit ends the
    // run, and the clusters are separable enough for near-zero error.
    assert_eq!(report.stop_reason, StopReason::MaxEpochs);
    assert_eq!(report.epochs_run, 30);
    assert!(report.best_validation_loss < 0.1);
    assert!(report.test_score < 0.1);
    assert!(report.best_snapshot.is_some());
}

#[test]
fn plateau_exhausts_patience_before_the_epoch_limit() {
    let config = TrainConfig::default()
        .with_learning_rate(0.2)
        .with_batch_size(20)
        .with_max_epochs(1000)
        .with_initial_patience(60)
        .with_patience_increase(2);
    let dataset = logistic_dataset(11, config.batch_size);
    let mut model = LogisticRegression::new(16, 4, config.learning_rate).unwrap();

    let mut controller = TrainingController::new(config).unwrap();
    let report = controller.run(&mut model, &dataset).unwrap();

    // Once validation error stops improving, patience stops growing and the
    // run ends long before a thousand epochs.
    assert_eq!(report.stop_reason, StopReason::PatienceExhausted);
    assert!(report.epochs_run < 1000);
    assert!(report.best_snapshot.is_some());
}

#[test]
fn checkpoint_file_restores_to_the_reported_test_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best_model.json");

    let config = TrainConfig::default()
        .with_learning_rate(0.2)
        .with_batch_size(20)
        .with_max_epochs(15)
        .with_initial_patience(2000);
    let dataset = logistic_dataset(23, config.batch_size);
    let mut model = LogisticRegression::new(16, 4, config.learning_rate).unwrap();

    let mut controller = TrainingController::new(config).unwrap();
    controller.set_checkpoint(JsonCheckpoint::new(&path));
    let report = controller.run(&mut model, &dataset).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let snapshot: LogisticSnapshot = serde_json::from_str(&content).unwrap();
    let restored = LogisticRegression::from_snapshot(&snapshot, 0.2).unwrap();

    // The persisted model is the one the test score was measured on.
    let n_test = dataset.num_batches(Split::Test);
    let mut total = 0.0;
    for index in 0..n_test {
        let batch = dataset.minibatch(Split::Test, index).unwrap();
        total += restored.evaluate(&batch, Split::Test).unwrap();
    }
    let restored_error = total / n_test as f32;
    assert!((restored_error - report.test_score).abs() < 1e-6);
}

#[test]
fn mlp_learns_clustered_data() {
    let mut rng = StdRng::seed_from_u64(31);
    let (train, valid, test) =
        synthetic::splits((300, 100, 100), 3, 12, 0.5, &mut rng).unwrap();
    let config = TrainConfig::default()
        .with_learning_rate(0.1)
        .with_batch_size(10)
        .with_max_epochs(40)
        .with_initial_patience(3000);
    let dataset = InMemoryDataset::new(train, valid, test, config.batch_size).unwrap();

    let mlp_config = MlpConfig {
        n_in: 12,
        n_hidden: 32,
        n_out: 3,
        learning_rate: config.learning_rate,
        l1: 0.0,
        l2: 1e-4,
    };
    let mut model = Mlp::new(mlp_config, &mut rng).unwrap();

    let mut controller = TrainingController::new(config).unwrap();
    let report = controller.run(&mut model, &dataset).unwrap();

    assert!(report.best_validation_loss < 0.15);
    assert!(report.test_score < 0.15);
    assert!(report.best_snapshot.is_some());
}

#[test]
fn identical_seeds_reproduce_the_run() {
    let run = || {
        let config = TrainConfig::default()
            .with_learning_rate(0.2)
            .with_batch_size(20)
            .with_max_epochs(10)
            .with_initial_patience(500);
        let dataset = logistic_dataset(5, config.batch_size);
        let mut model = LogisticRegression::new(16, 4, config.learning_rate).unwrap();
        let mut controller = TrainingController::new(config).unwrap();
        let report = controller.run(&mut model, &dataset).unwrap();
        (report.best_validation_loss, report.test_score, report.best_iter, report.epochs_run)
    };
    assert_eq!(run(), run());
}
