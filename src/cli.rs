//! Command-line interface: train a reference classifier on synthetic
//! clustered data and report the early-stopping result.

use clap::{Args, Parser, Subcommand};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use std::path::PathBuf;

use crate::data::{synthetic, Dataset, InMemoryDataset, Split};
use crate::error::Result;
use crate::model::Model;
use crate::models::{LogisticRegression, Mlp, MlpConfig};
use crate::train::{ConsoleReporter, JsonCheckpoint, TrainConfig, TrainingController};

/// Paciencia: mini-batch training with patience-based early stopping
#[derive(Parser, Debug, Clone)]
#[command(name = "paciencia")]
#[command(version)]
#[command(about = "Train a classifier on synthetic digit-style data with early stopping")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a multinomial logistic regression
    Logistic(LogisticArgs),
    /// Train a one-hidden-layer perceptron
    Mlp(MlpArgs),
}

/// Synthetic dataset parameters
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Training examples to generate
    #[arg(long, default_value_t = 3000)]
    pub train_examples: usize,

    /// Validation examples to generate
    #[arg(long, default_value_t = 600)]
    pub valid_examples: usize,

    /// Test examples to generate
    #[arg(long, default_value_t = 600)]
    pub test_examples: usize,

    /// Input features per example
    #[arg(long, default_value_t = 64)]
    pub features: usize,

    /// Number of classes
    #[arg(long, default_value_t = 10)]
    pub classes: usize,

    /// Standard deviation of each cluster
    #[arg(long, default_value_t = 0.75)]
    pub spread: f32,

    /// RNG seed for data generation and weight initialization
    #[arg(long, default_value_t = 1234)]
    pub seed: u64,
}

/// Early-stopping parameters shared by both models
#[derive(Args, Debug, Clone)]
pub struct StoppingArgs {
    /// Maximum passes over the training split
    #[arg(long, default_value_t = 1000)]
    pub epochs: usize,

    /// Initial patience budget in global steps
    #[arg(long)]
    pub patience: Option<usize>,

    /// Multiplier applied to the current step when patience is extended
    #[arg(long, default_value_t = 2)]
    pub patience_increase: usize,

    /// Relative-improvement fraction that counts as significant
    #[arg(long, default_value_t = 0.995)]
    pub improvement_threshold: f32,

    /// Steps between validation passes (derived when omitted)
    #[arg(long)]
    pub validation_frequency: Option<usize>,

    /// Write the best model as JSON to this path
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,
}

/// Arguments for the logistic command
#[derive(Args, Debug, Clone)]
pub struct LogisticArgs {
    /// SGD step size
    #[arg(long, default_value_t = 0.13)]
    pub learning_rate: f32,

    /// Examples per minibatch
    #[arg(long, default_value_t = 600)]
    pub batch_size: usize,

    #[command(flatten)]
    pub stopping: StoppingArgs,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Arguments for the mlp command
#[derive(Args, Debug, Clone)]
pub struct MlpArgs {
    /// SGD step size
    #[arg(long, default_value_t = 0.01)]
    pub learning_rate: f32,

    /// Examples per minibatch
    #[arg(long, default_value_t = 20)]
    pub batch_size: usize,

    /// Hidden units
    #[arg(long, default_value_t = 500)]
    pub hidden: usize,

    /// L1 penalty weight
    #[arg(long, default_value_t = 0.0)]
    pub l1: f32,

    /// L2 penalty weight
    #[arg(long, default_value_t = 1e-4)]
    pub l2: f32,

    #[command(flatten)]
    pub stopping: StoppingArgs,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Execute a parsed command.
pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Logistic(args) => run_logistic(&args, cli.quiet),
        Command::Mlp(args) => run_mlp(&args, cli.quiet),
    }
}

fn train_config(
    learning_rate: f32,
    batch_size: usize,
    stopping: &StoppingArgs,
    default_patience: usize,
) -> TrainConfig {
    let mut config = TrainConfig::default()
        .with_learning_rate(learning_rate)
        .with_batch_size(batch_size)
        .with_max_epochs(stopping.epochs)
        .with_initial_patience(stopping.patience.unwrap_or(default_patience))
        .with_patience_increase(stopping.patience_increase)
        .with_improvement_threshold(stopping.improvement_threshold);
    if let Some(steps) = stopping.validation_frequency {
        config = config.with_validation_frequency(steps);
    }
    config
}

fn build_dataset(data: &DataArgs, batch_size: usize, rng: &mut StdRng) -> Result<InMemoryDataset> {
    let (train, valid, test) = synthetic::splits(
        (data.train_examples, data.valid_examples, data.test_examples),
        data.classes,
        data.features,
        data.spread,
        rng,
    )?;
    InMemoryDataset::new(train, valid, test, batch_size)
}

fn run_logistic(args: &LogisticArgs, quiet: bool) -> Result<()> {
    let config = train_config(args.learning_rate, args.batch_size, &args.stopping, 5000);
    let mut rng = StdRng::seed_from_u64(args.data.seed);
    let dataset = build_dataset(&args.data, config.batch_size, &mut rng)?;
    let mut model =
        LogisticRegression::new(args.data.features, args.data.classes, config.learning_rate)?;

    let mut controller = TrainingController::new(config)?;
    if !quiet {
        controller.add_observer(ConsoleReporter);
    }
    if let Some(path) = &args.stopping.checkpoint {
        controller.set_checkpoint(JsonCheckpoint::new(path));
    }

    let report = controller.run(&mut model, &dataset)?;

    if let Some(snapshot) = &report.best_snapshot {
        let restored = LogisticRegression::from_snapshot(snapshot, config.learning_rate)?;
        let error = test_error(&restored, &dataset)?;
        if !quiet {
            println!("restored best model test error {:.4}%", error * 100.0);
        }
    }
    Ok(())
}

fn run_mlp(args: &MlpArgs, quiet: bool) -> Result<()> {
    let config = train_config(args.learning_rate, args.batch_size, &args.stopping, 10_000);
    let mut rng = StdRng::seed_from_u64(args.data.seed);
    let dataset = build_dataset(&args.data, config.batch_size, &mut rng)?;
    let mlp_config = MlpConfig {
        n_in: args.data.features,
        n_hidden: args.hidden,
        n_out: args.data.classes,
        learning_rate: config.learning_rate,
        l1: args.l1,
        l2: args.l2,
    };
    let mut model = Mlp::new(mlp_config, &mut rng)?;

    let mut controller = TrainingController::new(config)?;
    if !quiet {
        controller.add_observer(ConsoleReporter);
    }
    if let Some(path) = &args.stopping.checkpoint {
        controller.set_checkpoint(JsonCheckpoint::new(path));
    }

    let report = controller.run(&mut model, &dataset)?;

    if let Some(snapshot) = &report.best_snapshot {
        let restored = Mlp::from_snapshot(snapshot, config.learning_rate, args.l1, args.l2)?;
        let error = test_error(&restored, &dataset)?;
        if !quiet {
            println!("restored best model test error {:.4}%", error * 100.0);
        }
    }
    Ok(())
}

/// Mean error rate of `model` over the test split.
fn test_error<M: Model, D: Dataset>(model: &M, dataset: &D) -> Result<f32> {
    let n = dataset.num_batches(Split::Test);
    let mut total = 0.0;
    for index in 0..n {
        let batch = dataset.minibatch(Split::Test, index)?;
        total += model.evaluate(&batch, Split::Test)?;
    }
    Ok(total / n as f32)
}
