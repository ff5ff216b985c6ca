//! Paciencia CLI
//!
//! # Usage
//!
//! ```bash
//! # Train a logistic regression on synthetic data
//! paciencia logistic
//!
//! # Train a small perceptron, saving the best model
//! paciencia mlp --hidden 64 --checkpoint best_model.json
//!
//! # Quiet run with a fixed validation cadence
//! paciencia logistic --quiet --validation-frequency 50
//! ```

use clap::Parser;
use paciencia::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
