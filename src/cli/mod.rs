// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All business logic is delegated to Layer 2 (application).
//
//   1. `train` — trains a miner, keeps the best checkpoint,
//                reports test Hit@k
//   2. `eval`  — loads a checkpoint and reports Hit@k on a split
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvalArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "rt-miner",
    version,
    about = "Train and evaluate rule miners over knowledge graphs."
)]
pub struct Cli {
    /// The subcommand to run (train or eval)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Eval(args)  => run_eval(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on dataset: {}", args.data_dir);
    let report = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete after {} epochs. Best validation Hit@k: {:.2}%",
        report.epochs_run(),
        report.best_acc * 100.0,
    );
    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<()> {
    use crate::application::eval_use_case::EvalUseCase;

    let split = args.split;
    let top_k = args.top_k;
    let acc = EvalUseCase::new(args.into()).execute()?;

    println!("\n[{split}] Hit@{top_k}: {:.2}%", acc * 100.0);
    Ok(())
}
