use std::{fs, path::PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use serde::{Deserialize, Serialize};

use checker_bench::{checkers, report, runs, ExecuteOptions};

#[derive(Parser, Serialize, Deserialize)]
#[command(author, version, about)]
struct Args {
    /// Path to a directory containing checker metadata files
    #[arg(short, long, default_value = "checkers")]
    checkers: PathBuf,

    /// Path to a directory of history datasets
    #[arg(short = 'i', long, default_value = "history")]
    histories: PathBuf,

    /// Number of trials per (checker, history) pair
    #[arg(short, long, default_value_t = 1)]
    repetitions: usize,

    /// Sample each checker's peak resident memory
    #[arg(short, long)]
    memory: bool,

    /// Directory to write a timestamped report into, instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();
    env_logger::init();

    let args = Args::parse();

    let start_time = Utc::now();

    let checkers = checkers::load(&args.checkers.canonicalize()?, None)?;
    anyhow::ensure!(
        !checkers.is_empty(),
        "no checker configurations found under {}",
        args.checkers.display()
    );

    let options = ExecuteOptions {
        repetitions: args.repetitions,
        sample_memory: args.memory,
    };
    let rows = runs::execute_all(&checkers, &args.histories.canonicalize()?, &options)
        .await
        .map_err(|err| {
            log::error!("{err}");
            err
        })?;

    let output = report::emit(&rows, args.memory);

    match args.output {
        Some(output_path) => {
            let output_file_path = output_path.join(format!(
                "results.{}.csv",
                start_time.format("%Y-%m-%dT%H-%M-%S%z")
            ));
            log::info!(
                "writing report to {}...",
                output_file_path.to_string_lossy()
            );
            fs::create_dir_all(&output_path)
                .context("could not create output directory structure")?;
            fs::write(&output_file_path, output).context(format!(
                "could not write to output file {}",
                output_file_path.to_string_lossy()
            ))?;
        }
        None => print!("{output}"),
    }

    Ok(())
}
