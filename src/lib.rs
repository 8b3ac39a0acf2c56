//! Comparative benchmark harness for transactional-consistency checkers.
//!
//! checker-bench invokes a configurable set of external checker executables
//! against a corpus of transaction-history datasets, enforces a wall-clock
//! timeout per invocation, optionally samples peak resident memory, averages
//! repeated trials, and emits a deterministic `tool,hist,runtime` CSV report.
//! It exists to reproduce performance comparisons between alternative checker
//! implementations (veristrong, CobraVerifier, PolySI, Viper, dbcop) over
//! history corpora organized in a directory tree.
//!
//! # Layout conventions
//! Checker variants are described by `*.checker.json` metadata files found
//! anywhere under the checkers directory; each names the variant, tags which
//! command builder launches it, and carries its opaque option map and time
//! budget. Histories live under a corpus root where every subdirectory is one
//! named dataset containing its trial inputs.
//!
//! # Usage
//! checker-bench is primarily designed to be used as an executable. Refer to
//! the output of the `--help` flag:
//! ```console
//! $ checker-bench --help
//! ⏱️ checker-bench is a comparative benchmark harness for transactional-consistency checkers.
//!
//! Usage: checker-bench [OPTIONS]
//!
//! Options:
//!   -c, --checkers <CHECKERS>        Path to a directory containing checker metadata files [default: checkers]
//!   -i, --histories <HISTORIES>      Path to a directory of history datasets [default: history]
//!   -r, --repetitions <REPETITIONS>  Number of trials per (checker, history) pair [default: 1]
//!   -m, --memory                     Sample each checker's peak resident memory
//!   -o, --output <OUTPUT>            Directory to write a timestamped report into, instead of stdout
//!   -h, --help                       Print help
//!   -V, --version                    Print version
//! ```
//!
//! ## As a library
//! ```no_run
//! use std::path::PathBuf;
//!
//! use checker_bench::{execute_all, load, ExecuteOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let checkers = load(&PathBuf::from("checkers"), None)?;
//! let rows = execute_all(&checkers, &PathBuf::from("history"), &ExecuteOptions::default()).await?;
//! #     Ok(())
//! # }
//! ```
//!
//! The report body goes to standard output (or the `--output` file); all
//! progress diagnostics go through [`log`] to standard error, so the two are
//! never interleaved.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod aggregate;
pub mod checkers;
pub mod histories;
pub mod invoke;
pub mod report;
pub mod runs;
pub mod sample;

pub use aggregate::{aggregate, Summary};
pub use checkers::{load, Checker};
pub use invoke::{Invocation, Outcome};
pub use report::{emit, ResultRow};
pub use runs::{execute, execute_all, ExecuteOptions};
