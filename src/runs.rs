//! Orchestration for benchmarking checkers over history corpora.
//!
//! Expands the configuration into discrete work items (checker × history ×
//! trial), runs each one under its time budget, aggregates per-group outcomes,
//! and returns the ordered report rows. The primary entry point is
//! [`execute_all`].
//!
//! # Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use checker_bench::{checkers::load, runs::{execute_all, ExecuteOptions}};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let checkers = load(&PathBuf::from("checkers"), None)?;
//! let rows = execute_all(&checkers, &PathBuf::from("history"), &ExecuteOptions::default()).await?;
//! #     Ok(())
//! # }
//! ```

use std::{
    path::{Path, PathBuf},
    ptr,
};

use crate::{
    aggregate::aggregate,
    checkers::Checker,
    histories::{self, History},
    invoke::{self, Outcome},
    report::ResultRow,
};

/// One scheduled invocation: a checker, a history, and a trial index.
///
/// Created by [`enumerate`] and consumed exactly once by the invocation
/// runner.
#[derive(Clone, Debug)]
pub struct WorkItem<'a> {
    /// Checker configuration to run.
    pub checker: &'a Checker,
    /// History dataset this trial belongs to.
    pub history: &'a History,
    /// Resolved trial input for this invocation.
    pub input: PathBuf,
    /// 0-based index of this trial within its group.
    pub trial: usize,
}

/// Options controlling a benchmark execution.
#[derive(Clone, Copy, Debug)]
pub struct ExecuteOptions {
    /// Number of trials per (checker, history) pair. Values below 1 are
    /// treated as 1.
    pub repetitions: usize,
    /// Whether to sample peak resident memory for each invocation.
    pub sample_memory: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            repetitions: 1,
            sample_memory: false,
        }
    }
}

/// Expands the configuration into an ordered sequence of work items.
///
/// Items are yielded checker-major, history-minor, trial-minor, which fixes
/// the report row order. A history with no trial inputs contributes zero
/// items. When a history carries fewer pre-generated trial inputs than
/// `repetitions`, inputs are reused round-robin.
#[must_use]
pub fn enumerate<'a>(
    checkers: &'a [Checker],
    histories: &'a [History],
    repetitions: usize,
) -> Vec<WorkItem<'a>> {
    let repetitions = repetitions.max(1);
    let mut items = Vec::new();
    for checker in checkers {
        for history in histories {
            if history.trials.is_empty() {
                continue;
            }
            for trial in 0..repetitions {
                items.push(WorkItem {
                    checker,
                    history,
                    input: history.trials[trial % history.trials.len()].clone(),
                    trial,
                });
            }
        }
    }
    items
}

/// Runs all checkers over all given histories and returns the report rows.
///
/// Invocations run strictly sequentially: concurrent checker runs would
/// contaminate each other's timing and memory measurements, so the loop
/// deliberately awaits each invocation before starting the next one. Every
/// (checker, history) pair produces exactly one row, including histories with
/// no trial inputs, which report no data.
///
/// A launch failure is logged and drops that single trial's contribution to
/// its group; remaining work items still run, so the report is best-effort
/// complete rather than aborted on first failure.
///
/// # Errors
///
/// Currently never fails after enumeration; the `Result` wrapper matches the
/// fallible discovery path in [`execute_all`].
pub async fn execute(
    checkers: &[Checker],
    histories: &[History],
    options: &ExecuteOptions,
) -> anyhow::Result<Vec<ResultRow>> {
    log::info!(
        "running {} checkers over {} histories...",
        checkers.len(),
        histories.len()
    );

    let mut items = enumerate(checkers, histories, options.repetitions)
        .into_iter()
        .peekable();

    let mut rows = Vec::new();
    for checker in checkers {
        log::info!("[{}]", checker.identifier);
        for history in histories {
            let mut outcomes: Vec<Outcome> = Vec::new();
            while let Some(item) = items
                .next_if(|item| ptr::eq(item.checker, checker) && ptr::eq(item.history, history))
            {
                log::info!(
                    "[{}] running {} (trial {})...",
                    checker.identifier,
                    history.id,
                    item.trial
                );
                let invocation = checker.command(&item.input);
                log::trace!("[{}] invocation: {invocation}", checker.identifier);

                match invoke::run(&invocation, checker.timeout(), options.sample_memory).await {
                    Ok(outcome) => {
                        match &outcome {
                            Outcome::Completed { duration, .. } => log::info!(
                                "[{}] {} trial {} finished in {duration:?}",
                                checker.identifier,
                                history.id,
                                item.trial
                            ),
                            Outcome::TimedOut => log::info!(
                                "[{}] {} trial {} timed out after {:?}",
                                checker.identifier,
                                history.id,
                                item.trial,
                                checker.timeout()
                            ),
                        }
                        outcomes.push(outcome);
                    }
                    Err(err) => log::error!(
                        "[{}] {} trial {}: {err}, recording no data for this trial and continuing...",
                        checker.identifier,
                        history.id,
                        item.trial
                    ),
                }
            }

            rows.push(ResultRow {
                checker: checker.metadata.name.clone(),
                history: history.id.clone(),
                summary: aggregate(&outcomes),
            });
        }
    }

    Ok(rows)
}

/// Discovers histories under `history_root` and runs all checkers over them.
///
/// This is a convenience function that simply calls [`histories::discover`]
/// and [`execute`] in sequence.
///
/// # Errors
///
/// Fails if history discovery fails; see [`execute`] for execution semantics.
pub async fn execute_all(
    checkers: &[Checker],
    history_root: &Path,
    options: &ExecuteOptions,
) -> anyhow::Result<Vec<ResultRow>> {
    let histories = histories::discover(history_root)?;
    execute(checkers, &histories, options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{collections::BTreeMap, fs, time::Duration};

    use crate::{
        aggregate::Summary,
        checkers::{CheckerKind, CheckerMetadata, Identifier},
    };

    fn checker(name: &str, executable: &str, timeout_secs: u64) -> Checker {
        Checker {
            identifier: Identifier::from(name),
            metadata: CheckerMetadata {
                name: name.to_string(),
                kind: CheckerKind::Veristrong,
                executable: executable.to_string(),
                options: BTreeMap::new(),
                timeout_secs,
            },
            executable: PathBuf::from(executable),
        }
    }

    fn history(id: &str, trials: &[&str]) -> History {
        History {
            id: id.to_string(),
            trials: trials.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn enumeration_is_tool_major_and_complete() {
        let checkers = vec![checker("fast", "true", 60), checker("slow", "true", 60)];
        let histories = vec![
            history("A", &["/corpus/A/t0"]),
            history("B", &["/corpus/B/t0"]),
            history("empty", &[]),
        ];

        let items = enumerate(&checkers, &histories, 2);
        // |tools| * |histories| * reps minus the empty history's contribution.
        assert_eq!(items.len(), 2 * 2 * 2);
        let order: Vec<_> = items
            .iter()
            .map(|item| {
                (
                    item.checker.metadata.name.as_str(),
                    item.history.id.as_str(),
                    item.trial,
                )
            })
            .collect();
        assert_eq!(
            order,
            [
                ("fast", "A", 0),
                ("fast", "A", 1),
                ("fast", "B", 0),
                ("fast", "B", 1),
                ("slow", "A", 0),
                ("slow", "A", 1),
                ("slow", "B", 0),
                ("slow", "B", 1),
            ]
        );
    }

    #[test]
    fn enumeration_cycles_trial_inputs() {
        let checkers = vec![checker("fast", "true", 60)];
        let histories = vec![history("A", &["/corpus/A/t0", "/corpus/A/t1"])];

        let items = enumerate(&checkers, &histories, 3);
        let inputs: Vec<_> = items.iter().map(|item| item.input.clone()).collect();
        assert_eq!(
            inputs,
            [
                PathBuf::from("/corpus/A/t0"),
                PathBuf::from("/corpus/A/t1"),
                PathBuf::from("/corpus/A/t0"),
            ]
        );
    }

    #[test]
    fn enumeration_is_deterministic() {
        let checkers = vec![checker("fast", "true", 60)];
        let histories = vec![
            history("A", &["/corpus/A/t0"]),
            history("B", &["/corpus/B/t0"]),
        ];
        let first: Vec<_> = enumerate(&checkers, &histories, 2)
            .iter()
            .map(|item| (item.history.id.clone(), item.trial, item.input.clone()))
            .collect();
        let second: Vec<_> = enumerate(&checkers, &histories, 2)
            .iter()
            .map(|item| (item.history.id.clone(), item.trial, item.input.clone()))
            .collect();
        assert_eq!(first, second);
    }

    fn corpus() -> tempfile::TempDir {
        let root = tempfile::tempdir().expect("could not create temp dir");
        for (id, trials) in [("hist-a", 2), ("hist-b", 1), ("hist-empty", 0)] {
            let dir = root.path().join(id);
            fs::create_dir(&dir).unwrap();
            for trial in 0..trials {
                let trial_dir = dir.join(format!("hist-{trial:05}"));
                fs::create_dir(&trial_dir).unwrap();
                fs::write(trial_dir.join("history.bincode"), b"").unwrap();
            }
        }
        root
    }

    #[tokio::test]
    async fn empty_history_reports_no_data_and_processing_continues() {
        let root = corpus();
        let checkers = vec![checker("fast", "true", 60)];

        let rows = execute_all(&checkers, root.path(), &ExecuteOptions::default())
            .await
            .expect("execution failed");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].history, "hist-a");
        assert!(matches!(rows[0].summary, Summary::Completed { .. }));
        assert_eq!(rows[1].history, "hist-b");
        assert!(matches!(rows[1].summary, Summary::Completed { .. }));
        assert_eq!(rows[2].history, "hist-empty");
        assert_eq!(rows[2].summary, Summary::NoData);
    }

    #[tokio::test]
    async fn launch_failure_is_isolated_to_its_own_group() {
        let root = corpus();
        let checkers = vec![
            checker("ghost", "/nonexistent/checker-binary", 60),
            checker("fast", "true", 60),
        ];

        let rows = execute_all(&checkers, root.path(), &ExecuteOptions::default())
            .await
            .expect("execution failed");

        assert_eq!(rows.len(), 6);
        // Every ghost group degrades to no data, the healthy checker is
        // unaffected.
        assert_eq!(rows[0].checker, "ghost");
        assert_eq!(rows[0].summary, Summary::NoData);
        assert_eq!(rows[1].summary, Summary::NoData);
        assert_eq!(rows[3].checker, "fast");
        assert!(matches!(rows[3].summary, Summary::Completed { .. }));
    }

    #[tokio::test]
    async fn repetitions_average_into_a_single_row() {
        let root = corpus();
        let checkers = vec![checker("fast", "true", 60)];
        let options = ExecuteOptions {
            repetitions: 3,
            sample_memory: false,
        };

        let rows = execute_all(&checkers, root.path(), &options)
            .await
            .expect("execution failed");

        assert_eq!(rows.len(), 3);
        match &rows[0].summary {
            Summary::Completed { mean_duration, .. } => {
                assert!(*mean_duration < Duration::from_secs(5));
            }
            other => panic!("expected completed summary, got {other:?}"),
        }
    }
}
