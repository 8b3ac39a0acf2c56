//! Bounded-time execution of a single checker invocation.
//!
//! The invocation runner launches one external command, races its exit against
//! the configured timeout, and reports a structured [`Outcome`]. Standard
//! output and standard error of the checker are discarded: the harness
//! measures timing and memory, not checker output.

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
    process::Stdio,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{process::Command, sync::oneshot};

use crate::sample;

/// A fully resolved external command, ready to launch.
///
/// Produced by the per-checker command builders in [`crate::checkers`]; the
/// runner never interprets checker-specific flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Executable to launch.
    pub program: PathBuf,
    /// Literal argument vector.
    pub args: Vec<String>,
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of one invocation.
///
/// A non-zero exit code is deliberately not distinguished from success: the
/// upstream checkers historically signal their verdict through output, not
/// exit status, and only the timeout is treated as special.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The process exited (with any exit code) before the timeout.
    Completed {
        /// Wall-clock time from launch to exit.
        duration: Duration,
        /// Peak resident memory in bytes, if sampling was enabled.
        peak_memory: Option<u64>,
    },
    /// The process was still running when the timeout expired and was killed.
    /// No duration is reported: a finite number here would be misleading.
    TimedOut,
}

/// Failure to run an invocation at all, as opposed to a timeout.
///
/// These are surfaced to the operator and isolated to the single work item
/// they occurred on; they never corrupt other groups' aggregates.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The executable could not be started.
    #[error("could not launch {program}: {source}")]
    Launch {
        /// Executable that failed to start.
        program: PathBuf,
        /// Underlying launch error.
        source: std::io::Error,
    },
    /// Waiting on the launched process failed.
    #[error("could not wait on {program}: {source}")]
    Wait {
        /// Executable that was being waited on.
        program: PathBuf,
        /// Underlying wait error.
        source: std::io::Error,
    },
}

/// Runs one invocation under a bounded-time policy.
///
/// Launches the command with stdout/stderr discarded, waits for it to exit,
/// and returns [`Outcome::Completed`] with the wall-clock duration. If the
/// process has not exited after `timeout`, the entire process group is killed
/// and [`Outcome::TimedOut`] is returned.
///
/// When `sample_memory` is set, a [`sample::peak_rss`] task polls the child's
/// resident memory concurrently and the observed peak is attached to the
/// completed outcome.
///
/// # Errors
///
/// Returns [`InvokeError::Launch`] if the executable could not be started and
/// [`InvokeError::Wait`] if waiting on it failed. A timeout is not an error.
pub async fn run(
    invocation: &Invocation,
    timeout: Duration,
    sample_memory: bool,
) -> Result<Outcome, InvokeError> {
    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    // The checker may spawn helpers (e.g. `java -jar`); giving the child its
    // own process group lets the timeout path kill the whole tree.
    #[cfg(unix)]
    command.process_group(0);

    let started = Instant::now();
    let mut child = command.spawn().map_err(|source| InvokeError::Launch {
        program: invocation.program.clone(),
        source,
    })?;

    let sampler = if sample_memory {
        child.id().map(|pid| {
            let (exit_tx, exit_rx) = oneshot::channel();
            (
                exit_tx,
                tokio::spawn(sample::peak_rss(pid, sample::SAMPLE_INTERVAL, exit_rx)),
            )
        })
    } else {
        None
    };

    let waited = tokio::time::timeout(timeout, child.wait()).await;
    let duration = match waited {
        Ok(status) => {
            let status = status.map_err(|source| InvokeError::Wait {
                program: invocation.program.clone(),
                source,
            })?;
            let duration = started.elapsed();
            if !status.success() {
                log::debug!(
                    "invocation exited with {status} after {duration:?}, not treated as a failure"
                );
            }
            Some(duration)
        }
        Err(_) => {
            kill_process_group(&mut child).await;
            None
        }
    };

    let peak_memory = match sampler {
        Some((exit_tx, handle)) => {
            // The child has been reaped either way; unblock the sampler.
            let _ = exit_tx.send(());
            handle.await.ok().flatten()
        }
        None => None,
    };

    Ok(match duration {
        Some(duration) => Outcome::Completed {
            duration,
            peak_memory,
        },
        None => Outcome::TimedOut,
    })
}

/// Kills the child's entire process group, then reaps the child.
async fn kill_process_group(child: &mut tokio::process::Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child leads its own group (see `process_group(0)` above).
        #[allow(clippy::cast_possible_wrap)]
        let ret = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
        if ret == -1 {
            log::warn!(
                "could not kill process group {pid}: {}, continuing...",
                std::io::Error::last_os_error()
            );
        }
    }
    if let Err(err) = child.kill().await {
        log::warn!("could not kill timed-out process: {err}, continuing...");
    }
}
