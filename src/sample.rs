//! Resident-memory sampling for live checker processes.
//!
//! The sampler runs concurrently with the invocation it observes: it polls the
//! resident set size of the target pid at a fixed interval and keeps a running
//! maximum until the process exits. It only ever observes the process, it
//! never terminates it.

use std::time::Duration;

use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};
use tokio::{sync::oneshot, time::MissedTickBehavior};

/// Interval between resident-memory polls.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Polls the resident memory of `pid` until the process exits.
///
/// Returns the peak resident set size observed in bytes, or `None` if the
/// process was never observed alive (e.g. it exited before the first poll).
/// The process disappearing between polls is the normal exit signal and is
/// never reported as an error.
///
/// The `exited` channel is signalled by the invocation runner once it has
/// reaped the process; either that signal or a failed refresh ends the loop,
/// so the sampler unblocks within one poll interval of process death even
/// when the process was killed for exceeding its timeout.
pub async fn peak_rss(pid: u32, interval: Duration, mut exited: oneshot::Receiver<()>) -> Option<u64> {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut peak = None;
    loop {
        tokio::select! {
            _ = &mut exited => break,
            _ = ticker.tick() => {
                if !system.refresh_process(pid) {
                    // Process is gone, return the max seen so far.
                    break;
                }
                if let Some(process) = system.process(pid) {
                    let resident = process.memory();
                    peak = Some(peak.map_or(resident, |prev: u64| prev.max(resident)));
                }
            }
        }
    }

    log::trace!("[pid {pid}] peak resident memory: {peak:?} bytes");
    peak
}
