//! Collapsing repeated-trial outcomes into one summary per group.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::invoke::Outcome;

/// Aggregate summary for all trials of one (checker, history) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Summary {
    /// No trial produced an outcome (empty history, or every launch failed).
    NoData,
    /// At least one trial exceeded its time budget.
    TimedOut,
    /// Every trial completed.
    Completed {
        /// Arithmetic mean of the trial durations.
        mean_duration: Duration,
        /// Maximum peak resident memory across trials, if sampled. The
        /// benchmark goal is worst-case footprint, so this is a max, not a
        /// mean.
        peak_memory: Option<u64>,
    },
}

/// Collapses the outcomes of one group of trials into a [`Summary`].
///
/// A single timed-out trial makes the whole group [`Summary::TimedOut`]: an
/// average with a censored term would understate the true cost, and an honest
/// "did not finish" is more useful than an unreliable number. An empty group
/// yields [`Summary::NoData`] rather than a zero duration.
#[must_use]
pub fn aggregate(outcomes: &[Outcome]) -> Summary {
    if outcomes.is_empty() {
        return Summary::NoData;
    }

    let mut total = Duration::ZERO;
    let mut peak_memory = None;
    for outcome in outcomes {
        match outcome {
            Outcome::TimedOut => return Summary::TimedOut,
            Outcome::Completed {
                duration,
                peak_memory: peak,
            } => {
                total += *duration;
                if let Some(bytes) = peak {
                    peak_memory = Some(peak_memory.map_or(*bytes, |prev: u64| prev.max(*bytes)));
                }
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let trials = outcomes.len() as u32;
    Summary::Completed {
        mean_duration: total / trials,
        peak_memory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(secs: u64) -> Outcome {
        Outcome::Completed {
            duration: Duration::from_secs(secs),
            peak_memory: None,
        }
    }

    fn completed_with_memory(secs: u64, bytes: u64) -> Outcome {
        Outcome::Completed {
            duration: Duration::from_secs(secs),
            peak_memory: Some(bytes),
        }
    }

    #[test]
    fn empty_group_is_no_data() {
        assert_eq!(aggregate(&[]), Summary::NoData);
    }

    #[test]
    fn mean_of_completed_durations() {
        let summary = aggregate(&[completed(1), completed(3)]);
        assert_eq!(
            summary,
            Summary::Completed {
                mean_duration: Duration::from_secs(2),
                peak_memory: None,
            }
        );
    }

    #[test]
    fn one_timeout_poisons_the_group() {
        let summary = aggregate(&[completed(5), Outcome::TimedOut, completed(1)]);
        assert_eq!(summary, Summary::TimedOut);
    }

    #[test]
    fn timeout_wins_regardless_of_position() {
        assert_eq!(aggregate(&[Outcome::TimedOut]), Summary::TimedOut);
        assert_eq!(
            aggregate(&[Outcome::TimedOut, completed(1)]),
            Summary::TimedOut
        );
    }

    #[test]
    fn memory_is_the_maximum_across_trials() {
        let summary = aggregate(&[
            completed_with_memory(1, 100),
            completed_with_memory(3, 400),
            completed_with_memory(2, 250),
        ]);
        assert_eq!(
            summary,
            Summary::Completed {
                mean_duration: Duration::from_secs(2),
                peak_memory: Some(400),
            }
        );
    }

    #[test]
    fn missing_memory_samples_do_not_zero_the_peak() {
        let summary = aggregate(&[completed(2), completed_with_memory(2, 128)]);
        assert_eq!(
            summary,
            Summary::Completed {
                mean_duration: Duration::from_secs(2),
                peak_memory: Some(128),
            }
        );
    }
}
