//! Rendering aggregated results as a comma-separated table.
//!
//! The emitted table follows the upstream reproduction scripts: a fixed
//! `tool,hist,runtime` header (plus `memory` when sampling was enabled), one
//! line per (checker, history) pair in enumeration order, runtimes in seconds,
//! and the reserved `TO` / `ND` literals for timed-out and empty groups. The
//! output is byte-stable for identical input rows so reports can be diffed.

use serde::{Deserialize, Serialize};

use crate::aggregate::Summary;

/// Reserved runtime literal for a group with at least one timed-out trial.
pub const TIMEOUT_SENTINEL: &str = "TO";

/// Reserved runtime literal for a group with no outcomes at all.
pub const NO_DATA_SENTINEL: &str = "ND";

/// One aggregate row of the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Report label of the checker configuration.
    pub checker: String,
    /// Name of the history dataset.
    pub history: String,
    /// Aggregated result for this (checker, history) pair.
    pub summary: Summary,
}

/// Renders the report for an ordered sequence of rows.
///
/// Row order is preserved as given; the caller is responsible for producing
/// rows in deterministic enumeration order. When `with_memory` is set a
/// fourth `memory` column is emitted, holding peak bytes for completed groups
/// and an empty field otherwise.
#[must_use]
pub fn emit(rows: &[ResultRow], with_memory: bool) -> String {
    let mut out = String::new();
    if with_memory {
        out.push_str("tool,hist,runtime,memory\n");
    } else {
        out.push_str("tool,hist,runtime\n");
    }

    for row in rows {
        let runtime = match &row.summary {
            Summary::NoData => NO_DATA_SENTINEL.to_string(),
            Summary::TimedOut => TIMEOUT_SENTINEL.to_string(),
            // `{:?}` on f64 always keeps a fractional part (`2.0`, not `2`),
            // which keeps the column unambiguous next to the sentinels.
            Summary::Completed { mean_duration, .. } => {
                format!("{:?}", mean_duration.as_secs_f64())
            }
        };
        out.push_str(&row.checker);
        out.push(',');
        out.push_str(&row.history);
        out.push(',');
        out.push_str(&runtime);
        if with_memory {
            out.push(',');
            if let Summary::Completed {
                peak_memory: Some(bytes),
                ..
            } = &row.summary
            {
                out.push_str(&bytes.to_string());
            }
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    fn row(checker: &str, history: &str, summary: Summary) -> ResultRow {
        ResultRow {
            checker: checker.to_string(),
            history: history.to_string(),
            summary,
        }
    }

    fn completed(secs: f64) -> Summary {
        Summary::Completed {
            mean_duration: Duration::from_secs_f64(secs),
            peak_memory: None,
        }
    }

    #[test]
    fn renders_fixed_header_and_rows() {
        let rows = vec![
            row("veristrong", "A", completed(2.0)),
            row("veristrong", "B", completed(2.0)),
            row("veristrong", "C", Summary::TimedOut),
        ];
        assert_eq!(
            emit(&rows, false),
            "tool,hist,runtime\n\
             veristrong,A,2.0\n\
             veristrong,B,2.0\n\
             veristrong,C,TO\n"
        );
    }

    #[test]
    fn sentinels_are_distinct_single_tokens() {
        let rows = vec![
            row("baseline", "empty", Summary::NoData),
            row("baseline", "slow", Summary::TimedOut),
        ];
        let text = emit(&rows, false);
        assert!(text.contains("baseline,empty,ND\n"));
        assert!(text.contains("baseline,slow,TO\n"));
        assert_ne!(TIMEOUT_SENTINEL, NO_DATA_SENTINEL);
    }

    #[test]
    fn memory_column_only_when_requested() {
        let rows = vec![row(
            "veristrong",
            "tpcc-10k",
            Summary::Completed {
                mean_duration: Duration::from_secs_f64(1.5),
                peak_memory: Some(1_048_576),
            },
        )];
        assert_eq!(
            emit(&rows, true),
            "tool,hist,runtime,memory\nveristrong,tpcc-10k,1.5,1048576\n"
        );
        assert_eq!(
            emit(&rows, false),
            "tool,hist,runtime\nveristrong,tpcc-10k,1.5\n"
        );
    }

    #[test]
    fn memory_field_is_empty_for_sentinel_rows() {
        let rows = vec![
            row("cobra", "slow", Summary::TimedOut),
            row("cobra", "empty", Summary::NoData),
        ];
        assert_eq!(
            emit(&rows, true),
            "tool,hist,runtime,memory\ncobra,slow,TO,\ncobra,empty,ND,\n"
        );
    }

    #[test]
    fn emission_is_deterministic() {
        let rows = vec![
            row("veristrong", "rubis-10k", completed(0.731)),
            row("baseline", "rubis-10k", Summary::TimedOut),
        ];
        assert_eq!(emit(&rows, true), emit(&rows, true));
    }
}
