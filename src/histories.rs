//! Discovery of history datasets.
//!
//! A history corpus is a directory tree: each immediate subdirectory of the
//! root is one named history dataset, and each entry inside a dataset is one
//! trial input (a file or a directory, depending on the checker's expected
//! layout). Discovery order is lexicographic by name so repeated harness runs
//! produce identically ordered reports.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// One named history dataset and its trial inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    /// Stable name of the dataset, used as the report row label.
    pub id: String,
    /// Trial input entries inside the dataset, sorted by path.
    pub trials: Vec<PathBuf>,
}

/// Finds all history datasets under the given root.
///
/// Non-directory entries directly under the root are skipped with a debug
/// message. A dataset with no trial inputs is kept: it contributes zero work
/// items but still gets an explicit "no data" row in the report.
///
/// # Errors
///
/// Fails if the root or one of the dataset directories cannot be read.
pub fn discover(root: &Path) -> anyhow::Result<Vec<History>> {
    log::info!("discovering histories under {}...", root.display());

    let mut histories = BTreeMap::new();
    let entries = fs::read_dir(root)
        .with_context(|| format!("could not read history root {}", root.display()))?;
    for entry in entries {
        let entry = entry.context("could not read history root entry")?;
        let path = entry.path();
        if !path.is_dir() {
            log::debug!("skipping non-directory entry {}...", path.display());
            continue;
        }

        let id = entry.file_name().to_string_lossy().into_owned();
        let mut trials = Vec::new();
        let trial_entries = fs::read_dir(&path)
            .with_context(|| format!("could not read history directory {}", path.display()))?;
        for trial in trial_entries {
            let trial = trial
                .with_context(|| format!("could not read entry of history {id}"))?;
            trials.push(trial.path());
        }
        trials.sort();

        if trials.is_empty() {
            log::warn!("[{id}] history has no trial inputs, it will report no data");
        } else {
            log::debug!("[{id}] found {} trial inputs", trials.len());
        }
        histories.insert(id.clone(), History { id, trials });
    }

    log::info!("found {} histories", histories.len());
    log::trace!("histories: {histories:#?}");

    Ok(histories.into_values().collect())
}
