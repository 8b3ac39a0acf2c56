//! Utilities for creating and working with checker configurations.
//!
//! The primary entrypoint for this module is the [`load`] function, which
//! finds all checker metadata files under a given path and returns a vector of
//! ready-to-run [`Checker`] structs.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use checker_bench::checkers::load;
//!
//! let path = PathBuf::from("checkers");
//!
//! let checkers = load(&path, None);
//! ```

use std::{
    fmt::{self, Display, Formatter},
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

mod command;
mod metadata;

pub use command::{BuildCommand, HISTORY_FILE_OPTION};
pub use metadata::{CheckerKind, CheckerMetadata};

use crate::invoke::Invocation;

/// Glob pattern for checker metadata files.
pub const FILE_PATTERN: &str = "**/*.checker.json";

/// Unique identifier for a checker configuration.
///
/// # Examples
///
/// ```
/// use checker_bench::checkers::Identifier;
///
/// let identifier = Identifier::from("veristrong");
///
/// assert_eq!(identifier.to_string(), "veristrong");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier(String);

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Total representation of one benchmarked checker variant.
///
/// Encapsulates everything needed to invoke the checker against a trial
/// input. Typically produced from a metadata file by [`load`], but it can
/// also be constructed manually.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checker {
    /// Unique identifier for this checker configuration.
    pub identifier: Identifier,
    /// Metadata for this checker.
    pub metadata: CheckerMetadata,
    /// Resolved path to the checker executable (or installation directory,
    /// depending on the kind).
    pub executable: PathBuf,
}

impl Checker {
    /// Time budget for a single invocation of this checker.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.metadata.timeout_secs)
    }

    /// Builds the invocation for running this checker on `input`, using the
    /// command builder selected by the metadata's kind tag.
    #[must_use]
    pub fn command(&self, input: &Path) -> Invocation {
        self.metadata.kind.builder().build(self, input)
    }
}

/// Finds all checker metadata files under the given path.
///
/// Searches for all files matching the [`FILE_PATTERN`] pattern under the
/// given path and attempts to deserialize them into [`CheckerMetadata`]
/// structs. Returns each metadata together with the path of its file, in
/// glob (sorted) order.
///
/// # Errors
///
/// If the glob pattern cannot be constructed or the glob search fails, then
/// the error is returned.
///
/// If any of the files matching the pattern cannot be opened or deserialized,
/// then the error is logged and the file is skipped.
pub fn find_all_metadata(path: &Path) -> anyhow::Result<Vec<(CheckerMetadata, PathBuf)>> {
    log::info!(
        "finding all checker metadata files under {}...",
        path.display()
    );
    let metadatas: Vec<(CheckerMetadata, PathBuf)> = glob::glob(
        path.join(FILE_PATTERN)
            .to_str()
            .context("could not convert checker metadata pattern to string")?,
    )
    .context("searching for all checker metadata files")?
    .filter_map(|r| {
        let path = r
            .map_err(|err| {
                log::warn!("could not get globbed path: {err}, skipping...");
            })
            .ok()?;

        log::debug!("processing checker metadata file ({})...", path.display());

        let metadata: CheckerMetadata = serde_json::from_reader(
            File::open(&path)
                .map_err(|err| {
                    log::warn!("could not open checker metadata file: {err}, skipping...");
                })
                .ok()?,
        )
        .map_err(|err| {
            log::warn!("could not deserialize checker metadata: {err}, skipping...");
        })
        .ok()?;

        log::debug!("processed checker metadata file");
        Some((metadata, path))
    })
    .collect();
    log::info!("found {} checker metadata files", metadatas.len());
    log::trace!("checker metadatas: {metadatas:#?}");

    Ok(metadatas)
}

/// Loads all checker configurations under the given path.
///
/// If the optional `metadatas` argument is provided, then it will be used
/// directly. Otherwise, metadata files are discovered under the given path
/// using [`find_all_metadata`]. Executable paths are resolved relative to the
/// metadata file that names them; a checker whose executable cannot be
/// resolved is logged and skipped rather than aborting the whole run.
///
/// # Errors
///
/// Fails only if metadata discovery itself fails.
pub fn load(
    path: &Path,
    metadatas: Option<Vec<(CheckerMetadata, PathBuf)>>,
) -> anyhow::Result<Vec<Checker>> {
    let metadatas = if let Some(metadatas) = metadatas {
        metadatas
    } else {
        find_all_metadata(path)?
    };

    log::info!("loading checkers...");
    let checkers: Vec<Checker> = metadatas
        .into_iter()
        .filter_map(|(metadata, metadata_path)| {
            let identifier = Identifier(metadata.name.clone());
            let executable = metadata_path
                .parent()
                .or_else(|| {
                    log::warn!(
                        "[{identifier}] could not get parent of checker metadata file, skipping..."
                    );
                    None
                })?
                .join(&metadata.executable)
                .canonicalize()
                .map_err(|err| {
                    log::warn!(
                        "[{identifier}] could not resolve executable {}: {err}, skipping...",
                        metadata.executable
                    );
                })
                .ok()?;

            log::debug!(
                "[{identifier}] loaded checker with executable {}",
                executable.display()
            );
            Some(Checker {
                identifier,
                metadata,
                executable,
            })
        })
        .collect();
    log::info!("loaded {} checkers", checkers.len());
    log::trace!("checkers: {checkers:#?}");

    Ok(checkers)
}
