use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Contents of a `*.checker.json` metadata file.
///
/// Identifies one benchmarked checker variant. The `options` map is opaque to
/// the benchmark engine; only the matching command builder interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckerMetadata {
    /// Report label for this variant. Two variants of the same binary with
    /// different options carry different names.
    pub name: String,
    /// Which command builder constructs the argument vector.
    pub kind: CheckerKind,
    /// Executable path, resolved relative to the metadata file. Depending on
    /// the kind this is a binary, a jar, or an installation directory.
    pub executable: String,
    /// Checker-specific option values, passed through to the command builder.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Time budget for a single invocation, in seconds.
    pub timeout_secs: u64,
}

/// Tag selecting the command builder for a checker variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckerKind {
    /// The veristrong `checker` binary.
    Veristrong,
    /// CobraVerifier, launched through `java -jar`.
    Cobra,
    /// PolySI, launched through `java -jar`.
    Polysi,
    /// Viper, launched through `python3`.
    Viper,
    /// The dbcop verifier binary.
    Dbcop,
}
