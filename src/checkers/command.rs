//! Per-checker command builders.
//!
//! Each supported checker has its own way of being launched (a bare binary, a
//! jar behind `java`, a Python entry point), its own flag conventions, and its
//! own expectation about which file inside a trial input to read. One builder
//! per [`CheckerKind`] keeps that knowledge out of the benchmark engine: the
//! engine hands a builder a trial input path and gets back a literal
//! [`Invocation`].

use std::path::{Path, PathBuf};

use crate::invoke::Invocation;

use super::{Checker, CheckerKind};

/// Reserved option naming the history file inside a trial input directory.
pub const HISTORY_FILE_OPTION: &str = "history-file";

/// Maps a (checker, trial input) pair to an executable invocation.
pub trait BuildCommand {
    /// Builds the literal argument vector for running `checker` on `input`.
    fn build(&self, checker: &Checker, input: &Path) -> Invocation;
}

impl CheckerKind {
    /// Returns the command builder for this kind.
    #[must_use]
    pub fn builder(self) -> &'static dyn BuildCommand {
        match self {
            Self::Veristrong => &VeristrongCommand,
            Self::Cobra => &CobraCommand,
            Self::Polysi => &PolysiCommand,
            Self::Viper => &ViperCommand,
            Self::Dbcop => &DbcopCommand,
        }
    }
}

/// Joins `file` onto a trial input directory; file inputs are used as-is.
fn input_entry(input: &Path, file: &str) -> PathBuf {
    if input.is_dir() {
        input.join(file)
    } else {
        input.to_path_buf()
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `checker <history> --<option> <value>...`
///
/// All options except the reserved [`HISTORY_FILE_OPTION`] are passed through
/// as long flags in sorted order (`--pruning`, `--solver`,
/// `--isolation-level`, `--history-type`, ...).
struct VeristrongCommand;

impl BuildCommand for VeristrongCommand {
    fn build(&self, checker: &Checker, input: &Path) -> Invocation {
        let history_file = checker
            .metadata
            .options
            .get(HISTORY_FILE_OPTION)
            .map_or("history.bincode", String::as_str);
        let mut args = vec![display(&input_entry(input, history_file))];
        for (option, value) in &checker.metadata.options {
            if option == HISTORY_FILE_OPTION {
                continue;
            }
            args.push(format!("--{option}"));
            args.push(value.clone());
        }
        Invocation {
            program: checker.executable.clone(),
            args,
        }
    }
}

/// `java -Djava.library.path=... -jar CobraVerifier-...jar mono audit <config> <history>`
///
/// The checker executable is the CobraVerifier installation directory; the
/// monosat native library and the assembled jar live at fixed paths inside it.
struct CobraCommand;

impl BuildCommand for CobraCommand {
    fn build(&self, checker: &Checker, input: &Path) -> Invocation {
        let home = &checker.executable;
        let config = checker.metadata.options.get("config").map_or_else(
            || home.join("cobra.conf.nogpu"),
            |config| home.join(config),
        );
        Invocation {
            program: PathBuf::from("java"),
            args: vec![
                format!(
                    "-Djava.library.path={}/include/:{}/build/monosat",
                    home.display(),
                    home.display()
                ),
                "-jar".to_string(),
                display(
                    &home.join("target/CobraVerifier-0.0.1-SNAPSHOT-jar-with-dependencies.jar"),
                ),
                "mono".to_string(),
                "audit".to_string(),
                display(&config),
                display(input),
            ],
        }
    }
}

/// `java -jar PolySI.jar audit --type=cobra <history>/log`
struct PolysiCommand;

impl BuildCommand for PolysiCommand {
    fn build(&self, checker: &Checker, input: &Path) -> Invocation {
        Invocation {
            program: PathBuf::from("java"),
            args: vec![
                "-jar".to_string(),
                display(&checker.executable),
                "audit".to_string(),
                "--type=cobra".to_string(),
                display(&input_entry(input, "log")),
            ],
        }
    }
}

/// `python3 <viper>/src/main_allcases.py --config_file ... --algo 6 --sub_dir <history>/json ...`
struct ViperCommand;

impl BuildCommand for ViperCommand {
    fn build(&self, checker: &Checker, input: &Path) -> Invocation {
        let home = &checker.executable;
        let config = checker.metadata.options.get("config").map_or_else(
            || home.join("src/config.yaml"),
            |config| home.join(config),
        );
        let algo = checker
            .metadata
            .options
            .get("algo")
            .map_or("6", String::as_str);
        Invocation {
            program: PathBuf::from("python3"),
            args: vec![
                display(&home.join("src/main_allcases.py")),
                "--config_file".to_string(),
                display(&config),
                "--algo".to_string(),
                algo.to_string(),
                "--sub_dir".to_string(),
                display(&input.join("json")),
                "--perf_file".to_string(),
                "/tmp/viper_perf.txt".to_string(),
                "--exp_name".to_string(),
                "bench".to_string(),
                "--strong-session".to_string(),
            ],
        }
    }
}

/// `dbcop verify -c <isolation> --out_dir /tmp/dbcop_output --ver_dir <history>`
struct DbcopCommand;

impl BuildCommand for DbcopCommand {
    fn build(&self, checker: &Checker, input: &Path) -> Invocation {
        let isolation = checker
            .metadata
            .options
            .get("isolation-level")
            .map_or("si", String::as_str);
        Invocation {
            program: checker.executable.clone(),
            args: vec![
                "verify".to_string(),
                "-c".to_string(),
                isolation.to_string(),
                "--out_dir".to_string(),
                "/tmp/dbcop_output".to_string(),
                "--ver_dir".to_string(),
                display(input),
            ],
        }
    }
}
