//! Validation of generated descriptor files.
//!
//! A descriptor passes when the interpreter `dotslash` launches from it
//! reports the version encoded in the descriptor name, and is a
//! free-threading build exactly when the name carries the `t` suffix.

use anyhow::{Context, Result, anyhow};
use log::debug;
use std::path::{Path, PathBuf};

use crate::DISTRIBUTION;
use crate::launcher::Launcher;

/// Prints the interpreter's `sys.version`.
pub const VERSION_SCRIPT: &str = "import sys; print(sys.version)";

/// Phrase CPython includes in `sys.version` for free-threaded builds.
pub const FREE_THREADING_MARKER: &str = "free-threading build";

const FREE_THREADED_SUFFIX: char = 't';

/// The launched interpreter did not report what the descriptor promised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    VersionMismatch {
        expected: String,
        output: String,
    },
    FlavorMismatch {
        free_threaded: bool,
        output: String,
    },
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::VersionMismatch { expected, output } => {
                write!(f, "version {:?} not found in output {:?}", expected, output)
            }
            CheckError::FlavorMismatch {
                free_threaded,
                output,
            } => write!(
                f,
                "requested free_threaded={}, got output {:?}",
                free_threaded, output
            ),
        }
    }
}

impl std::error::Error for CheckError {}

/// What a descriptor declares about the interpreter it launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedBuild {
    pub version: String,
    pub free_threaded: bool,
}

impl ExpectedBuild {
    /// Parses a descriptor file's contents (header line, then JSON).
    pub fn from_descriptor(contents: &str) -> Result<Self> {
        let (_header, body) = contents.split_once('\n').unwrap_or((contents, ""));
        let descriptor: serde_json::Value =
            serde_json::from_str(body).context("Descriptor body is not valid JSON")?;

        let name = descriptor
            .get("name")
            .and_then(|name| name.as_str())
            .ok_or_else(|| anyhow!("Descriptor has no string \"name\" field"))?;

        Ok(Self::from_name(name))
    }

    /// `cpython-3.13t` → version `3.13`, free-threaded.
    pub fn from_name(name: &str) -> Self {
        let version = name
            .strip_prefix(DISTRIBUTION)
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(name);
        match version.strip_suffix(FREE_THREADED_SUFFIX) {
            Some(version) => Self {
                version: version.to_string(),
                free_threaded: true,
            },
            None => Self {
                version: version.to_string(),
                free_threaded: false,
            },
        }
    }

    /// Compares the launched interpreter's `sys.version` with the expectation.
    pub fn verify(&self, output: &str) -> Result<(), CheckError> {
        if !output.starts_with(&self.version) {
            return Err(CheckError::VersionMismatch {
                expected: self.version.clone(),
                output: output.to_string(),
            });
        }

        let is_free_threading_build = output.contains(FREE_THREADING_MARKER);
        if self.free_threaded != is_free_threading_build {
            return Err(CheckError::FlavorMismatch {
                free_threaded: self.free_threaded,
                output: output.to_string(),
            });
        }

        Ok(())
    }
}

/// Checks a single descriptor file.
#[tracing::instrument(skip(launcher))]
pub fn check_path<L: Launcher + ?Sized>(launcher: &L, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
    let expected = ExpectedBuild::from_descriptor(&contents)
        .with_context(|| format!("Failed to parse descriptor {}", path.display()))?;
    debug!("{}: expecting {:?}", path.display(), expected);

    let output = launcher.run_script(path, VERSION_SCRIPT)?;
    expected
        .verify(&output)
        .with_context(|| format!("Descriptor {} failed validation", path.display()))?;

    Ok(())
}

/// Expands directory arguments to all of their immediate entries, hidden
/// ones included. Directory paths must be valid UTF-8 to be expanded.
pub fn expand_paths(args: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for arg in args {
        if !arg.is_dir() {
            paths.push(arg.clone());
            continue;
        }

        let dir = arg
            .to_str()
            .with_context(|| format!("Directory path {} is not valid UTF-8", arg.display()))?;
        let pattern = format!("{}/*", glob::Pattern::escape(dir));
        let mut entries = glob::glob(&pattern)
            .with_context(|| format!("Invalid directory path {}", arg.display()))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list {}", arg.display()))?;
        entries.sort();
        paths.extend(entries);
    }

    Ok(paths)
}

/// Outcome of checking a batch of descriptors.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub passed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl CheckReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Checks every path, continuing past failures.
pub fn check_all<L: Launcher + ?Sized>(launcher: &L, paths: &[PathBuf]) -> CheckReport {
    let mut report = CheckReport::default();

    for path in paths {
        match check_path(launcher, path) {
            Ok(()) => {
                println!("👌{}", path.display());
                report.passed.push(path.clone());
            }
            Err(e) => {
                eprintln!("{:?}", e);
                report.failed.push((path.clone(), e));
            }
        }
    }

    report
}
