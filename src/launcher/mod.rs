//! Running descriptors through the `dotslash` launcher.

use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the launcher executable searched for on `PATH`.
pub const DOTSLASH: &str = "dotslash";

#[cfg_attr(test, mockall::automock)]
pub trait Launcher {
    /// Runs the interpreter behind `descriptor` with `python -c <script>`
    /// semantics and returns its standard output.
    fn run_script(&self, descriptor: &Path, script: &str) -> Result<String>;
}

/// The real `dotslash` binary.
pub struct DotSlash {
    path: PathBuf,
}

impl DotSlash {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Finds `dotslash` on `PATH`.
    #[tracing::instrument]
    pub fn locate() -> Result<Self> {
        let path = which::which(DOTSLASH)
            .with_context(|| format!("{} binary cannot be found on PATH", DOTSLASH))?;
        debug!("Using {} at {}", DOTSLASH, path.display());
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Launcher for DotSlash {
    #[tracing::instrument(skip(self))]
    fn run_script(&self, descriptor: &Path, script: &str) -> Result<String> {
        let output = Command::new(&self.path)
            .arg(descriptor)
            .arg("-c")
            .arg(script)
            .output()
            .with_context(|| format!("Failed to run {}", self.path.display()))?;

        if !output.status.success() {
            bail!(
                "{} {} exited with {}: {}",
                DOTSLASH,
                descriptor.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout).context("Launcher output is not valid UTF-8")
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn fake_launcher(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join(DOTSLASH);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_run_script_passes_descriptor_and_script() {
        let dir = tempdir().unwrap();
        let launcher = DotSlash::new(fake_launcher(dir.path(), r#"echo "$1|$2|$3""#));

        let out = launcher
            .run_script(Path::new("/tmp/cpython-3.13"), "print(1)")
            .unwrap();

        assert_eq!(out, "/tmp/cpython-3.13|-c|print(1)\n");
    }

    #[test]
    fn test_run_script_non_zero_exit() {
        let dir = tempdir().unwrap();
        let launcher = DotSlash::new(fake_launcher(dir.path(), "echo boom >&2; exit 3"));

        let err = launcher
            .run_script(Path::new("descriptor"), "print(1)")
            .unwrap_err();

        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_path_accessor() {
        let launcher = DotSlash::new(PathBuf::from("/usr/bin/dotslash"));
        assert_eq!(launcher.path(), Path::new("/usr/bin/dotslash"));
    }
}
