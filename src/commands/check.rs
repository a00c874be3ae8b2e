use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::{
    check::{check_all, expand_paths},
    launcher::{DotSlash, Launcher},
};

/// Exit status when the launcher itself is missing (`-1` as seen by the shell).
pub const LAUNCHER_MISSING_EXIT: u8 = 255;

/// Validates descriptor files (or directories of them) with the `dotslash` on PATH.
#[tracing::instrument]
pub fn check(paths: &[PathBuf]) -> Result<ExitCode> {
    let launcher = match DotSlash::locate() {
        Ok(launcher) => launcher,
        Err(e) => {
            eprintln!("Dotslash binary cannot be found, failing test: {:#}", e);
            return Ok(ExitCode::from(LAUNCHER_MISSING_EXIT));
        }
    };
    info!("Checking descriptors with {}", launcher.path().display());

    if run(&launcher, paths)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Checks every descriptor and prints the summary line. Returns whether all passed.
pub fn run<L: Launcher + ?Sized>(launcher: &L, paths: &[PathBuf]) -> Result<bool> {
    let paths = expand_paths(paths)?;
    let report = check_all(launcher, &paths);

    if report.success() {
        println!("🫡");
        Ok(true)
    } else {
        info!(
            "{} of {} descriptors failed",
            report.failed.len(),
            report.failed.len() + report.passed.len()
        );
        println!("🤔");
        Ok(false)
    }
}
