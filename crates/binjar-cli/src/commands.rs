//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use binjar_build::{BuildConfig, BuildError, BuildOutcome, BuildRequest, CONFIG_FILE_NAME, ErrorKind, build};
use binjar_zip::{ArchiveLayout, VerifyReport, ZipError, read_archive, verify_file};
use tracing::debug;

use crate::cli::{BuildArgs, FileArgs};

pub fn run_build(args: &BuildArgs) -> Result<BuildOutcome> {
    let file_config = load_config(args.config.as_deref())?;
    let config = file_config.merge(args.overrides());
    let target_dir = args
        .target_dir
        .clone()
        .unwrap_or_else(|| default_target_dir(&args.archive));

    let request = BuildRequest::new(&args.archive, target_dir, config);
    build(&request).with_context(|| format!("building {}", args.archive.display()))
}

pub fn run_verify(args: &FileArgs) -> Result<VerifyReport> {
    verify_file(&args.file).with_context(|| format!("verifying {}", args.file.display()))
}

pub fn run_inspect(args: &FileArgs) -> Result<ArchiveLayout> {
    let data = read_archive(&args.file)?;
    ArchiveLayout::read(&data).with_context(|| format!("reading {}", args.file.display()))
}

/// Classify a command failure for the exit status.
///
/// Anything that is neither a build nor an archive error counts as I/O.
pub fn error_kind(error: &anyhow::Error) -> ErrorKind {
    if let Some(err) = error.downcast_ref::<BuildError>() {
        return err.kind();
    }
    if let Some(err) = error.downcast_ref::<ZipError>() {
        return ErrorKind::from_zip(err);
    }
    ErrorKind::Io
}

/// The explicit config file, else `binjar.toml` in the working directory
/// when present, else an empty config.
fn load_config(explicit: Option<&Path>) -> Result<BuildConfig> {
    if let Some(path) = explicit {
        return Ok(BuildConfig::load(path)?);
    }
    let implicit = Path::new(CONFIG_FILE_NAME);
    if implicit.is_file() {
        debug!(path = %implicit.display(), "using config file");
        return Ok(BuildConfig::load(implicit)?);
    }
    Ok(BuildConfig::default())
}

fn default_target_dir(archive: &Path) -> PathBuf {
    match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
