//! Writing artifacts through a temporary file and renaming them into place.
//!
//! A partially written or unverified artifact never appears at its final
//! path: the bytes go to a uniquely named temporary file in the destination
//! directory, which is removed on drop unless it is persisted.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use binjar_zip::{VerifyReport, verify};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{BuildError, Result};

const TEMP_PREFIX: &str = ".binjar-";

/// A file that made it to its final path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub path: PathBuf,
    /// Verification result, when verification ran.
    pub report: Option<VerifyReport>,
}

/// Write `bytes` to `dir/file_name`, verifying the written copy first unless
/// `skip_verify` is set. The file is made executable.
pub fn publish(dir: &Path, file_name: &str, bytes: &[u8], skip_verify: bool) -> Result<Published> {
    let temp = write_temp(dir, bytes)?;

    let report = if skip_verify {
        debug!("skipping integrity check");
        None
    } else {
        let written = fs::read(temp.path()).map_err(|e| BuildError::io(temp.path(), e))?;
        Some(verify(&written)?)
    };

    set_executable(temp.path())?;
    let path = dir.join(file_name);
    persist(temp, &path)?;
    info!(path = %path.display(), bytes = bytes.len(), "published artifact");
    Ok(Published { path, report })
}

/// Copy `artifact` into `dir` under its base name, keeping its permissions.
pub fn install(artifact: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = artifact
        .file_name()
        .ok_or_else(|| {
            BuildError::io(
                artifact,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "artifact has no file name"),
            )
        })?
        .to_owned();
    let bytes = fs::read(artifact).map_err(|e| BuildError::io(artifact, e))?;
    let permissions = fs::metadata(artifact)
        .map_err(|e| BuildError::io(artifact, e))?
        .permissions();

    let temp = write_temp(dir, &bytes)?;
    fs::set_permissions(temp.path(), permissions).map_err(|e| BuildError::io(temp.path(), e))?;
    let path = dir.join(file_name);
    persist(temp, &path)?;
    info!(path = %path.display(), "installed artifact");
    Ok(path)
}

fn write_temp(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| BuildError::io(dir, e))?;
    temp.write_all(bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| BuildError::io(temp.path(), e))?;
    debug!(path = %temp.path().display(), bytes = bytes.len(), "wrote temporary file");
    Ok(temp)
}

fn persist(temp: NamedTempFile, path: &Path) -> Result<()> {
    temp.persist(path)
        .map(|_| ())
        .map_err(|e| BuildError::io(path, e.error))
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .map_err(|e| BuildError::io(path, e))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions).map_err(|e| BuildError::io(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
