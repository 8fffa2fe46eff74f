//! The build pipeline.
//!
//! entry point check -> template -> render -> read archive -> prefix ->
//! publish (write, verify, chmod, rename) -> install

use std::path::PathBuf;

use binjar_preamble::{RenderContext, render, resolve_template};
use binjar_zip::{prefix, read_archive};
use sha2::{Digest, Sha256};
use tracing::{info, info_span};

use crate::config::BuildConfig;
use crate::error::Result;
use crate::publish::{install, publish};

/// One build: an archive, where to put the result, and how.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub archive: PathBuf,
    pub target_dir: PathBuf,
    pub config: BuildConfig,
}

impl BuildRequest {
    pub fn new(archive: impl Into<PathBuf>, target_dir: impl Into<PathBuf>, config: BuildConfig) -> Self {
        Self {
            archive: archive.into(),
            target_dir: target_dir.into(),
            config,
        }
    }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub artifact: PathBuf,
    pub installed: Option<PathBuf>,
    pub preamble_len: usize,
    pub archive_len: usize,
    /// Entry count reported by verification; `None` when it was skipped.
    pub entries: Option<usize>,
    /// Hex SHA-256 of the published artifact.
    pub sha256: String,
}

/// Run a build.
///
/// Refuses with [`BuildError::MissingEntryPoint`](crate::BuildError::MissingEntryPoint)
/// before touching the filesystem when no entry point is configured.
pub fn build(request: &BuildRequest) -> Result<BuildOutcome> {
    let span = info_span!("build", archive = %request.archive.display());
    let _guard = span.enter();

    let config = &request.config;
    let main = config.entry_point()?;

    let preamble = {
        let _span = info_span!("render").entered();
        let template = resolve_template(&config.template_choice())?;
        let options = config.runtime_options();
        let name = config.program_name_for(&request.archive);
        render(
            &template,
            &RenderContext {
                name: &name,
                version: config.version.as_deref().unwrap_or_default(),
                main,
                options: &options,
            },
        )
    };

    let archive = read_archive(&request.archive)?;
    let prefixed =
        info_span!("prefix", preamble = preamble.len()).in_scope(|| prefix(&archive, preamble.as_bytes()))?;

    let file_name = config.output_file_name(&request.archive);
    let published = info_span!("publish").in_scope(|| {
        publish(
            &request.target_dir,
            &file_name,
            &prefixed,
            config.skip_integrity_check,
        )
    })?;

    let installed = config
        .install_path
        .as_deref()
        .map(|dir| info_span!("install").in_scope(|| install(&published.path, dir)))
        .transpose()?;

    let outcome = BuildOutcome {
        sha256: hex::encode(Sha256::digest(&prefixed)),
        artifact: published.path,
        installed,
        preamble_len: preamble.len(),
        archive_len: archive.len(),
        entries: published.report.map(|report| report.entries),
    };
    info!(artifact = %outcome.artifact.display(), "build complete");
    Ok(outcome)
}
