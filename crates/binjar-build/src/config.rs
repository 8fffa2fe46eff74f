//! Build configuration.
//!
//! A `BuildConfig` is read from a flat TOML table (`binjar.toml`) and then
//! overridden field by field by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use binjar_preamble::{RuntimeOptions, TemplateChoice};
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "binjar.toml";

/// Everything a build needs besides the archive and the target directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Main namespace or class. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,

    /// Defaults to the archive's file stem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Runtime options. The tiered-compilation defaults apply when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_options: Option<Vec<String>>,

    pub use_bootstrap_classpath: bool,

    pub skip_integrity_check: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_preamble_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_preamble_script_path: Option<PathBuf>,

    /// Directory the finished artifact is copied into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_path: Option<PathBuf>,

    /// Artifact file name, replacing `<program_name>-<version>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
}

impl BuildConfig {
    /// Parse a TOML document. `path` is only used in error messages.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|err| BuildError::InvalidConfig {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| BuildError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        tracing::info!("Loaded build config from {:?}", path);
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| BuildError::InvalidConfig {
            path: PathBuf::from(CONFIG_FILE_NAME),
            message: err.to_string(),
        })
    }

    /// Apply `overrides` on top of `self`.
    ///
    /// Set values in `overrides` win. Flags are switched on by either side.
    #[must_use]
    pub fn merge(self, overrides: BuildConfig) -> BuildConfig {
        BuildConfig {
            entry_point: overrides.entry_point.or(self.entry_point),
            program_name: overrides.program_name.or(self.program_name),
            version: overrides.version.or(self.version),
            runtime_options: overrides.runtime_options.or(self.runtime_options),
            use_bootstrap_classpath: self.use_bootstrap_classpath
                || overrides.use_bootstrap_classpath,
            skip_integrity_check: self.skip_integrity_check || overrides.skip_integrity_check,
            custom_preamble_text: overrides.custom_preamble_text.or(self.custom_preamble_text),
            custom_preamble_script_path: overrides
                .custom_preamble_script_path
                .or(self.custom_preamble_script_path),
            install_path: overrides.install_path.or(self.install_path),
            output_name: overrides.output_name.or(self.output_name),
        }
    }

    /// The configured entry point, or [`BuildError::MissingEntryPoint`].
    pub fn entry_point(&self) -> Result<&str> {
        self.entry_point
            .as_deref()
            .map(str::trim)
            .filter(|main| !main.is_empty())
            .ok_or(BuildError::MissingEntryPoint)
    }

    /// Program name, falling back to the archive's file stem.
    pub fn program_name_for(&self, archive: &Path) -> String {
        self.program_name.clone().unwrap_or_else(|| {
            archive
                .file_stem()
                .map_or_else(|| "app".to_string(), |stem| stem.to_string_lossy().into_owned())
        })
    }

    /// File name of the published artifact.
    pub fn output_file_name(&self, archive: &Path) -> String {
        if let Some(name) = &self.output_name {
            return name.clone();
        }
        let program = self.program_name_for(archive);
        match self.version.as_deref() {
            Some(version) if !version.is_empty() => format!("{program}-{version}"),
            _ => program,
        }
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions::from_config(self.runtime_options.as_deref())
    }

    pub fn template_choice(&self) -> TemplateChoice<'_> {
        TemplateChoice {
            script_path: self.custom_preamble_script_path.as_deref(),
            inline_text: self.custom_preamble_text.as_deref(),
            use_bootstrap_classpath: self.use_bootstrap_classpath,
        }
    }
}
