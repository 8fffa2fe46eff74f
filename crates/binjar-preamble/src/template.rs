//! Launcher template selection.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PreambleError, Result};

/// Runs the archive as an executable jar under both interpreters.
///
/// The `:;` prefix is a label to the batch interpreter and a no-op command to
/// the POSIX shell. `exec` and `goto :eof` keep either interpreter from
/// reaching the archive bytes.
pub const DEFAULT_TEMPLATE: &str = concat!(
    ":;exec java {{jvm_opts}} -jar \"$0\" \"$@\"\n",
    "@echo off\r\n",
    "java {{win_jvm_opts}} -jar \"%~f0\" %*\r\n",
    "goto :eof\r\n",
);

/// Appends the archive to the bootstrap class path and runs `{{main}}`.
pub const BOOTCLASSPATH_TEMPLATE: &str = concat!(
    ":;exec java {{jvm_opts}} -Xbootclasspath/a:\"$0\" {{main}} \"$@\"\n",
    "@echo off\r\n",
    "java {{win_jvm_opts}} -Xbootclasspath/a:\"%~f0\" {{main}} %*\r\n",
    "goto :eof\r\n",
);

/// The settings that decide which template is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateChoice<'a> {
    pub script_path: Option<&'a Path>,
    pub inline_text: Option<&'a str>,
    pub use_bootstrap_classpath: bool,
}

/// Where the launcher text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// External script file, used verbatim.
    ScriptFile(PathBuf),
    /// Inline template text.
    Inline(String),
    /// Built-in bootstrap class path variant.
    BootClasspath,
    /// Built-in default variant.
    Default,
}

type Guard = fn(&TemplateChoice<'_>) -> Option<TemplateSource>;

fn script_file(choice: &TemplateChoice<'_>) -> Option<TemplateSource> {
    choice
        .script_path
        .map(|path| TemplateSource::ScriptFile(path.to_path_buf()))
}

fn inline_text(choice: &TemplateChoice<'_>) -> Option<TemplateSource> {
    choice
        .inline_text
        .map(|text| TemplateSource::Inline(text.to_string()))
}

fn boot_classpath(choice: &TemplateChoice<'_>) -> Option<TemplateSource> {
    choice
        .use_bootstrap_classpath
        .then_some(TemplateSource::BootClasspath)
}

/// Alternatives in priority order. The first that matches wins.
const CASCADE: [Guard; 3] = [script_file, inline_text, boot_classpath];

impl TemplateSource {
    /// Pick exactly one source for `choice`.
    pub fn select(choice: &TemplateChoice<'_>) -> Self {
        CASCADE
            .iter()
            .find_map(|guard| guard(choice))
            .unwrap_or(Self::Default)
    }

    /// Load the template. Only [`TemplateSource::ScriptFile`] touches the
    /// filesystem.
    pub fn resolve(self) -> Result<Template> {
        debug!(source = %self, "resolving launcher template");
        match self {
            Self::ScriptFile(path) => match std::fs::read(&path) {
                Ok(bytes) => Ok(Template::Verbatim(bytes)),
                Err(err) => Err(PreambleError::read_failed(path, err)),
            },
            Self::Inline(text) => Ok(Template::Text(text)),
            Self::BootClasspath => Ok(Template::Text(BOOTCLASSPATH_TEMPLATE.to_string())),
            Self::Default => Ok(Template::Text(DEFAULT_TEMPLATE.to_string())),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptFile(path) => write!(f, "script file {}", path.display()),
            Self::Inline(_) => write!(f, "inline text"),
            Self::BootClasspath => write!(f, "bootstrap classpath"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A resolved launcher template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Raw script bytes, never templated.
    Verbatim(Vec<u8>),
    /// Text with `{{placeholder}}` markers.
    Text(String),
}

/// Select and load the template for `choice`.
pub fn resolve_template(choice: &TemplateChoice<'_>) -> Result<Template> {
    TemplateSource::select(choice).resolve()
}
