//! Runtime option strings for the two launcher dialects.

use std::sync::LazyLock;

use regex::Regex;

/// Options used when none are configured: fast startup over peak throughput.
pub const DEFAULT_RUNTIME_OPTIONS: &[&str] = &["-XX:+TieredCompilation", "-XX:TieredStopAtLevel=1"];

/// POSIX environment variable reference (`$NAME`).
static POSIX_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)").expect("Invalid environment variable regex"));

/// Options passed to the runtime by the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    options: Vec<String>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME_OPTIONS.iter().copied())
    }
}

impl RuntimeOptions {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured options, or the defaults when none are configured.
    pub fn from_config(options: Option<&[String]>) -> Self {
        options.map_or_else(Self::default, |options| Self::new(options.iter().cloned()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.options
    }

    /// Options for the POSIX shell, unchanged and space separated.
    pub fn posix(&self) -> String {
        self.options.join(" ")
    }

    /// Options for the batch interpreter, with `$NAME` rewritten to `%NAME%`.
    pub fn windows(&self) -> String {
        self.options
            .iter()
            .map(|option| POSIX_VAR_REGEX.replace_all(option, "%${1}%"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
