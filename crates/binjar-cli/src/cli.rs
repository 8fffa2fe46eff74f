//! CLI argument definitions for binjar.

use std::path::PathBuf;

use binjar_build::BuildConfig;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "binjar",
    version,
    about = "Turn a jar into a self-executing file",
    long_about = "Turn a finished jar into a single self-executing file.\n\n\
                  A short launcher script, valid for both POSIX shells and Windows batch,\n\
                  is placed in front of the archive and every archive offset is repaired\n\
                  so the result is still a valid jar."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a self-executing file from a jar.
    Build(BuildArgs),

    /// Check that a file's archive offsets match its byte layout.
    Verify(FileArgs),

    /// List the entries of an archive with their recorded offsets.
    Inspect(FileArgs),
}

#[derive(Parser)]
pub struct BuildArgs {
    /// The jar to turn into an executable.
    #[arg(long = "archive", value_name = "JAR")]
    pub archive: PathBuf,

    /// Directory for the artifact (default: the jar's directory).
    #[arg(long = "target-dir", value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// Config file (default: ./binjar.toml when present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Entry point (main namespace or class).
    #[arg(long = "main", value_name = "NS")]
    pub main: Option<String>,

    /// Program name (default: the jar's file stem).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Program version, appended to the artifact name.
    #[arg(long = "program-version", value_name = "VERSION")]
    pub program_version: Option<String>,

    /// Runtime option; repeat for several. Replaces the defaults.
    #[arg(long = "jvm-opt", value_name = "OPT", allow_hyphen_values = true)]
    pub jvm_opts: Vec<String>,

    /// Put the jar on the bootstrap class path instead of running it with -jar.
    #[arg(long = "bootclasspath")]
    pub bootclasspath: bool,

    /// Skip verifying the written file.
    #[arg(long = "skip-verify")]
    pub skip_verify: bool,

    /// Inline launcher template.
    #[arg(long = "preamble-text", value_name = "TEXT")]
    pub preamble_text: Option<String>,

    /// Launcher script used verbatim.
    #[arg(long = "preamble-script", value_name = "PATH")]
    pub preamble_script: Option<PathBuf>,

    /// Also copy the artifact into this directory.
    #[arg(long = "install-dir", value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Artifact file name (default: <name>-<version>).
    #[arg(long = "output-name", value_name = "NAME")]
    pub output_name: Option<String>,
}

impl BuildArgs {
    /// The settings given on the command line, to be merged over the file.
    pub fn overrides(&self) -> BuildConfig {
        BuildConfig {
            entry_point: self.main.clone(),
            program_name: self.name.clone(),
            version: self.program_version.clone(),
            runtime_options: (!self.jvm_opts.is_empty()).then(|| self.jvm_opts.clone()),
            use_bootstrap_classpath: self.bootclasspath,
            skip_integrity_check: self.skip_verify,
            custom_preamble_text: self.preamble_text.clone(),
            custom_preamble_script_path: self.preamble_script.clone(),
            install_path: self.install_dir.clone(),
            output_name: self.output_name.clone(),
        }
    }
}

#[derive(Parser)]
pub struct FileArgs {
    /// File to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
