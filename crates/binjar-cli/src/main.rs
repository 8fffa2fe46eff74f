//! binjar CLI.

use std::io::{self, IsTerminal};

use binjar_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use binjar_cli::commands::{error_kind, run_build, run_inspect, run_verify};
use binjar_cli::logging::{LogConfig, LogFormat, init_logging};
use binjar_cli::summary::{print_build_summary, print_layout, print_verify_report};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Build(args) => run_build(args).map(|outcome| print_build_summary(&outcome)),
        Command::Verify(args) => run_verify(args).map(|report| print_verify_report(&args.file, &report)),
        Command::Inspect(args) => run_inspect(args).map(|layout| print_layout(&args.file, &layout)),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            let kind = error_kind(&error);
            eprintln!("error: {}: {error:#}", kind.label());
            i32::from(kind.exit_code())
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
