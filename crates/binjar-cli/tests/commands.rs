//! Command-level tests: argument parsing through to the written artifact.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use binjar_build::ErrorKind;
use binjar_cli::cli::{Cli, Command};
use binjar_cli::commands::{error_kind, run_build, run_inspect, run_verify};
use clap::Parser;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn write_jar(dir: &Path) -> PathBuf {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
    writer.write_all(b"Manifest-Version: 1.0\r\n\r\n").unwrap();
    writer.start_file("hello/core.clj", options).unwrap();
    writer.write_all(b"(ns hello.core)\n").unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let path = dir.join("hello-standalone.jar");
    fs::write(&path, bytes).unwrap();
    path
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("binjar").chain(args.iter().copied())).unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_build_command() {
    let work = tempfile::tempdir().unwrap();
    let jar = write_jar(work.path());
    let target = work.path().join("out");

    let cli = parse(&[
        "build",
        "--archive",
        path_arg(&jar),
        "--target-dir",
        path_arg(&target),
        "--main",
        "hello.core",
        "--program-version",
        "1.0",
        "--jvm-opt",
        "-Xmx1g",
        "--jvm-opt",
        "-Dapp.home=$HOME",
    ]);
    let Command::Build(args) = &cli.command else {
        panic!("expected build");
    };
    let outcome = run_build(args).unwrap();

    assert_eq!(outcome.artifact, target.join("hello-standalone-1.0"));
    let bytes = fs::read(&outcome.artifact).unwrap();
    let preamble = String::from_utf8_lossy(&bytes[..outcome.preamble_len]);
    assert!(preamble.starts_with(":;exec java -Xmx1g -Dapp.home=$HOME -jar \"$0\" \"$@\"\n"));
    assert!(preamble.contains("java -Xmx1g -Dapp.home=%HOME% -jar \"%~f0\" %*\r\n"));
}

#[test]
fn test_build_explicit_config() {
    let work = tempfile::tempdir().unwrap();
    let jar = write_jar(work.path());
    let config = work.path().join("release.toml");
    fs::write(
        &config,
        "entry_point = \"hello.core\"\nprogram_name = \"hello\"\nversion = \"0.1\"\n",
    )
    .unwrap();

    let cli = parse(&[
        "build",
        "--archive",
        path_arg(&jar),
        "--config",
        path_arg(&config),
        "--program-version",
        "0.2",
        "--skip-verify",
    ]);
    let Command::Build(args) = &cli.command else {
        panic!("expected build");
    };
    let outcome = run_build(args).unwrap();

    assert_eq!(outcome.artifact, work.path().join("hello-0.2"));
    assert_eq!(outcome.entries, None);
}

#[test]
fn test_build_without_entry_point_is_config_error() {
    let work = tempfile::tempdir().unwrap();
    let jar = write_jar(work.path());
    let target = work.path().join("out");
    let cli = parse(&[
        "build",
        "--archive",
        path_arg(&jar),
        "--target-dir",
        path_arg(&target),
    ]);
    let Command::Build(args) = &cli.command else {
        panic!("expected build");
    };

    let error = run_build(args).unwrap_err();
    assert_eq!(error_kind(&error), ErrorKind::Config);
    assert_eq!(error_kind(&error).exit_code(), 2);
    assert!(!target.exists());
}

#[test]
fn test_verify_and_inspect_commands() {
    let work = tempfile::tempdir().unwrap();
    let jar = write_jar(work.path());

    let cli = parse(&["verify", path_arg(&jar)]);
    let Command::Verify(args) = &cli.command else {
        panic!("expected verify");
    };
    let report = run_verify(args).unwrap();
    assert_eq!(report.entries, 2);
    assert_eq!(report.archive_start, 0);

    let cli = parse(&["inspect", path_arg(&jar)]);
    let Command::Inspect(args) = &cli.command else {
        panic!("expected inspect");
    };
    let layout = run_inspect(args).unwrap();
    let names: Vec<_> = layout.entries.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, ["META-INF/MANIFEST.MF", "hello/core.clj"]);
    assert_eq!(layout.entries[0].local_header_offset, 0);
}

#[test]
fn test_verify_naive_concatenation_is_offset_mismatch() {
    let work = tempfile::tempdir().unwrap();
    let jar = write_jar(work.path());
    let mut bytes = b"#!/bin/sh\nexec java -jar \"$0\"\n".to_vec();
    bytes.extend(fs::read(&jar).unwrap());
    let naive = work.path().join("naive");
    fs::write(&naive, bytes).unwrap();

    let cli = parse(&["verify", path_arg(&naive)]);
    let Command::Verify(args) = &cli.command else {
        panic!("expected verify");
    };
    let error = run_verify(args).unwrap_err();
    assert_eq!(error_kind(&error), ErrorKind::OffsetMismatch);
    assert_eq!(error_kind(&error).exit_code(), 5);
}

#[test]
fn test_verify_sentinel_index_offset_is_offset_mismatch() {
    let work = tempfile::tempdir().unwrap();
    let jar = write_jar(work.path());
    let mut bytes = fs::read(&jar).unwrap();
    let field = bytes.len() - 6;
    bytes[field..field + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    let tampered = work.path().join("tampered");
    fs::write(&tampered, bytes).unwrap();

    let cli = parse(&["verify", path_arg(&tampered)]);
    let Command::Verify(args) = &cli.command else {
        panic!("expected verify");
    };
    let error = run_verify(args).unwrap_err();
    assert_eq!(error_kind(&error).exit_code(), 5);
}

#[test]
fn test_verify_missing_file() {
    let work = tempfile::tempdir().unwrap();
    let missing = work.path().join("missing");
    let cli = parse(&["verify", path_arg(&missing)]);
    let Command::Verify(args) = &cli.command else {
        panic!("expected verify");
    };
    let error = run_verify(args).unwrap_err();
    assert_eq!(error_kind(&error), ErrorKind::MissingFile);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["verify", "app", "--log-format", "json", "-v"]);
    assert!(cli.verbosity.is_present());
    assert!(cli.log_level.is_none());
}
