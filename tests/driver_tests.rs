//! Tests for the `cflatc` command-line driver.

use std::{fs, path::PathBuf};

use cflat::driver::{run, Args, EXIT_FAILURE, EXIT_SUCCESS};
use clap::Parser;
use log::LevelFilter;
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

fn args(input: &PathBuf, extra: &[&str]) -> Args {
    let mut argv = vec!["cflatc".to_string(), input.display().to_string()];
    argv.extend(extra.iter().map(|arg| arg.to_string()));
    Args::parse_from(argv)
}

#[test]
fn test_writes_assembly_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "prog.cf", "int main() { cout << 1; }");

    assert_eq!(run(&args(&input, &[])), EXIT_SUCCESS);

    let assembly = fs::read_to_string(dir.path().join("prog.s")).unwrap();
    assert!(assembly.starts_with("\t.data\n"));
    assert!(assembly.contains("main:\n"));
}

#[test]
fn test_explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "prog.cf", "int main() { }");
    let output = dir.path().join("out.asm");

    assert_eq!(
        run(&args(&input, &["-o", output.to_str().unwrap()])),
        EXIT_SUCCESS
    );
    assert!(output.exists());
    assert!(!dir.path().join("prog.s").exists());
}

#[test]
fn test_semantic_errors_fail_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "bad.cf", "int main() { x = 1; }");

    assert_eq!(run(&args(&input, &[])), EXIT_FAILURE);
    assert!(!dir.path().join("bad.s").exists());
}

#[test]
fn test_syntax_errors_fail() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "bad.cf", "int main( { }");

    assert_eq!(run(&args(&input, &[])), EXIT_FAILURE);
}

#[test]
fn test_check_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, "prog.cf", "int main() { }");

    assert_eq!(run(&args(&input, &["--check", "--unparse"])), EXIT_SUCCESS);
    assert!(!dir.path().join("prog.s").exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.cf");

    assert_eq!(run(&args(&input, &[])), EXIT_FAILURE);
}

#[test]
fn test_verbosity_maps_to_log_level() {
    let input = PathBuf::from("prog.cf");

    assert_eq!(args(&input, &[]).log_level(), LevelFilter::Warn);
    assert_eq!(args(&input, &["-v"]).log_level(), LevelFilter::Info);
    assert_eq!(args(&input, &["-vv"]).log_level(), LevelFilter::Debug);
    assert_eq!(args(&input, &["-vvvv"]).log_level(), LevelFilter::Trace);
    assert_eq!(args(&input, &[]).output_path(), PathBuf::from("prog.s"));
}
