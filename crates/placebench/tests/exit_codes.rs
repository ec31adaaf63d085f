//! Exit status and stderr of the compiled tools.

use std::process::{Command, Output};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

/// name of the "placement-benchmark" executable
const BENCHMARK: &str = env!("CARGO_BIN_EXE_placement-benchmark");
/// name of the "decluster-check" executable
const DECLUSTER: &str = env!("CARGO_BIN_EXE_decluster-check");

const SCENARIO: &[&str] = &[
    "-s", "6", "-d", "2", "-o", "200", "-r", "2", "-p", "ring", "-v", "4", "-b", "4", "-e", "3",
    "-t", "2",
];

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin).args(args).env_remove("RUST_LOG").output().unwrap()
}

fn with(base: &[&'static str], flag: &str, value: &'static str) -> Vec<&'static str> {
    let mut argv = base.to_vec();
    let at = argv.iter().position(|a| *a == flag).unwrap();
    argv[at + 1] = value;
    argv
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_benchmark_success() {
    let output = run(BENCHMARK, SCENARIO);
    assert_eq!(output.status.code(), Some(EXIT_SUCCESS), "{}", stderr(&output));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("# Placement algorithm: ring\n"));
    assert!(stdout.contains("total_obj_count:200\n"));
}

#[test]
fn test_out_of_range_value_exits_2_with_usage() {
    let output = run(BENCHMARK, &with(SCENARIO, "-s", "2"));
    assert_eq!(output.status.code(), Some(EXIT_USAGE));
    let err = stderr(&output);
    assert!(err.contains("-s:"), "{err}");
    assert!(err.contains("Usage:"), "{err}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_overflowing_block_size_exits_2() {
    let output = run(BENCHMARK, &with(SCENARIO, "-b", "18446744073709552"));
    assert_eq!(output.status.code(), Some(EXIT_USAGE));
    assert!(stderr(&output).contains("-b:"), "{}", stderr(&output));
}

#[test]
fn test_malformed_number_exits_2() {
    let output = run(BENCHMARK, &with(SCENARIO, "-o", "many"));
    assert_eq!(output.status.code(), Some(EXIT_USAGE));
    assert!(stderr(&output).contains("many"), "{}", stderr(&output));
}

#[test]
fn test_missing_flag_exits_2_with_usage() {
    let output = run(BENCHMARK, &SCENARIO[..SCENARIO.len() - 2]);
    assert_eq!(output.status.code(), Some(EXIT_USAGE));
    let err = stderr(&output);
    assert!(err.contains("-t"), "{err}");
    assert!(err.contains("Usage:"), "{err}");
}

#[test]
fn test_unknown_algorithm_exits_1() {
    let output = run(BENCHMARK, &with(SCENARIO, "-p", "rendezvous"));
    assert_eq!(output.status.code(), Some(EXIT_FAILURE));
    let err = stderr(&output);
    assert!(err.contains("Error:"), "{err}");
    assert!(err.contains("rendezvous"), "{err}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_config_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let path = path.to_str().unwrap();
    let mut argv: Vec<&str> = SCENARIO.to_vec();
    argv.extend(["-c", path]);
    let output = run(BENCHMARK, &argv);
    assert_eq!(output.status.code(), Some(EXIT_FAILURE));
    assert!(stderr(&output).contains("Error:"), "{}", stderr(&output));
}

const DECLUSTER_SCENARIO: &[&str] =
    &["-s", "6", "-o", "300", "-r", "2", "-p", "crush", "-v", "4", "-k", "1"];

#[test]
fn test_decluster_success_with_negative_seed() {
    let mut argv = DECLUSTER_SCENARIO.to_vec();
    argv.extend(["-z", "-1"]);
    let output = run(DECLUSTER, &argv);
    assert_eq!(output.status.code(), Some(EXIT_SUCCESS), "{}", stderr(&output));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("# Simulating failure of server 1 out of 6\n"));
    assert_eq!(stdout.lines().count(), 3 + 6);
}

#[test]
fn test_decluster_kill_out_of_range_exits_2() {
    let output = run(DECLUSTER, &with(DECLUSTER_SCENARIO, "-k", "6"));
    assert_eq!(output.status.code(), Some(EXIT_USAGE));
    let err = stderr(&output);
    assert!(err.contains("-k:"), "{err}");
    assert!(err.contains("Usage:"), "{err}");
}

#[test]
fn test_decluster_unknown_algorithm_exits_1() {
    let output = run(DECLUSTER, &with(DECLUSTER_SCENARIO, "-p", "maglev"));
    assert_eq!(output.status.code(), Some(EXIT_FAILURE));
    let err = stderr(&output);
    assert!(err.contains("Error:"), "{err}");
    assert!(err.contains("maglev"), "{err}");
}
