mod common;

use common::real_engine;
use std::path::PathBuf;
use tempfile::TempDir;
use time_block::commands::{execute_demo, run_workload, validate_args, validate_report_file, DemoArgs};

fn quick_args() -> DemoArgs {
    DemoArgs {
        iterations: 2,
        depth: 3,
        threads: 1,
        sleep_ms: 0,
        quiet: true,
        ..Default::default()
    }
}

#[test]
fn test_validate_args_valid() {
    assert!(validate_args(&DemoArgs::default()).is_ok());
}

#[test]
fn test_validate_args_zero_iterations() {
    let args = DemoArgs {
        iterations: 0,
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_too_deep() {
    let args = DemoArgs {
        depth: 10_000,
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_zero_threads() {
    let args = DemoArgs {
        threads: 0,
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_empty_output_path() {
    let args = DemoArgs {
        output_json: Some(PathBuf::new()),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_workload_records_nested_and_recursive_paths() {
    let tb = real_engine();
    run_workload(&tb, &quick_args()).unwrap();

    let stats = tb.get_stats();
    assert_eq!(stats.get_labels(&["demo"]).unwrap().count(), 2);
    assert_eq!(stats.get_labels(&["demo", "setup"]).unwrap().count(), 2);
    assert_eq!(
        stats
            .get_labels(&["demo", "recurse", "recurse", "recurse"])
            .unwrap()
            .count(),
        2
    );
    assert!(stats
        .get_labels(&["demo", "recurse", "recurse", "recurse", "recurse"])
        .is_none());
    assert_eq!(stats.get_labels(&["demo", "check(0)"]).unwrap().count(), 1);
    assert_eq!(stats.get_labels(&["demo", "check(1)"]).unwrap().count(), 1);
    assert_eq!(tb.depth(), 0);
}

#[test]
fn test_workload_on_worker_threads() {
    let tb = real_engine();
    let args = DemoArgs {
        threads: 4,
        ..quick_args()
    };

    run_workload(&tb, &args).unwrap();

    let stats = tb.get_stats();
    assert_eq!(stats.get_labels(&["demo"]).unwrap().count(), 8);
    assert_eq!(stats.get_labels(&["demo", "allocate"]).unwrap().count(), 8);
}

#[test]
fn test_execute_demo_writes_valid_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stats.json");
    let tb = real_engine();
    let args = DemoArgs {
        output_json: Some(path.clone()),
        ..quick_args()
    };

    let report = execute_demo(&tb, &args).unwrap();

    assert!(path.exists());
    assert_eq!(report.roots().count(), 1);
    assert!(validate_report_file(path).is_ok());
}
