//! End-to-end run through the real process runner with a shell stub
//! standing in for `run_alphafold.py`.

#![cfg(unix)]

mod common;

use common::Workspace;
use foldrun_driver::{Af3Runner, BatchDriver, DriverError};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write a stub that appends its arguments to `calls.log` and exits with `code`.
fn write_stub(dir: &Path, code: i32) -> PathBuf {
    let log = dir.join("calls.log");
    let stub = dir.join("fake_alphafold.sh");
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> '{}'\nexit {}\n",
        log.display(),
        code
    );
    std::fs::write(&stub, script).unwrap();
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();
    stub
}

fn logged_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_two_jobs_with_succeeding_stub() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let ws = Workspace::new();
    let job_a = ws.add_job("jobA");
    let job_b = ws.add_job("jobB");
    let stub = write_stub(ws.root.path(), 0);

    let config = ws.config().with_executable(&stub);
    let runner = Af3Runner::new(&config.executable);
    let driver = BatchDriver::new(config, runner);

    let report = driver.run().await.unwrap();

    assert!(ws.output_dir().is_dir());
    assert_eq!(report.outcomes.len(), 2);

    let calls = logged_calls(ws.root.path());
    assert_eq!(calls.len(), 2);
    for job in [&job_a, &job_b] {
        let expected = format!(
            "--model_dir={} --output_dir={} --json_path={}",
            ws.model_dir().display(),
            ws.output_dir().display(),
            job.display()
        );
        assert!(calls.contains(&expected), "missing call {:?} in {:?}", expected, calls);
    }
}

#[tokio::test]
async fn test_failing_stub_fails_the_batch() {
    let ws = Workspace::new();
    ws.add_job("jobA");
    let stub = write_stub(ws.root.path(), 2);

    let config = ws.config().with_executable(&stub);
    let driver = BatchDriver::new(config, Af3Runner::new(&stub));

    let err = driver.run().await.unwrap_err();
    assert!(matches!(err, DriverError::JobFailed { .. }));
    assert_eq!(logged_calls(ws.root.path()).len(), 1);
}

#[tokio::test]
async fn test_missing_executable_is_reported_before_running() {
    let ws = Workspace::new();
    ws.add_job("jobA");
    let missing = ws.root.path().join("bin").join("run_alphafold.py");

    let driver = BatchDriver::new(ws.config(), Af3Runner::new(&missing));
    let err = driver.run().await.unwrap_err();
    assert!(matches!(err, DriverError::ExecutableNotFound(_)));
}
