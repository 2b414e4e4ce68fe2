//! Shared fixtures for driver integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use foldrun_driver::{DriverError, JobStatus, PredictionRunner, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Arguments of one recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub model_dir: PathBuf,
    pub output_dir: PathBuf,
    pub spec_path: PathBuf,
}

/// Stub runner that records every call and fails the jobs it is told to.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<Invocation>>,
    pub failing_jobs: HashSet<String>,
    pub unavailable: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(jobs: &[&str]) -> Self {
        Self {
            failing_jobs: jobs.iter().map(|j| j.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionRunner for RecordingRunner {
    async fn ensure_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(DriverError::ExecutableNotFound("run_alphafold.py".to_string()));
        }
        Ok(())
    }

    async fn run(&self, model_dir: &Path, output_dir: &Path, spec_path: &Path) -> Result<JobStatus> {
        self.calls.lock().unwrap().push(Invocation {
            model_dir: model_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            spec_path: spec_path.to_path_buf(),
        });
        let stem = spec_path.file_stem().unwrap().to_string_lossy().into_owned();
        if self.failing_jobs.contains(&stem) {
            Ok(JobStatus::Failed { code: Some(1) })
        } else {
            Ok(JobStatus::Succeeded)
        }
    }
}

/// A scratch tree with `models/`, `inputs/` and a not-yet-created `output/`.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("models")).unwrap();
        std::fs::write(root.path().join("models").join("af3.bin.zst"), b"weights").unwrap();
        std::fs::create_dir(root.path().join("inputs")).unwrap();
        Self { root }
    }

    pub fn model_dir(&self) -> PathBuf {
        self.root.path().join("models")
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.path().join("inputs")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.path().join("output")
    }

    pub fn add_job(&self, name: &str) -> PathBuf {
        let path = self.input_dir().join(format!("{}.json", name));
        let doc = serde_json::json!({
            "name": name,
            "modelSeeds": [1],
            "sequences": [{"protein": {"id": ["A"], "sequence": "MKTAYIAK"}}],
            "dialect": "alphafold3",
            "version": 3
        });
        std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
        path
    }

    pub fn config(&self) -> foldrun_driver::RunConfig {
        foldrun_driver::RunConfig::new(self.model_dir(), self.output_dir(), self.input_dir())
    }
}
