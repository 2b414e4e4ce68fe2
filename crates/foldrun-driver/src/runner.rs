//! Invocation of the external prediction executable.

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{DriverError, Result};

/// Outcome of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum JobStatus {
    Succeeded,
    /// `code` is `None` when the process was killed by a signal.
    Failed { code: Option<i32> },
}

impl JobStatus {
    pub fn success(&self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }
}

impl From<std::process::ExitStatus> for JobStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            JobStatus::Succeeded
        } else {
            JobStatus::Failed { code: status.code() }
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Succeeded => write!(f, "exit status 0"),
            JobStatus::Failed { code: Some(code) } => write!(f, "exit status {}", code),
            JobStatus::Failed { code: None } => write!(f, "terminated by signal"),
        }
    }
}

/// The collaborator that actually performs a structure prediction.
#[async_trait]
pub trait PredictionRunner: Send + Sync {
    /// Check that the prediction program can be launched.
    async fn ensure_available(&self) -> Result<()>;

    /// Run one prediction to completion.
    async fn run(&self, model_dir: &Path, output_dir: &Path, spec_path: &Path) -> Result<JobStatus>;
}

/// Runs `run_alphafold.py` (or a compatible wrapper) as a child process.
pub struct Af3Runner {
    executable: PathBuf,
    extra_args: Vec<OsString>,
    resolved: OnceLock<PathBuf>,
}

impl Af3Runner {
    /// Create a new Af3Runner.
    pub fn new<P: AsRef<Path>>(executable: P) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            extra_args: Vec::new(),
            resolved: OnceLock::new(),
        }
    }

    pub fn with_extra_args(mut self, args: Vec<OsString>) -> Self {
        self.extra_args = args;
        self
    }

    /// Argument list for one job, in the `--flag=value` form absl expects.
    pub fn arguments(&self, model_dir: &Path, output_dir: &Path, spec_path: &Path) -> Vec<OsString> {
        let mut args = vec![
            flag("--model_dir=", model_dir.as_os_str()),
            flag("--output_dir=", output_dir.as_os_str()),
            flag("--json_path=", spec_path.as_os_str()),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn program(&self) -> &Path {
        self.resolved.get().map(PathBuf::as_path).unwrap_or(&self.executable)
    }
}

fn flag(name: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(name);
    arg.push(value);
    arg
}

#[async_trait]
impl PredictionRunner for Af3Runner {
    async fn ensure_available(&self) -> Result<()> {
        let path_var = std::env::var_os("PATH");
        let resolved = resolve_executable(&self.executable, path_var.as_deref())
            .ok_or_else(|| DriverError::ExecutableNotFound(self.executable.display().to_string()))?;
        debug!("Prediction executable resolved to {:?}", resolved);
        let _ = self.resolved.set(resolved);
        Ok(())
    }

    async fn run(&self, model_dir: &Path, output_dir: &Path, spec_path: &Path) -> Result<JobStatus> {
        let job = spec_path.display().to_string();
        info!("Launching {:?} for {}", self.program(), job);

        let status = Command::new(self.program())
            .args(self.arguments(model_dir, output_dir, spec_path))
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| DriverError::Spawn { job, source })?;

        Ok(status.into())
    }
}

/// Look up `program` the way a shell would.
///
/// A name with a directory component is checked as-is; a bare name is
/// searched for in each entry of `path_var`.
pub fn resolve_executable(program: &Path, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable_file(program).then(|| program.to_path_buf());
    }
    let path_var = path_var?;
    std::env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable_file(candidate))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
