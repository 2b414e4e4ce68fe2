//! Run configuration for one batch invocation.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// Extension of job documents picked up from the input directory.
pub const JOB_SPEC_EXTENSION: &str = "json";

/// Entry point shipped with AlphaFold3.
pub const DEFAULT_EXECUTABLE: &str = "run_alphafold.py";

/// How invocation outcomes turn into the batch verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Only the final invocation decides; an earlier failure followed by a
    /// later success still yields a successful batch.
    #[default]
    LastInvocation,
    /// Any failed invocation fails the batch. All jobs still run.
    AnyInvocation,
}

/// Immutable configuration for a single batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory holding the AlphaFold3 model parameters.
    pub model_dir: PathBuf,
    /// Directory results are written to; created if missing.
    pub output_dir: PathBuf,
    /// Directory scanned for job documents.
    pub input_dir: PathBuf,
    /// Prediction executable, a bare name looked up on PATH or a path.
    pub executable: PathBuf,
    /// Passed through to every invocation after the required arguments.
    pub extra_args: Vec<OsString>,
    pub failure_policy: FailurePolicy,
    /// Validate and discover jobs without invoking anything.
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(
        model_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        input_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model_dir: model_dir.into(),
            output_dir: output_dir.into(),
            input_dir: input_dir.into(),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            extra_args: Vec::new(),
            failure_policy: FailurePolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_last_invocation_semantics() {
        let config = RunConfig::new("/models", "/out", "/in");
        assert_eq!(config.failure_policy, FailurePolicy::LastInvocation);
        assert_eq!(config.executable, PathBuf::from("run_alphafold.py"));
        assert!(!config.dry_run);
        assert!(config.extra_args.is_empty());
    }

    #[test]
    fn test_failure_policy_parses_snake_case() {
        let policy: FailurePolicy = serde_json::from_str("\"any_invocation\"").unwrap();
        assert_eq!(policy, FailurePolicy::AnyInvocation);
    }
}
