use std::path::PathBuf;
use thiserror::Error;

use crate::runner::JobStatus;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Model directory {path:?} is not accessible: {source}")]
    ModelDirInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model directory {0:?} is not a directory")]
    ModelDirNotADirectory(PathBuf),

    #[error("Failed to create output directory {path:?}: {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output directory {path:?} is not writable: {source}")]
    OutputDirNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prediction executable '{0}' not found on PATH")]
    ExecutableNotFound(String),

    #[error("Failed to read input directory {path:?}: {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No *.{extension} job files found in {dir:?}")]
    NoJobs { dir: PathBuf, extension: String },

    #[error("Failed to launch prediction for job {job}: {source}")]
    Spawn {
        job: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Prediction failed for job {job} ({status})")]
    JobFailed { job: String, status: JobStatus },

    #[error("{failed} of {total} predictions failed")]
    JobsFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, DriverError>;
