//! Job discovery in the input directory.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DriverError, Result};

/// One job document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub path: PathBuf,
    /// File stem; AlphaFold3 names the result directory after the job too.
    pub name: String,
}

impl JobSpec {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// Find every regular file in `dir` with the given extension, sorted by path.
///
/// An empty result is an error: an empty batch is never a success.
pub fn discover_jobs(dir: &Path, extension: &str) -> Result<Vec<JobSpec>> {
    let unreadable = |source| DriverError::InputDirUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == extension) && path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(DriverError::NoJobs {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    paths.sort();
    debug!("Discovered {} job file(s) in {:?}", paths.len(), dir);
    Ok(paths.into_iter().map(JobSpec::from_path).collect())
}
