//! Environment checks that must pass before any job is launched.

use std::path::Path;
use tracing::{debug, info};

use crate::error::{DriverError, Result};

/// The model directory must exist and be listable.
pub fn check_model_dir(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|source| DriverError::ModelDirInaccessible {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(DriverError::ModelDirNotADirectory(path.to_path_buf()));
    }
    std::fs::read_dir(path).map_err(|source| DriverError::ModelDirInaccessible {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Model directory {:?} is readable", path);
    Ok(())
}

/// Create the output directory (and parents) if needed, then prove it is
/// writable by creating and removing a probe file inside it.
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        info!("Creating output directory {:?}", path);
        std::fs::create_dir_all(path).map_err(|source| DriverError::OutputDirCreate {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let probe = tempfile::Builder::new()
        .prefix(".foldrun-write-probe")
        .tempfile_in(path)
        .map_err(|source| DriverError::OutputDirNotWritable {
            path: path.to_path_buf(),
            source,
        })?;
    drop(probe);

    debug!("Output directory {:?} is writable", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_dir_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let err = check_model_dir(&root.path().join("af3_models")).unwrap_err();
        assert!(matches!(err, DriverError::ModelDirInaccessible { .. }));
    }

    #[test]
    fn test_model_dir_must_be_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("af3.bin.zst");
        std::fs::write(&file, b"weights").unwrap();
        assert!(matches!(
            check_model_dir(&file),
            Err(DriverError::ModelDirNotADirectory(_))
        ));
    }

    #[test]
    fn test_output_dir_is_created_with_parents() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("results").join("af3");
        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
        // probe file is cleaned up
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_output_path_under_a_file_fails_creation() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let err = prepare_output_dir(&blocker.join("out")).unwrap_err();
        assert!(matches!(err, DriverError::OutputDirCreate { .. }));
    }
}
