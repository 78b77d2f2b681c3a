use crate::models::ProjectStructure;
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),
}

/// Read a saved model response
pub fn read_response(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write one file below `root`, creating parent directories as needed
pub fn write_file(relative_path: &RelativePath, root: &Path, content: &str) -> Result<PathBuf, IoError> {
    let absolute_path = relative_path.to_path(root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)?;
    Ok(absolute_path)
}

/// Write every file of `structure` below `dest`.
///
/// Returns the written paths in file order. A later file with the same path
/// overwrites an earlier one, matching the tree view.
pub fn write_project(structure: &ProjectStructure, dest: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_destination(dest)?;
    fs::create_dir_all(dest).map_err(IoError::Io)?;

    let mut written = Vec::with_capacity(structure.files.len());
    for file in &structure.files {
        let path = write_file(&file.path, dest, &file.content)?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }
    log::info!(
        "Exported {} file(s) of {} to {}",
        written.len(),
        structure.name,
        dest.display()
    );
    Ok(written)
}

/// A destination must be an existing directory or not exist yet
pub fn validate_destination(path: &Path) -> Result<(), IoError> {
    if path.as_os_str().is_empty() {
        return Err(IoError::InvalidDestination("empty path".to_string()));
    }
    if path.exists() && !path.is_dir() {
        return Err(IoError::InvalidDestination(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
