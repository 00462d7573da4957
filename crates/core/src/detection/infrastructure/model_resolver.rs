use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::CaptureError;
use crate::shared::constants::{APP_DIR_NAME, CASCADE_MODEL_NAME};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("configured model path {0} does not exist")]
    MissingConfigured(PathBuf),
    #[error("model {name} not found in any of: {}", display_paths(.searched))]
    NotFound { name: String, searched: Vec<PathBuf> },
}

impl From<ModelResolveError> for CaptureError {
    fn from(err: ModelResolveError) -> Self {
        CaptureError::ModelLoad(err.to_string())
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a model file by name.
///
/// Resolution order:
/// 1. `configured`, if set. It is authoritative: a missing file is an error
///    rather than a reason to keep looking.
/// 2. Each of `search_dirs`, in order.
pub fn resolve(
    name: &str,
    configured: Option<&Path>,
    search_dirs: &[PathBuf],
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(ModelResolveError::MissingConfigured(path.to_path_buf()));
    }

    let searched: Vec<PathBuf> = search_dirs.iter().map(|dir| dir.join(name)).collect();
    searched
        .iter()
        .find(|candidate| candidate.is_file())
        .cloned()
        .ok_or_else(|| ModelResolveError::NotFound {
            name: name.to_string(),
            searched,
        })
}

/// Locate the frontal-face cascade using [`default_search_dirs`].
pub fn resolve_cascade(configured: Option<&Path>) -> Result<PathBuf, ModelResolveError> {
    resolve(CASCADE_MODEL_NAME, configured, &default_search_dirs())
}

/// Default places to look for bundled models:
/// the executable's directory, the working directory, then the user
/// data directory (`<data_dir>/FaceCam/models`).
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }
    if let Some(data_dir) = model_data_dir() {
        dirs.push(data_dir);
    }
    dirs
}

/// Platform-specific model directory, e.g. `~/.local/share/FaceCam/models/`.
pub fn model_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join("models"))
}
