//! Saved cut-off between runs.
//!
//! The file is written to a sibling `.tmp` path and renamed into place, so
//! a crash mid-write leaves the previous selection intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stored as a raw integer so a hand-edited file with an unknown value is
/// detected on restore instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub cutoff: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl PersistedState {
    pub fn new(cutoff: i64) -> Self {
        Self {
            cutoff,
            saved_at: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed state file: {0}")]
    Serde(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load saved state. A missing file is not an error.
pub fn load(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(path)(err)),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Save `state`, stamping `saved_at` with the current time.
pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let stamped = PersistedState {
        saved_at: Some(Utc::now()),
        ..state.clone()
    };
    let contents = serde_json::to_string_pretty(&stamped)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents).map_err(io_error(&tmp))?;
    std::fs::rename(&tmp, path).map_err(io_error(path))?;
    tracing::debug!(path = %path.display(), cutoff = state.cutoff, "state saved");
    Ok(())
}
