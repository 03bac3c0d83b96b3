//!
//! Attempt Log File Loader
//!
//! Reads an attempt log exported as a JSON array of [`Attempt`] records and serves it through
//! the [`AttemptStore`] contract. The file is checked before it is read: it must exist, be a
//! regular file and stay under [`MAX_JSON_SIZE`]. Every record is checked with
//! [`Attempt::validate`] on load, so a malformed log fails fast instead of skewing statistics.
//!
//! Sessions are keyed by `student_id`; a student with no records yields an empty log.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::error::GraderError;
use crate::traits::store::AttemptStore;
use crate::types::Attempt;

/// Maximum allowed size for attempt log files.
pub const MAX_JSON_SIZE: u64 = 2 * 1024 * 1024; // 2MB

/// Checks that a file exists, is a file, and (optionally) does not exceed a maximum size.
///
/// # Errors
///
/// Returns [`GraderError::Io`] if the file is missing, not a file, unreadable, or too large.
fn check_file(path: &Path, max_size: Option<u64>) -> Result<(), GraderError> {
    if !path.exists() {
        error!("File not found: {}", path.display());
        return Err(GraderError::Io("File not found".to_string()));
    }

    if !path.is_file() {
        error!("Not a file: {}", path.display());
        return Err(GraderError::Io("Invalid file type".to_string()));
    }

    let metadata = fs::metadata(path).map_err(|e| {
        error!("File unreadable: {} - {}", path.display(), e);
        GraderError::Io("File unreadable".to_string())
    })?;

    if let Some(max) = max_size {
        if metadata.len() > max {
            error!(
                "File too large: {} ({} bytes, max {} bytes)",
                path.display(),
                metadata.len(),
                max
            );
            return Err(GraderError::Io("File too large".to_string()));
        }
    }

    Ok(())
}

/// Reads and validates every attempt in a log file, in file order.
pub fn load_attempts(path: &Path) -> Result<Vec<Attempt>, GraderError> {
    check_file(path, Some(MAX_JSON_SIZE))?;

    let bytes = fs::read(path).map_err(|e| {
        error!("Failed to read attempt log {}: {}", path.display(), e);
        GraderError::Io("Failed to read attempt log".to_string())
    })?;

    let attempts: Vec<Attempt> = serde_json::from_slice(&bytes).map_err(|e| {
        error!("Invalid attempt log {}: {}", path.display(), e);
        GraderError::InvalidJson(format!("attempt log: {e}"))
    })?;

    for attempt in &attempts {
        attempt.validate()?;
    }

    debug!(path = %path.display(), attempts = attempts.len(), "attempt log loaded");
    Ok(attempts)
}

/// An [`AttemptStore`] backed by a JSON file shared by all students.
///
/// The file is re-read on every call, so the store always reflects the current log.
#[derive(Debug, Clone)]
pub struct JsonFileAttemptStore {
    path: PathBuf,
}

impl JsonFileAttemptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttemptStore for JsonFileAttemptStore {
    fn attempts(&self, session_id: &str) -> Result<Vec<Attempt>, GraderError> {
        let attempts = load_attempts(&self.path)?;
        Ok(attempts
            .into_iter()
            .filter(|a| a.student_id == session_id)
            .collect())
    }
}
