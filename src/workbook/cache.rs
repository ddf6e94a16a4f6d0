//! Load-once cache for the raw workbook.
//!
//! Keyed by canonical path, modification time and size. A change to any of
//! them, or an explicit [`WorkbookCache::invalidate`], forces a re-read.

use super::{RawWorkbook, load_workbook};
use crate::error::{ComandaError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Identity of the workbook file at the time it was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceFingerprint {
    /// # Errors
    ///
    /// Returns [`ComandaError::UnreadableWorkbook`] if the file cannot be
    /// found or stat'ed.
    pub fn of(path: &Path) -> Result<Self> {
        let unreadable = |e: std::io::Error| ComandaError::UnreadableWorkbook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let canonical = std::fs::canonicalize(path).map_err(unreadable)?;
        let meta = std::fs::metadata(&canonical).map_err(unreadable)?;
        Ok(Self {
            path: canonical,
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug, Default)]
pub struct WorkbookCache {
    entry: Option<(SourceFingerprint, Arc<RawWorkbook>)>,
}

impl WorkbookCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached workbook if the file is unchanged, otherwise reads it.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; the previous entry is kept in that case.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<RawWorkbook>> {
        let fingerprint = SourceFingerprint::of(path)?;

        if let Some((cached, workbook)) = &self.entry
            && *cached == fingerprint
        {
            debug!(path = %fingerprint.path.display(), "Workbook cache hit");
            return Ok(Arc::clone(workbook));
        }

        let workbook = Arc::new(load_workbook(path)?);
        self.entry = Some((fingerprint, Arc::clone(&workbook)));
        Ok(workbook)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn fingerprint(&self) -> Option<&SourceFingerprint> {
        self.entry.as_ref().map(|(fp, _)| fp)
    }
}
