//! Immutable load results and the store that swaps them.

use crate::config::SheetNames;
use crate::error::Result;
use crate::metrics::{MetricsBundle, MetricsOptions, compute_metrics, sales::available_years};
use crate::normalize::{NormalizationReport, NormalizedTables, normalize_workbook};
use crate::workbook::{RawWorkbook, SourceFingerprint, WorkbookCache, load_workbook};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// One successful load: normalized tables, their report, and where they came
/// from. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct Snapshot {
    fingerprint: Option<SourceFingerprint>,
    tables: NormalizedTables,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Normalizes an already-read workbook. `fingerprint` identifies the file
    /// it was read from, as recorded when it was read.
    ///
    /// # Errors
    ///
    /// Returns the normalizer's structural error.
    pub fn from_workbook(
        workbook: &RawWorkbook,
        fingerprint: Option<SourceFingerprint>,
        names: &SheetNames,
    ) -> Result<Self> {
        Ok(Self {
            fingerprint,
            tables: normalize_workbook(workbook, names)?,
            loaded_at: Utc::now(),
        })
    }

    /// Reads and normalizes the workbook at `path` without caching.
    ///
    /// # Errors
    ///
    /// Returns the loader's or the normalizer's error.
    pub fn load(path: &Path, names: &SheetNames) -> Result<Self> {
        let fingerprint = SourceFingerprint::of(path)?;
        Self::from_workbook(&load_workbook(path)?, Some(fingerprint), names)
    }

    pub fn fingerprint(&self) -> Option<&SourceFingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn tables(&self) -> &NormalizedTables {
        &self.tables
    }

    pub fn report(&self) -> &NormalizationReport {
        &self.tables.report
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn years(&self) -> Vec<i32> {
        available_years(&self.tables.sales)
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years().last().copied()
    }

    pub fn metrics(&self, year: i32, options: &MetricsOptions) -> MetricsBundle {
        compute_metrics(&self.tables, year, options)
    }
}

/// Holds the current snapshot. A reload is built completely before it
/// replaces the current one; a failed reload leaves it untouched.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    cache: WorkbookCache,
    current: Option<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    /// Loads `path` (through the workbook cache) and swaps in the result.
    ///
    /// # Errors
    ///
    /// Returns the loader's or the normalizer's error. The previous snapshot
    /// stays current.
    pub fn reload(&mut self, path: &Path, names: &SheetNames) -> Result<Arc<Snapshot>> {
        let built = self.cache.get_or_load(path).and_then(|workbook| {
            Snapshot::from_workbook(&workbook, self.cache.fingerprint().cloned(), names)
        });

        match built {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.current = Some(Arc::clone(&snapshot));
                info!(
                    path = %path.display(),
                    years = ?snapshot.report().sales_years,
                    "Swapped in new snapshot"
                );
                Ok(snapshot)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    kind = e.kind(),
                    kept_previous = self.current.is_some(),
                    "Reload failed: {e}"
                );
                Err(e)
            }
        }
    }

    /// Drops the cached workbook, then reloads.
    ///
    /// # Errors
    ///
    /// See [`Self::reload`].
    pub fn force_reload(&mut self, path: &Path, names: &SheetNames) -> Result<Arc<Snapshot>> {
        self.cache.invalidate();
        self.reload(path, names)
    }
}
