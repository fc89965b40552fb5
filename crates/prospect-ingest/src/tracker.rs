//! Per-file consumption watermarks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Last-consumed position for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark {
    /// File size in bytes at commit time.
    pub size: u64,
    /// Row count consumed.
    pub rows: usize,
    /// Modification time at commit time.
    pub mtime: SystemTime,
}

/// What to do with a file version relative to its watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessDecision {
    /// This exact version was already fully consumed.
    Skip,
    /// Process rows starting at this index. Zero means a full pass:
    /// either a new file or a truncation/rewrite reset.
    FromRow(usize),
}

/// Tracks how far each file has been consumed so a file version is
/// processed at most once and appends are read incrementally.
///
/// `commit` must only be called after the corresponding rows have been
/// applied to the store; on crash the watermark stays behind and the
/// next pass re-reads from the old position, which is safe because
/// upserts are idempotent per identity.
#[derive(Debug, Default)]
pub struct FileStateTracker {
    watermarks: HashMap<PathBuf, Watermark>,
}

impl FileStateTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows already consumed for a file, zero if untracked. Used as the
    /// optimistic read cursor before the current row count is known.
    pub fn consumed_rows(&self, path: &Path) -> usize {
        self.watermarks.get(path).map(|w| w.rows).unwrap_or(0)
    }

    /// Decide how to treat the observed file version.
    ///
    /// Unchanged size, rows, and mtime mean the version was already
    /// consumed. A row or size count below the watermark signals a
    /// truncation or rewrite and forces a full reprocess from row zero.
    /// Anything else is incremental from the stored row count.
    pub fn should_process(
        &self,
        path: &Path,
        current_size: u64,
        current_rows: usize,
        current_mtime: SystemTime,
    ) -> ProcessDecision {
        match self.watermarks.get(path) {
            None => ProcessDecision::FromRow(0),
            Some(w) => {
                if w.size == current_size && w.rows == current_rows && w.mtime == current_mtime {
                    ProcessDecision::Skip
                } else if current_rows < w.rows || current_size < w.size {
                    ProcessDecision::FromRow(0)
                } else {
                    ProcessDecision::FromRow(w.rows)
                }
            }
        }
    }

    /// Record that the file has been consumed up to this watermark.
    pub fn commit(&mut self, path: &Path, watermark: Watermark) {
        self.watermarks.insert(path.to_path_buf(), watermark);
    }

    /// Drop the watermark for a file, e.g. after deletion.
    pub fn forget(&mut self, path: &Path) {
        self.watermarks.remove(path);
    }
}
