//! The ingestion pipeline: one serialized loop from settled file events
//! to store upserts and feed events.

use crate::error::Result;
use crate::reader::read_rows;
use crate::tracker::{FileStateTracker, ProcessDecision, Watermark};
use chrono::Utc;
use prospect_core::{
    BroadcastHub, FeedEvent, Partition, Record, RecordMeta, RecordStore, StatsSnapshot,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Result of one ingestion pass over a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Source file name.
    pub file: String,
    /// Partition the file routes to.
    pub partition: Partition,
    /// Net-new records from this pass.
    pub new_rows: usize,
    /// Total row count of the file.
    pub total_rows: usize,
    /// Whether this exact file version had already been consumed.
    pub skipped: bool,
}

/// Drives settled file events through reading, deduplication, and
/// broadcasting.
///
/// The pipeline owns the tracker and processes one event at a time, so
/// no two passes ever touch the same file concurrently. Failures are
/// local: a pass that errors leaves the file's watermark unchanged and
/// the next event retries from the same position.
pub struct IngestPipeline {
    dir: PathBuf,
    store: Arc<RecordStore>,
    hub: BroadcastHub,
    tracker: FileStateTracker,
}

impl IngestPipeline {
    /// Create a pipeline over an export directory.
    pub fn new(dir: impl Into<PathBuf>, store: Arc<RecordStore>, hub: BroadcastHub) -> Self {
        Self {
            dir: dir.into(),
            store,
            hub,
            tracker: FileStateTracker::new(),
        }
    }

    /// Process every `.csv` file currently in the directory, in name
    /// order. Used to rebuild the store on startup; per-file failures
    /// are logged and do not stop the scan.
    pub fn scan_all(&mut self) -> Result<usize> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut processed = 0;
        for path in &paths {
            match self.process_file(path) {
                Ok(_) => processed += 1,
                Err(e) => warn!(file = %path.display(), error = %e, "Skipping unreadable file"),
            }
        }
        Ok(processed)
    }

    /// Run one ingestion pass over a file: read rows beyond the
    /// watermark, upsert each, broadcast per-new-record events followed
    /// by a batch summary and refreshed stats, then commit the
    /// watermark.
    pub fn process_file(&mut self, path: &Path) -> Result<FileOutcome> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let partition = Partition::for_file_name(&file_name);

        let metadata = std::fs::metadata(path)?;
        let size = metadata.len();
        let mtime = metadata.modified()?;

        // Read optimistically from the stored cursor; the total row
        // count needed for the watermark decision is only known after
        // parsing.
        let cursor = self.tracker.consumed_rows(path);
        let batch = read_rows(path, cursor)?;
        let total_rows = batch.total_rows;

        let rows = match self.tracker.should_process(path, size, total_rows, mtime) {
            ProcessDecision::Skip => {
                debug!(file = %file_name, "File version already consumed");
                return Ok(FileOutcome {
                    file: file_name,
                    partition,
                    new_rows: 0,
                    total_rows,
                    skipped: true,
                });
            }
            ProcessDecision::FromRow(from) if from == cursor => batch.new_rows,
            ProcessDecision::FromRow(from) => {
                // Truncation or rewrite: the optimistic read started too
                // far in, so take a full pass.
                info!(file = %file_name, "Truncation or rewrite detected; reprocessing from start");
                read_rows(path, from)?.new_rows
            }
        };

        let mut new_rows = 0;
        for fields in rows {
            let record = Record::new(
                fields,
                RecordMeta {
                    source_file: file_name.clone(),
                    qualified: partition == Partition::Qualified,
                    ingested_at: Utc::now(),
                },
            );
            let outcome = self.store.upsert(partition, record.clone());
            if outcome.is_new {
                new_rows += 1;
                self.hub.publish(FeedEvent::RecordIngested { partition, record });
            }
        }

        self.hub.publish(FeedEvent::BatchSummary {
            file: file_name.clone(),
            new_rows,
            total_rows,
        });
        let stats = StatsSnapshot::compute(&self.store.snapshot(partition));
        self.hub.publish(FeedEvent::StatsRefreshed { partition, stats });

        // The watermark moves only after the rows are in the store; a
        // crash between apply and commit re-reads rows, which upserts
        // absorb idempotently.
        self.tracker.commit(
            path,
            Watermark {
                size,
                rows: total_rows,
                mtime,
            },
        );

        info!(
            file = %file_name,
            partition = partition.as_str(),
            new_rows,
            total_rows,
            "Ingested file"
        );

        Ok(FileOutcome {
            file: file_name,
            partition,
            new_rows,
            total_rows,
            skipped: false,
        })
    }

    /// Consume settled file events until the watcher side closes. Runs
    /// for the process lifetime under normal operation.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<PathBuf>) {
        while let Some(path) = rx.recv().await {
            if let Err(e) = self.process_file(&path) {
                warn!(
                    file = %path.display(),
                    error = %e,
                    "Ingestion pass failed; will retry on the next file event"
                );
            }
        }
        debug!("File event channel closed; ingestion loop exiting");
    }
}
