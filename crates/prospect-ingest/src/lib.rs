//! # Prospect Ingestion
//!
//! Watches the producer's export directory and feeds new CSV rows into
//! the record store, incrementally and exactly once per file version:
//!
//! - [`ChangeWatcher`] turns raw file system notifications into stable,
//!   debounced per-file events.
//! - [`FileStateTracker`] remembers how far each file has been consumed
//!   and detects truncations and rewrites.
//! - [`read_rows`] parses a CSV file and returns only the rows beyond
//!   the tracked cursor.
//! - [`IngestPipeline`] ties the above together in a single serialized
//!   processing loop, upserting rows and publishing feed events.

mod error;
mod pipeline;
mod reader;
mod tracker;
mod watcher;

pub use error::{Error, Result};
pub use pipeline::{FileOutcome, IngestPipeline};
pub use reader::{read_rows, CsvBatch};
pub use tracker::{FileStateTracker, ProcessDecision, Watermark};
pub use watcher::ChangeWatcher;
