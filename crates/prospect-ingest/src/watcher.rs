//! Directory change watching with write-settling debounce.
//!
//! The producer appends to its exports in bursts, so a file is only
//! reported once it has gone quiet for the debounce period; reading
//! mid-write would risk truncated rows. Create and modify notifications
//! for `.csv` files are forwarded as plain paths over a channel consumed
//! by the ingestion pipeline.

use crate::error::Result;
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Watches the export directory and emits one event per settled file
/// write. Dropping the watcher stops the underlying notification stream.
pub struct ChangeWatcher {
    // Held only to keep the OS watch alive.
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl ChangeWatcher {
    /// Start watching `dir` for `.csv` creation and modification.
    /// Events are debounced by `quiet_period` before delivery.
    pub fn spawn(
        dir: &Path,
        quiet_period: Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<PathBuf>)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(
            quiet_period,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    for event in events {
                        if !matches!(
                            event.event.kind,
                            EventKind::Create(_) | EventKind::Modify(_)
                        ) {
                            continue;
                        }
                        for path in &event.event.paths {
                            if !is_csv(path) {
                                continue;
                            }
                            debug!(file = %path.display(), "Settled file event");
                            if tx.send(path.clone()).is_err() {
                                // Pipeline gone; nothing left to notify.
                                return;
                            }
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        warn!(error = %error, "File watch error");
                    }
                }
            },
        )?;

        debouncer.watch(dir, RecursiveMode::NonRecursive)?;
        info!(dir = %dir.display(), "Watching for CSV exports");

        Ok((
            Self {
                _debouncer: debouncer,
            },
            rx,
        ))
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}
