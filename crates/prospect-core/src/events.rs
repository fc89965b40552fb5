//! Live feed events pushed to connected dashboard clients.

use crate::record::Record;
use crate::stats::StatsSnapshot;
use crate::store::Partition;
use serde::Serialize;

/// Events published on the broadcast hub as ingestion progresses.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// A previously unseen business was ingested. Emitted once per
    /// net-new row, in row order within a file.
    RecordIngested {
        /// Partition the record landed in.
        partition: Partition,
        /// The ingested record.
        record: Record,
    },

    /// A file finished processing.
    BatchSummary {
        /// Source file name.
        file: String,
        /// Net-new records from this pass.
        new_rows: usize,
        /// Total row count of the file.
        total_rows: usize,
    },

    /// Aggregate statistics changed.
    StatsRefreshed {
        /// Partition the statistics describe.
        partition: Partition,
        /// The refreshed statistics.
        stats: StatsSnapshot,
    },
}
