//! # Prospect Core
//!
//! Domain model and pure logic for the Prospect lead dashboard: the
//! deduplicating record store, statistics aggregation, the query engine,
//! CSV export, and the broadcast hub that fans live events out to
//! connected clients.
//!
//! Ingestion (file watching and incremental CSV reading) lives in
//! `prospect-ingest`; the HTTP surface lives in `prospect-web`. Both are
//! built on the types exported here.

mod error;
mod events;
mod export;
mod hub;
mod identity;
mod query;
mod record;
mod stats;
mod store;

pub use error::{Error, Result};
pub use events::FeedEvent;
pub use export::export_csv;
pub use hub::BroadcastHub;
pub use identity::identity_key;
pub use query::{query, filter_records, Filters, QueryPage, Sort, SortDirection};
pub use record::{Record, RecordMeta};
pub use stats::StatsSnapshot;
pub use store::{Partition, RecordStore, Upsert};
