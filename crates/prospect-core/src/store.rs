//! Deduplicating record store.
//!
//! Two independent partitions hold the current-best record per business
//! identity: one for every scraped business, one for qualified leads.
//! A record present in both a general and a qualified export yields one
//! entry in each partition; the store never cross-deduplicates.
//!
//! The store is an explicitly constructed instance handed to the
//! ingestion pipeline and the web layer, guarded by per-partition
//! `RwLock`s. Reads take whole-partition snapshots so that concurrent
//! ingestion can never produce a torn view.

use crate::record::Record;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One of the two independent record collections, distinguished by the
/// source filename convention (`qualified` substring).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Every scraped business.
    General,
    /// Qualified leads only.
    Qualified,
}

impl Partition {
    /// Route a source file to its partition based on its name.
    pub fn for_file_name(file_name: &str) -> Self {
        if file_name.to_ascii_lowercase().contains("qualified") {
            Partition::Qualified
        } else {
            Partition::General
        }
    }

    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::General => "general",
            Partition::Qualified => "qualified",
        }
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upsert {
    /// The identity key the record was stored under.
    pub key: String,
    /// Whether the key was previously absent from the partition.
    pub is_new: bool,
}

#[derive(Default)]
struct PartitionData {
    records: HashMap<String, Record>,
    /// Identity keys in first-seen order; the query engine's stable
    /// tie-break order.
    order: Vec<String>,
    categories: BTreeSet<String>,
    areas: BTreeSet<String>,
}

impl PartitionData {
    fn upsert(&mut self, record: Record) -> Upsert {
        if let Some(category) = record.get_nonempty("category") {
            self.categories.insert(category.to_string());
        }
        let locality = record.locality();
        if !locality.is_empty() {
            self.areas.insert(locality.to_string());
        }

        let key = record.identity_key();
        let is_new = !self.records.contains_key(&key);
        if is_new {
            self.order.push(key.clone());
        }
        self.records.insert(key.clone(), record);
        Upsert { key, is_new }
    }

    fn snapshot(&self) -> Vec<Record> {
        self.order
            .iter()
            .filter_map(|key| self.records.get(key).cloned())
            .collect()
    }
}

/// Shared view of all ingested data, visible to every query and
/// broadcast path.
#[derive(Default)]
pub struct RecordStore {
    general: RwLock<PartitionData>,
    qualified: RwLock<PartitionData>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, partition: Partition) -> &RwLock<PartitionData> {
        match partition {
            Partition::General => &self.general,
            Partition::Qualified => &self.qualified,
        }
    }

    /// Insert or replace the record under its identity key. Reports
    /// whether the identity was previously unseen in this partition.
    pub fn upsert(&self, partition: Partition, record: Record) -> Upsert {
        self.partition(partition).write().upsert(record)
    }

    /// Current record for an identity key, if present.
    pub fn get(&self, partition: Partition, key: &str) -> Option<Record> {
        self.partition(partition).read().records.get(key).cloned()
    }

    /// All current records in first-seen order, cloned under the
    /// partition lock.
    pub fn snapshot(&self, partition: Partition) -> Vec<Record> {
        self.partition(partition).read().snapshot()
    }

    /// Number of distinct identities in the partition.
    pub fn len(&self, partition: Partition) -> usize {
        self.partition(partition).read().records.len()
    }

    /// Whether the partition holds no records.
    pub fn is_empty(&self, partition: Partition) -> bool {
        self.len(partition) == 0
    }

    /// Distinct categories observed so far, sorted.
    pub fn categories(&self, partition: Partition) -> Vec<String> {
        self.partition(partition)
            .read()
            .categories
            .iter()
            .cloned()
            .collect()
    }

    /// Distinct areas observed so far, sorted.
    pub fn areas(&self, partition: Partition) -> Vec<String> {
        self.partition(partition)
            .read()
            .areas
            .iter()
            .cloned()
            .collect()
    }

    /// Partition read endpoints serve by default: qualified leads when
    /// any exist, otherwise the general collection.
    pub fn default_partition(&self) -> Partition {
        if self.is_empty(Partition::Qualified) {
            Partition::General
        } else {
            Partition::Qualified
        }
    }
}
