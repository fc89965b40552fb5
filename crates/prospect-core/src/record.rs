//! Business record model.
//!
//! Records come from producer CSV exports whose column set varies between
//! runs, so field values are kept as an ordered name/value list rather
//! than a fixed struct. Well-known fields (`business_name`, `phone`,
//! `rating`, ...) get typed accessors; everything else is carried through
//! untouched for display and export.

use crate::identity::identity_key;
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Ingestion metadata attached to every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMeta {
    /// Name of the CSV file the record came from.
    pub source_file: String,
    /// Whether the source file was a qualified-leads export.
    pub qualified: bool,
    /// When the record was ingested.
    pub ingested_at: DateTime<Utc>,
}

/// A single business record: CSV fields in source column order plus
/// ingestion metadata. Records are replaced, never mutated, when a newer
/// version with the same identity arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
    meta: RecordMeta,
}

impl Record {
    /// Create a record from its fields and ingestion metadata.
    pub fn new(fields: Vec<(String, String)>, meta: RecordMeta) -> Self {
        Self { fields, meta }
    }

    /// Ingestion metadata.
    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    /// Field names in source column order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Raw value of a field, if the column was present in the source.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed value of a field, `None` if absent or blank.
    pub fn get_nonempty(&self, name: &str) -> Option<&str> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Business name, from `business_name` falling back to `name`.
    pub fn name(&self) -> &str {
        self.get_nonempty("business_name")
            .or_else(|| self.get_nonempty("name"))
            .unwrap_or("")
    }

    /// Street address.
    pub fn address(&self) -> &str {
        self.get_nonempty("address").unwrap_or("")
    }

    /// Locality, from `area` falling back to `city`.
    pub fn locality(&self) -> &str {
        self.get_nonempty("area")
            .or_else(|| self.get_nonempty("city"))
            .unwrap_or("")
    }

    /// Canonical identity key for deduplication.
    pub fn identity_key(&self) -> String {
        identity_key(self.name(), self.address(), self.locality())
    }

    /// Numeric rating, `None` when missing or unparseable.
    pub fn rating(&self) -> Option<f64> {
        self.get_nonempty("rating")?.parse().ok()
    }

    /// Review count; missing or unparseable counts as zero.
    pub fn reviews_count(&self) -> f64 {
        self.get_nonempty("reviews_count")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    }

    /// Whether the record carries a non-blank phone number.
    pub fn has_phone(&self) -> bool {
        self.get_nonempty("phone").is_some()
    }

    /// Whether the record carries a non-blank email address.
    pub fn has_email(&self) -> bool {
        self.get_nonempty("email").is_some()
    }

    /// Whether the record carries a non-blank website.
    pub fn has_website(&self) -> bool {
        self.get_nonempty("website").is_some()
    }

    /// Whether at least one of phone, email, or website is missing.
    pub fn has_incomplete_contact(&self) -> bool {
        !(self.has_phone() && self.has_email() && self.has_website())
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("_meta", &self.meta)?;
        map.end()
    }
}
