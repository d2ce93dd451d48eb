use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::hash_map::{self, HashMap};

use crate::domain::Entry;

/// Deep-link metadata published for one TMDB id on one platform.
///
/// Serialized with the camelCase names the index readers expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecord {
    pub deeplinks: Map<String, Value>,
    pub title: String,
    pub year: Option<i64>,
    pub platform_code: String,
    pub platform_country: String,
}

impl IndexRecord {
    /// Candidate record for an entry, with missing fields defaulted.
    /// Admission is decided separately by `validate_index_record`.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            deeplinks: entry.deeplinks.clone(),
            title: entry.title.clone().unwrap_or_default(),
            year: entry.year,
            platform_code: entry.platform_code.clone().unwrap_or_default(),
            platform_country: entry.platform_country.clone().unwrap_or_default(),
        }
    }
}

/// TMDB id -> record for a single partition.
///
/// Inserting an id that is already present replaces the earlier record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionIndex {
    records: HashMap<String, IndexRecord>,
}

impl PartitionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record that was replaced, if any.
    pub fn insert(&mut self, tmdb_id: impl Into<String>, record: IndexRecord) -> Option<IndexRecord> {
        self.records.insert(tmdb_id.into(), record)
    }

    pub fn get(&self, tmdb_id: &str) -> Option<&IndexRecord> {
        self.records.get(tmdb_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for PartitionIndex {
    type Item = (String, IndexRecord);
    type IntoIter = hash_map::IntoIter<String, IndexRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl FromIterator<(String, IndexRecord)> for PartitionIndex {
    fn from_iter<I: IntoIterator<Item = (String, IndexRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
