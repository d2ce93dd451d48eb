// src/domain/partition.rs
//
// Partition
//
// One provider/country slice of the content store. The raw key carries a
// storage suffix; the logical name is what the index is written under.

use serde::{Deserialize, Serialize};

/// Suffix carried by every raw partition key in the content store.
pub const PARTITION_SUFFIX: &str = "_jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Raw key as stored under the source path (e.g. `amazon_jsonl`)
    pub key: String,

    /// Logical name with the suffix stripped (e.g. `amazon`)
    pub name: String,
}

impl Partition {
    /// Build a partition from its raw key.
    ///
    /// Keys without the suffix keep their name unchanged.
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let name = key
            .strip_suffix(PARTITION_SUFFIX)
            .unwrap_or(&key)
            .to_string();
        Self { key, name }
    }
}
