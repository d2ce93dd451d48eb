// src/services/entry_aggregator.rs
//
// Entry Aggregator
//
// Reads one partition's entry list page by page and folds every admissible
// TMDB id into a partition-local index.
//
// RULES:
// - Entries without an external-id list are skipped
// - Only `tmdb` ids with a non-empty value count
// - A record is admitted only with deeplinks AND a title
// - Same id twice in a partition: the later entry wins
// - Each page is dropped before the next one is fetched
// - Read failures are returned to the caller (they end the run)

use log::{debug, info};
use std::sync::Arc;

use super::index_types::AggregatedPartition;
use super::pagination::KeyPager;
use crate::domain::{validate_index_record, Entry, IndexRecord, Partition, PartitionIndex};
use crate::error::AppResult;
use crate::repositories::{join_path, KeyedValue, RemoteStore};

pub struct EntryAggregator {
    store: Arc<dyn RemoteStore>,
    source_path: String,
    content_key: String,
    page_size: usize,
    stop_on_short_page: bool,
}

impl EntryAggregator {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        source_path: impl Into<String>,
        content_key: impl Into<String>,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            source_path: source_path.into(),
            content_key: content_key.into(),
            page_size,
            stop_on_short_page: true,
        }
    }

    pub fn stop_on_short_page(mut self, enabled: bool) -> Self {
        self.stop_on_short_page = enabled;
        self
    }

    /// Store path of a partition's entry list.
    pub fn content_path(&self, partition: &Partition) -> String {
        join_path(&[&self.source_path, &partition.key, &self.content_key])
    }

    /// Build the complete index for one partition.
    pub async fn aggregate(&self, partition: &Partition) -> AppResult<PartitionIndex> {
        Ok(self.aggregate_with_stats(partition).await?.index)
    }

    /// Same as `aggregate`, also reporting how much was scanned.
    pub async fn aggregate_with_stats(&self, partition: &Partition) -> AppResult<AggregatedPartition> {
        let mut pager = KeyPager::new(
            self.store.clone(),
            self.content_path(partition),
            self.page_size,
        )
        .stop_on_short_page(self.stop_on_short_page);

        let mut index = PartitionIndex::new();
        let mut entries_scanned = 0;

        while let Some(page) = pager.next_page().await? {
            entries_scanned += page.len();
            info!(
                "Processing chunk of {} entries for {} (total: {})",
                page.len(),
                partition.key,
                entries_scanned
            );
            fold_page(&mut index, page);
        }

        debug!(
            "No more content for {} after {} pages",
            partition.key,
            pager.pages_fetched()
        );

        Ok(AggregatedPartition {
            index,
            entries_scanned,
            pages: pager.pages_fetched(),
        })
    }
}

/// Fold one page of raw entries into `index`. Consumes the page so its
/// buffer is released as soon as folding ends.
///
/// Returns how many records were admitted (replacements included).
pub fn fold_page(index: &mut PartitionIndex, page: Vec<KeyedValue>) -> usize {
    let mut admitted = 0;

    for (_, value) in page {
        let entry = match Entry::from_value(value) {
            Some(entry) if entry.external_ids.is_some() => entry,
            _ => continue,
        };

        for tmdb_id in entry.tmdb_ids() {
            let record = IndexRecord::from_entry(&entry);
            if validate_index_record(&record).is_ok() {
                index.insert(tmdb_id, record);
                admitted += 1;
            }
        }
    }

    admitted
}
