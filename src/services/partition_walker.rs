// src/services/partition_walker.rs
//
// Partition Walker
//
// Lists partitions under the source node in key order, one page at a time.
// Only keys are fetched; a partition's entries are read later by the
// aggregator. Read failures are returned to the caller and end the run.

use log::info;
use std::sync::Arc;

use super::pagination::KeyPager;
use crate::domain::{Cursor, Partition};
use crate::error::AppResult;
use crate::repositories::RemoteStore;

pub struct PartitionWalker {
    pager: KeyPager,
}

impl PartitionWalker {
    pub fn new(store: Arc<dyn RemoteStore>, source_path: &str, page_size: usize) -> Self {
        Self {
            pager: KeyPager::new(store, source_path, page_size),
        }
    }

    /// Skip every partition up to and including `key`.
    pub fn resume_after(mut self, key: Option<&str>) -> Self {
        if let Some(key) = key {
            info!("Resuming partition walk after {}", key);
            self.pager = self.pager.starting_after(Cursor::after(key));
        }
        self
    }

    pub fn stop_on_short_page(mut self, enabled: bool) -> Self {
        self.pager = self.pager.stop_on_short_page(enabled);
        self
    }

    /// Next page of partitions in ascending key order, `None` when done.
    pub async fn next_page(&mut self) -> AppResult<Option<Vec<Partition>>> {
        info!(
            "Fetching next partition page after {}...",
            self.pager.cursor()
        );

        let keys = match self.pager.next_keys().await? {
            Some(keys) => keys,
            None => {
                info!("No more partitions to process");
                return Ok(None);
            }
        };

        Ok(Some(keys.into_iter().map(Partition::from_key).collect()))
    }

    /// Last partition key handed out. Restarting with `resume_after` set to
    /// this key continues with the next unseen partition.
    pub fn cursor(&self) -> &Cursor {
        self.pager.cursor()
    }
}
