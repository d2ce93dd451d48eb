// src/services/index_writer.rs
//
// Chunked Writer
//
// Persists a finished partition index under `<index_path>/<partition name>`.
//
// - Empty index: nothing is written
// - Up to `chunk_threshold` records: the partition child of `index_path` is
//   replaced by the new index in one merge, dropping ids from earlier runs
// - Above it: merges of `chunk_size` records each into the partition node,
//   issued one after another; ids not in the new index are left in place
//
// Chunks never clobber each other's keys. A failing chunk stops the write and
// is returned; chunks that already landed stay in place.

use log::info;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::index_types::WriteSummary;
use crate::domain::PartitionIndex;
use crate::error::AppResult;
use crate::repositories::{join_path, RemoteStore};

pub struct IndexWriter {
    store: Arc<dyn RemoteStore>,
    index_path: String,
    chunk_threshold: usize,
    chunk_size: usize,
}

impl IndexWriter {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        index_path: impl Into<String>,
        chunk_threshold: usize,
        chunk_size: usize,
    ) -> Self {
        Self {
            store,
            index_path: index_path.into(),
            chunk_threshold,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn target_path(&self, partition_name: &str) -> String {
        join_path(&[&self.index_path, partition_name])
    }

    pub async fn write_index(&self, partition_name: &str, index: PartitionIndex) -> AppResult<WriteSummary> {
        let records = index.len();
        if records == 0 {
            info!("No valid data to update in {}", partition_name);
            return Ok(WriteSummary { records, chunks: 0 });
        }

        if records <= self.chunk_threshold {
            let mut replacement = Map::with_capacity(1);
            replacement.insert(partition_name.to_string(), Value::Object(to_payload(index)?));
            self.store.merge_update(&self.index_path, replacement).await?;
            info!("Index updated for {} with {} entries", partition_name, records);
            return Ok(WriteSummary { records, chunks: 1 });
        }

        let path = self.target_path(partition_name);

        let total_chunks = records.div_ceil(self.chunk_size);
        info!(
            "Index for {} is large ({} entries), updating in {} chunks...",
            partition_name, records, total_chunks
        );

        let mut remaining = index.into_iter();
        for chunk_number in 1..=total_chunks {
            let mut chunk = Map::with_capacity(self.chunk_size);
            for (tmdb_id, record) in remaining.by_ref().take(self.chunk_size) {
                chunk.insert(tmdb_id, serde_json::to_value(record)?);
            }

            info!(
                "Updating chunk {}/{} for {}",
                chunk_number, total_chunks, partition_name
            );
            self.store.merge_update(&path, chunk).await?;
        }

        info!("Index updated for {} with {} entries", partition_name, records);
        Ok(WriteSummary {
            records,
            chunks: total_chunks,
        })
    }
}

fn to_payload(index: PartitionIndex) -> AppResult<Map<String, Value>> {
    index
        .into_iter()
        .map(|(tmdb_id, record)| Ok((tmdb_id, serde_json::to_value(record)?)))
        .collect()
}
