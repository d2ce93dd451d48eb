// src/services/index_service.rs
//
// Index Service - Run Orchestration
//
// Walks every partition, aggregates its entries and writes its index,
// strictly one partition at a time.
//
// CRITICAL RULES:
// - One store call in flight at any moment
// - A partition's index is fully written before the next partition is read
// - Read failures (walker or aggregator) end the run with an error
// - Write failures are logged and recorded; the run moves on

use log::{info, warn};
use std::sync::Arc;

use super::entry_aggregator::EntryAggregator;
use super::index_types::{PartitionOutcome, RunReport};
use super::index_writer::IndexWriter;
use super::partition_walker::PartitionWalker;
use crate::config::IndexerConfig;
use crate::domain::Partition;
use crate::error::AppResult;
use crate::repositories::RemoteStore;

pub struct IndexService {
    store: Arc<dyn RemoteStore>,
    aggregator: EntryAggregator,
    writer: IndexWriter,
    config: IndexerConfig,
}

impl IndexService {
    pub fn new(store: Arc<dyn RemoteStore>, config: IndexerConfig) -> Self {
        let aggregator = EntryAggregator::new(
            store.clone(),
            config.source_path.clone(),
            config.content_key.clone(),
            config.entry_page_size,
        )
        .stop_on_short_page(config.stop_on_short_page);

        let writer = IndexWriter::new(
            store.clone(),
            config.index_path.clone(),
            config.chunk_threshold,
            config.chunk_size,
        );

        Self {
            store,
            aggregator,
            writer,
            config,
        }
    }

    /// Rebuild the index for every partition.
    pub async fn run(&self) -> AppResult<RunReport> {
        let mut report = RunReport::start();
        info!(
            "Starting TMDB index run {} (source: {}, target: {}{})",
            report.run_id,
            self.config.source_path,
            self.config.index_path,
            if self.config.dry_run { ", dry run" } else { "" }
        );

        let mut walker = PartitionWalker::new(
            self.store.clone(),
            &self.config.source_path,
            self.config.partition_page_size,
        )
        .stop_on_short_page(self.config.stop_on_short_page)
        .resume_after(self.config.resume_after.as_deref());

        while let Some(partitions) = walker.next_page().await? {
            for partition in &partitions {
                self.process_partition(partition, &mut report).await?;
            }
            info!("Partition page done; resume point is {}", walker.cursor());
        }

        report.finish(walker.cursor().clone());
        info!(
            "Index run {} finished: {} partitions, {} entries scanned, {} records written, {} failed",
            report.run_id,
            report.partitions.len(),
            report.entries_scanned(),
            report.records_written(),
            report.failed_partitions().len()
        );
        Ok(report)
    }

    /// Aggregate and write one partition. Only read errors are returned.
    async fn process_partition(&self, partition: &Partition, report: &mut RunReport) -> AppResult<()> {
        info!("Processing {}...", partition.name);

        let aggregated = self.aggregator.aggregate_with_stats(partition).await?;
        let records = aggregated.index.len();

        let outcome = if self.config.dry_run {
            info!("Dry run: {} would receive {} entries", partition.name, records);
            PartitionOutcome::Skipped { records }
        } else {
            match self.writer.write_index(&partition.name, aggregated.index).await {
                Ok(summary) if summary.chunks == 0 => PartitionOutcome::Empty,
                Ok(summary) => PartitionOutcome::Written {
                    records: summary.records,
                    chunks: summary.chunks,
                },
                Err(e) => {
                    warn!("Error updating {}: {}", partition.name, e);
                    PartitionOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };

        report.record(partition, aggregated.entries_scanned, outcome);
        Ok(())
    }
}
