// src/services/index_types.rs
//
// Index Run Types
//
// Results handed between the aggregator, the writer and the run loop, and
// the report returned for a whole run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Cursor, Partition, PartitionIndex};

// ============================================================================
// AGGREGATION
// ============================================================================

/// A partition's finished index plus scan counters.
#[derive(Debug, Clone, Default)]
pub struct AggregatedPartition {
    pub index: PartitionIndex,
    pub entries_scanned: usize,
    pub pages: usize,
}

// ============================================================================
// WRITEBACK
// ============================================================================

/// What a successful `write_index` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    pub records: usize,
    /// Merge calls issued; 0 for an empty index
    pub chunks: usize,
}

// ============================================================================
// RUN REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PartitionOutcome {
    /// Index written in `chunks` merge calls
    Written { records: usize, chunks: usize },
    /// Nothing admissible; no write issued
    Empty,
    /// Dry run: index built, not written
    Skipped { records: usize },
    /// Writeback failed; earlier chunks may have landed
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionReport {
    pub key: String,
    pub name: String,
    pub entries_scanned: usize,
    pub outcome: PartitionOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub partitions: Vec<PartitionReport>,
    /// Last partition key visited; resume point for a follow-up run
    pub cursor: Cursor,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            partitions: Vec::new(),
            cursor: Cursor::start(),
        }
    }

    pub fn record(&mut self, partition: &Partition, entries_scanned: usize, outcome: PartitionOutcome) {
        self.partitions.push(PartitionReport {
            key: partition.key.clone(),
            name: partition.name.clone(),
            entries_scanned,
            outcome,
        });
    }

    pub fn finish(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.finished_at = Some(Utc::now());
    }

    pub fn entries_scanned(&self) -> usize {
        self.partitions.iter().map(|p| p.entries_scanned).sum()
    }

    pub fn records_written(&self) -> usize {
        self.partitions
            .iter()
            .map(|p| match p.outcome {
                PartitionOutcome::Written { records, .. } => records,
                _ => 0,
            })
            .sum()
    }

    pub fn failed_partitions(&self) -> Vec<&PartitionReport> {
        self.partitions
            .iter()
            .filter(|p| matches!(p.outcome, PartitionOutcome::Failed { .. }))
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_partitions().is_empty()
    }

    pub fn outcome_for(&self, name: &str) -> Option<&PartitionOutcome> {
        self.partitions
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.outcome)
    }
}
