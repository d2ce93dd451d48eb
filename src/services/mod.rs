// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod entry_aggregator;
pub mod index_service;
pub mod index_types;
pub mod index_writer;
pub mod pagination;
pub mod partition_walker;

#[cfg(test)]
mod index_service_tests;

// Re-export all services and their types
pub use entry_aggregator::{fold_page, EntryAggregator};

pub use index_service::IndexService;

pub use index_types::{
    AggregatedPartition,
    PartitionOutcome,
    PartitionReport,
    RunReport,
    WriteSummary,
};

pub use index_writer::IndexWriter;

pub use pagination::KeyPager;

pub use partition_walker::PartitionWalker;
