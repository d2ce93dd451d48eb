// src/lib.rs
// TMDB Indexer - Rebuilds the per-platform TMDB deep-link index
//
// Architecture:
// - Domain: entries, index records and their admission rules
// - Store layer: a narrow key-ordered RemoteStore trait, nothing else
// - Services: partition walk, aggregation and chunked writeback
// - Sequential: one store call in flight, one partition in memory

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// BACKENDS
// ============================================================================

pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_index_record,
    Cursor,
    Entry,
    ExternalId,
    IndexRecord,
    Partition,
    PartitionIndex,
};

// ============================================================================
// PUBLIC API - Configuration & Errors
// ============================================================================

pub use config::IndexerConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Stores
// ============================================================================

pub use integrations::FirebaseRestStore;
pub use repositories::{InMemoryStore, KeyedValue, MergeCall, RemoteStore};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    EntryAggregator,
    IndexService,
    IndexWriter,
    KeyPager,
    PartitionOutcome,
    PartitionReport,
    PartitionWalker,
    RunReport,
    WriteSummary,
};
