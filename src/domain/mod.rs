// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod cursor;
pub mod entry;
pub mod index_record;
pub mod partition;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Source side
pub use entry::{Entry, ExternalId, TMDB_PROVIDER};
pub use partition::{Partition, PARTITION_SUFFIX};

// Output side
pub use index_record::{validate_index_record, IndexRecord, PartitionIndex};

// Pagination
pub use cursor::Cursor;

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of record invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
