pub mod entity;
pub mod invariants;

pub use entity::{IndexRecord, PartitionIndex};
pub use invariants::validate_index_record;
