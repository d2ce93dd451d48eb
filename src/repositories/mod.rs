// src/repositories/mod.rs
//
// Store layer
//
// CRITICAL RULES:
// - Stores are DUMB key/value access
// - NO record extraction or validation
// - NO pagination policy (callers own cursors and page sizes)

pub mod memory_store;
pub mod remote_store;

pub use memory_store::{InMemoryStore, MergeCall};
pub use remote_store::{join_path, KeyedValue, RemoteStore};
