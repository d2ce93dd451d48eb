// src/repositories/memory_store.rs
//
// In-memory RemoteStore
//
// Holds the whole tree as one JSON value. Object keys are kept sorted, which
// gives the same key order the remote store uses for range scans.
//
// Every merge is recorded so callers can inspect how a write was split, and
// reads or writes under chosen paths can be made to fail.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard};

use super::remote_store::{join_path, KeyedValue, RemoteStore};
use crate::domain::Cursor;
use crate::error::{AppError, AppResult};

/// One recorded `merge_update` call.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeCall {
    pub path: String,
    pub values: Map<String, Value>,
}

#[derive(Default)]
struct StoreState {
    root: Value,
    merges: Vec<MergeCall>,
    range_queries: usize,
    failing_reads: Vec<String>,
    failing_writes: Vec<String>,
    max_page_len: Option<usize>,
}

pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_root(Value::Object(Map::new()))
    }

    /// Create a store pre-populated with `root` as its whole tree.
    pub fn with_root(root: Value) -> Self {
        Self {
            state: Mutex::new(StoreState {
                root,
                ..Default::default()
            }),
        }
    }

    /// Value stored at `path`, if any.
    pub fn get(&self, path: &str) -> Option<Value> {
        let state = self.lock().ok()?;
        node_at(&state.root, path).cloned()
    }

    /// All merge calls issued so far, in order.
    pub fn merges(&self) -> Vec<MergeCall> {
        self.lock().map(|s| s.merges.clone()).unwrap_or_default()
    }

    pub fn range_query_count(&self) -> usize {
        self.lock().map(|s| s.range_queries).unwrap_or_default()
    }

    /// Make every range query at or below `path` fail.
    pub fn fail_reads_under(&self, path: &str) {
        if let Ok(mut state) = self.lock() {
            state.failing_reads.push(join_path(&[path]));
        }
    }

    /// Make every merge that writes at or below `path` fail, including a
    /// merge at a parent node whose values replace that child.
    pub fn fail_writes_under(&self, path: &str) {
        if let Ok(mut state) = self.lock() {
            state.failing_writes.push(join_path(&[path]));
        }
    }

    /// Cap every range query result at `len` items regardless of the
    /// requested limit, the way a store with a response size cap would.
    pub fn cap_page_len(&self, len: usize) {
        if let Ok(mut state) = self.lock() {
            state.max_page_len = Some(len);
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Other("In-memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn range_query(
        &self,
        path: &str,
        after: &Cursor,
        limit: usize,
    ) -> AppResult<Vec<KeyedValue>> {
        let mut state = self.lock()?;
        let path = join_path(&[path]);
        state.range_queries += 1;

        if is_under_any(&path, &state.failing_reads) {
            return Err(AppError::Transport(format!("injected read failure at {}", path)));
        }

        let limit = match state.max_page_len {
            Some(cap) => limit.min(cap),
            None => limit,
        };

        let children = match node_at(&state.root, &path) {
            Some(Value::Object(children)) => children,
            _ => return Ok(Vec::new()),
        };

        Ok(children
            .iter()
            .filter(|(key, _)| after.start_after().map_or(true, |last| key.as_str() > last))
            .take(limit)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn merge_update(&self, path: &str, values: Map<String, Value>) -> AppResult<()> {
        let mut state = self.lock()?;
        let path = join_path(&[path]);

        let touches_failing = is_under_any(&path, &state.failing_writes)
            || values
                .keys()
                .any(|key| is_under_any(&join_path(&[&path, key]), &state.failing_writes));
        if touches_failing {
            return Err(AppError::Transport(format!("injected write failure at {}", path)));
        }

        state.merges.push(MergeCall {
            path: path.clone(),
            values: values.clone(),
        });

        let node = node_at_mut(&mut state.root, &path);
        let target = ensure_object(node);
        for (key, value) in values {
            if value.is_null() {
                target.remove(&key);
            } else {
                target.insert(key, value);
            }
        }

        Ok(())
    }
}

// ============================================================================
// TREE HELPERS
// ============================================================================

fn is_under_any(path: &str, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .any(|prefix| path == prefix || path.starts_with(&format!("{}/", prefix)))
}

fn node_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |node, segment| node.get(segment))
}

/// Walks to `path`, creating intermediate objects as needed.
fn node_at_mut<'a>(root: &'a mut Value, path: &str) -> &'a mut Value {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root, |node, segment| {
            ensure_object(node)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()))
        })
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}
