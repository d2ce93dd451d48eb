// src/repositories/remote_store.rs
//
// Remote store contract
//
// The indexer only needs two operations from the hierarchical store it reads
// and writes: an ordered range scan over the children of a node, and a merge
// of key/value pairs into a node.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::Cursor;
use crate::error::AppResult;

/// A child of a store node: its key and its raw value.
pub type KeyedValue = (String, Value);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Children of `path` ordered by key, strictly after the cursor's last
    /// key, at most `limit` of them. An empty result means no more keys.
    async fn range_query(
        &self,
        path: &str,
        after: &Cursor,
        limit: usize,
    ) -> AppResult<Vec<KeyedValue>>;

    /// Keys only, with the same ordering and bounds as `range_query`.
    ///
    /// Used where child values can be arbitrarily large (a partition holds
    /// its whole entry list). Backends that can list keys without
    /// downloading values should override this.
    async fn range_keys(
        &self,
        path: &str,
        after: &Cursor,
        limit: usize,
    ) -> AppResult<Vec<String>> {
        let children = self.range_query(path, after, limit).await?;
        Ok(children.into_iter().map(|(key, _)| key).collect())
    }

    /// Merge `values` into the node at `path`. Keys present in `values`
    /// are replaced; sibling keys are left untouched.
    async fn merge_update(&self, path: &str, values: Map<String, Value>) -> AppResult<()>;
}

/// Join store path segments with `/`, ignoring empty segments.
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(
            join_path(&["documents/Content/latest", "amazon_jsonl", "content"]),
            "documents/Content/latest/amazon_jsonl/content"
        );
        assert_eq!(join_path(&["/tmdb_index/", "amazon"]), "tmdb_index/amazon");
        assert_eq!(join_path(&[""]), "");
    }
}
