// src/integrations/firebase/client.rs
//
// Firebase Realtime Database REST adapter
//
// ARCHITECTURE:
// - Implements RemoteStore over the RTDB REST API
// - Range scans: GET {db}/{path}.json?orderBy="$key"&startAt=..&limitToFirst=..
// - Merges: PATCH {db}/{path}.json
// - Maps HTTP failures to AppError (auth vs other status vs transport)
//
// The REST `startAt` bound is inclusive. To get a strict "after this key"
// bound the adapter asks for one extra child and drops the cursor key when
// the store echoes it back.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::time::Duration;

use crate::config::IndexerConfig;
use crate::domain::Cursor;
use crate::error::{AppError, AppResult};
use crate::repositories::{KeyedValue, RemoteStore};

/// Longest slice of an error body kept in `AppError::Store`.
const ERROR_BODY_LIMIT: usize = 200;

/// RTDB REST client
pub struct FirebaseRestStore {
    base_url: String,
    http_client: Client,
    auth_token: Option<String>,
}

impl FirebaseRestStore {
    /// Create a client for the database at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            auth_token: None,
        })
    }

    /// Attach a database secret or ID token, sent as the `auth` parameter
    pub fn with_auth(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn from_config(config: &IndexerConfig) -> AppResult<Self> {
        let store = Self::new(
            config.database_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(match &config.auth_token {
            Some(token) => store.with_auth(token.clone()),
            None => store,
        })
    }

    // ========================================================================
    // INTERNAL: Request building
    // ========================================================================

    fn node_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn range_params(&self, start_after: Option<&str>, limit: usize) -> AppResult<Vec<(&'static str, String)>> {
        let mut params = vec![("orderBy", "\"$key\"".to_string())];

        match start_after {
            Some(key) => {
                params.push(("startAt", serde_json::to_string(key)?));
                params.push(("limitToFirst", (limit + 1).to_string()));
            }
            None => params.push(("limitToFirst", limit.to_string())),
        }

        params.extend(self.auth_param());
        Ok(params)
    }

    fn auth_param(&self) -> Option<(&'static str, String)> {
        self.auth_token.as_ref().map(|token| ("auth", token.clone()))
    }

    /// Map a non-success response to the matching error kind
    async fn check_status(path: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Auth {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Store {
            path: path.to_string(),
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        })
    }
}

#[async_trait]
impl RemoteStore for FirebaseRestStore {
    async fn range_query(
        &self,
        path: &str,
        after: &Cursor,
        limit: usize,
    ) -> AppResult<Vec<KeyedValue>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let params = self.range_params(after.start_after(), limit)?;
        debug!("GET {} after {} limit {}", path, after, limit);

        let response = self
            .http_client
            .get(self.node_url(path))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Range query on {} failed: {}", path, e)))?;

        let body: Value = Self::check_status(path, response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read {} response: {}", path, e)))?;

        Ok(children_after(body, after.start_after(), limit))
    }

    /// `shallow=true` lists child keys without their subtrees but cannot be
    /// combined with ordering or limits, so the window is cut client side.
    /// Fine for the partition level, which has few children.
    async fn range_keys(
        &self,
        path: &str,
        after: &Cursor,
        limit: usize,
    ) -> AppResult<Vec<String>> {
        debug!("GET {} (shallow) after {} limit {}", path, after, limit);

        let mut params = vec![("shallow", "true".to_string())];
        params.extend(self.auth_param());

        let response = self
            .http_client
            .get(self.node_url(path))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Key listing on {} failed: {}", path, e)))?;

        let body: Value = Self::check_status(path, response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read {} response: {}", path, e)))?;

        Ok(children_after(body, after.start_after(), limit)
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    async fn merge_update(&self, path: &str, values: Map<String, Value>) -> AppResult<()> {
        debug!("PATCH {} with {} keys", path, values.len());

        let mut request = self.http_client.patch(self.node_url(path)).json(&values);
        if let Some(param) = self.auth_param() {
            request = request.query(&[param]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Merge into {} failed: {}", path, e)))?;

        Self::check_status(path, response).await?;
        Ok(())
    }
}

// ============================================================================
// RESPONSE DECODING
// ============================================================================

/// Turn a range-query body into ordered children strictly after the cursor.
///
/// Filtered responses come back as a JSON object with no meaningful order,
/// or as an array when every key is a small integer.
fn children_after(body: Value, start_after: Option<&str>, limit: usize) -> Vec<KeyedValue> {
    let mut children: Vec<KeyedValue> = match body {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        _ => Vec::new(),
    };

    children.sort_by(|(a, _), (b, _)| key_order(a, b));

    if let Some(after) = start_after {
        children.retain(|(key, _)| key_order(key, after) == Ordering::Greater);
    }

    children.truncate(limit);
    children
}

/// RTDB key order: keys that parse as 32-bit integers first, numerically,
/// then every other key lexicographically.
fn key_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<i32>(), b.parse::<i32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(children: &[KeyedValue]) -> Vec<&str> {
        children.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_client_creation() {
        let store =
            FirebaseRestStore::new("https://db.example.com/", Duration::from_secs(30)).unwrap();
        assert_eq!(store.base_url, "https://db.example.com");
        assert!(store.auth_token.is_none());
        assert_eq!(
            store.node_url("/tmdb_index/amazon"),
            "https://db.example.com/tmdb_index/amazon.json"
        );
    }

    #[test]
    fn test_range_params_request_one_extra_after_cursor() {
        let store = FirebaseRestStore::new("https://db", Duration::from_secs(1))
            .unwrap()
            .with_auth("secret");

        let params = store.range_params(Some("amazon_jsonl"), 3).unwrap();
        assert!(params.contains(&("orderBy", "\"$key\"".to_string())));
        assert!(params.contains(&("startAt", "\"amazon_jsonl\"".to_string())));
        assert!(params.contains(&("limitToFirst", "4".to_string())));
        assert!(params.contains(&("auth", "secret".to_string())));

        let params = store.range_params(None, 3).unwrap();
        assert!(params.contains(&("limitToFirst", "3".to_string())));
        assert!(!params.iter().any(|(name, _)| *name == "startAt"));
    }

    #[test]
    fn test_children_after_drops_echoed_cursor() {
        let body = json!({"b": 2, "a": 1, "c": 3});
        let children = children_after(body, Some("a"), 2);
        assert_eq!(keys(&children), vec!["b", "c"]);
    }

    #[test]
    fn test_children_after_keeps_prefixed_keys() {
        let body = json!({"a": 1, "aa": 2, "ab": 3});
        let children = children_after(body, Some("a"), 5);
        assert_eq!(keys(&children), vec!["aa", "ab"]);
    }

    #[test]
    fn test_array_body_uses_indices_as_keys() {
        let body = json!([null, {"Title": "x"}, {"Title": "y"}]);
        let children = children_after(body, None, 10);
        assert_eq!(keys(&children), vec!["1", "2"]);
    }

    #[test]
    fn test_null_body_is_empty() {
        assert!(children_after(Value::Null, None, 10).is_empty());
    }

    #[test]
    fn test_integer_keys_sort_numerically_before_strings() {
        let body = json!({"10": 1, "9": 2, "a": 3, "-1": 4});
        let children = children_after(body, None, 10);
        assert_eq!(keys(&children), vec!["-1", "9", "10", "a"]);

        let body = json!({"9": 1, "10": 2, "11": 3});
        let children = children_after(body, Some("9"), 10);
        assert_eq!(keys(&children), vec!["10", "11"]);
    }

    // Note: live round trips against a database belong in an environment
    // with credentials and are not part of the unit suite.
}
