// src/domain/cursor.rs
//
// Pagination cursor: the last key handed out by an ordered range scan.
// The next page starts strictly after it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    last_key: Option<String>,
}

impl Cursor {
    /// A cursor positioned before the first key.
    pub fn start() -> Self {
        Self::default()
    }

    /// A cursor positioned after `key`, used to resume an interrupted walk.
    pub fn after(key: impl Into<String>) -> Self {
        Self {
            last_key: Some(key.into()),
        }
    }

    /// Exclusive lower bound for the next range query.
    pub fn start_after(&self) -> Option<&str> {
        self.last_key.as_deref()
    }

    pub fn advance(&mut self, key: &str) {
        self.last_key = Some(key.to_string());
    }

    pub fn is_start(&self) -> bool {
        self.last_key.is_none()
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.last_key {
            Some(key) => write!(f, "{}", key),
            None => write!(f, "<start>"),
        }
    }
}
