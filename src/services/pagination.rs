// src/services/pagination.rs
//
// Ordered key pagination over one store node.
//
// Each request asks for the next `page_size` children strictly after the
// cursor, then moves the cursor to the last key returned. An empty page is
// the authoritative end of the scan. A short page also ends it when
// `stop_on_short_page` is set, which saves the final empty round trip.

use std::sync::Arc;

use crate::domain::Cursor;
use crate::error::{AppError, AppResult};
use crate::repositories::{KeyedValue, RemoteStore};

pub struct KeyPager {
    store: Arc<dyn RemoteStore>,
    path: String,
    page_size: usize,
    cursor: Cursor,
    stop_on_short_page: bool,
    exhausted: bool,
    pages_fetched: usize,
}

impl KeyPager {
    pub fn new(store: Arc<dyn RemoteStore>, path: impl Into<String>, page_size: usize) -> Self {
        Self {
            store,
            path: path.into(),
            page_size: page_size.max(1),
            cursor: Cursor::start(),
            stop_on_short_page: true,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Resume strictly after `cursor`.
    pub fn starting_after(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn stop_on_short_page(mut self, enabled: bool) -> Self {
        self.stop_on_short_page = enabled;
        self
    }

    /// Next page of children with their values, or `None` once exhausted.
    pub async fn next_page(&mut self) -> AppResult<Option<Vec<KeyedValue>>> {
        if self.exhausted {
            return Ok(None);
        }
        let page = self
            .store
            .range_query(&self.path, &self.cursor, self.page_size)
            .await?;
        self.accept(page, |(key, _)| key)
    }

    /// Next page of child keys only, or `None` once exhausted.
    pub async fn next_keys(&mut self) -> AppResult<Option<Vec<String>>> {
        if self.exhausted {
            return Ok(None);
        }
        let page = self
            .store
            .range_keys(&self.path, &self.cursor, self.page_size)
            .await?;
        self.accept(page, |key| key)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    fn accept<T>(&mut self, page: Vec<T>, key_of: fn(&T) -> &String) -> AppResult<Option<Vec<T>>> {
        let last_key = match page.last() {
            Some(last) => key_of(last).clone(),
            None => {
                self.exhausted = true;
                return Ok(None);
            }
        };

        // A store that ignores the lower bound would loop forever.
        if self.cursor.start_after() == Some(last_key.as_str()) {
            return Err(AppError::Other(format!(
                "Store did not advance past key {:?} under {}",
                last_key, self.path
            )));
        }

        self.cursor.advance(&last_key);
        self.pages_fetched += 1;

        if self.stop_on_short_page && page.len() < self.page_size {
            self.exhausted = true;
        }

        Ok(Some(page))
    }
}
