//! Page envelopes and page requests.

use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::CursorError;

/// Page size used when callers do not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 20;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Request for a single page of results.
///
/// ## Invariants
/// - `limit` is always within `1..=MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    limit: usize,
    cursor: Option<String>,
}

impl PageRequest {
    /// Request the first page with the given size, clamped into range.
    ///
    /// # Examples
    /// ```
    /// use pagination::{MAX_PAGE_LIMIT, PageRequest};
    ///
    /// assert_eq!(PageRequest::new(0).limit(), 1);
    /// assert_eq!(PageRequest::new(10_000).limit(), MAX_PAGE_LIMIT);
    /// ```
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            cursor: None,
        }
    }

    /// Resume after the item identified by `cursor`.
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Maximum number of items to return.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Opaque cursor supplied by the caller, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

/// A page of results plus the cursor for the following page.
///
/// `next_cursor` is `None` once the source is exhausted: a fetch that returns
/// fewer items than the requested limit is the final page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Build a page from parts.
    pub const fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Build a page from a fetch of at most `limit` items.
    ///
    /// A full page carries a cursor built from the last item's resume key; a
    /// short page is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Serialize`] when the resume key cannot be
    /// encoded.
    pub fn from_fetch<K, F>(items: Vec<T>, limit: usize, key_of: F) -> Result<Self, CursorError>
    where
        K: Serialize,
        F: Fn(&T) -> K,
    {
        let next_cursor = match items.last() {
            Some(last) if limit > 0 && items.len() >= limit => {
                Some(Cursor::new(key_of(last)).encode()?)
            }
            _ => None,
        };
        Ok(Self { items, next_cursor })
    }

    /// Items in this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Cursor for the following page, if the source may hold more items.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Whether a following page may exist.
    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Number of items in the page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items while keeping the cursor.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
