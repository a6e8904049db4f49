//! Opaque cursor and page envelope primitives shared by Hireboard list queries.
//!
//! A list query hands back a [`Page`] whose `next_cursor` is an opaque,
//! URL-safe token. Callers pass the token back unchanged to resume after the
//! last item they saw; the token wraps whatever resume key the data source
//! needs (for document stores, the ordering value plus the document id).
//!
//! # Example
//!
//! ```
//! use pagination::{Cursor, Page};
//!
//! let page = Page::from_fetch(vec![1_u32, 2, 3], 3, |item| *item).expect("encode cursor");
//! let token = page.next_cursor().expect("full page carries a cursor");
//! let cursor: Cursor<u32> = Cursor::decode(token).expect("decode cursor");
//! assert_eq!(*cursor.key(), 3);
//! ```

mod cursor;
mod error;
mod page;

pub use cursor::Cursor;
pub use error::CursorError;
pub use page::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, PageRequest};
