//! Cursor pagination primitives for link-relation driven REST collections.
//!
//! Servers that paginate with `Link: <url>; rel="next"` headers never expose a
//! total count or an offset. This crate owns the two pure pieces of that
//! protocol:
//!
//! - [`link`] parses `Link` header values into typed link entries and picks
//!   out the `next` relation;
//! - [`page`] decodes a response body into a [`Page`] envelope holding the
//!   ordered `items` array and the continuation URL.
//!
//! Neither module performs I/O, so both are testable without a network.

pub mod link;
pub mod page;

pub use link::{LinkValue, next_link, parse_link_header};
pub use page::{Page, PageError};
pub use url::Url;
