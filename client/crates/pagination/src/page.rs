//! Page envelope decoding.
//!
//! Collection endpoints answer with `{"items": [...]}` and convey the
//! continuation through response metadata. A [`Page`] pairs both halves.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Errors raised while decoding a page body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The body is not valid JSON, or not a JSON object.
    #[error("page body is not a JSON object: {message}")]
    Decode {
        /// Decoder diagnostic.
        message: String,
    },
    /// The body decoded but carries no `items` array.
    #[error("page body has no `items` array")]
    MissingItems,
}

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

/// One page of a cursor-paginated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    items: Vec<Value>,
    next: Option<Url>,
}

impl Page {
    /// Build a page from already-decoded parts.
    #[must_use]
    pub const fn new(items: Vec<Value>, next: Option<Url>) -> Self {
        Self { items, next }
    }

    /// Decode a response body into a page, attaching the continuation URL.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Decode`] when the body is not a JSON object and
    /// [`PageError::MissingItems`] when `items` is absent or `null`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pagination::Page;
    ///
    /// let page = Page::from_json_slice(br#"{"items":[{"id":"a"},{"id":"b"}]}"#, None)
    ///     .expect("valid page");
    /// assert_eq!(page.len(), 2);
    /// assert!(page.next().is_none());
    /// ```
    pub fn from_json_slice(body: &[u8], next: Option<Url>) -> Result<Self, PageError> {
        let envelope: PageEnvelope =
            serde_json::from_slice(body).map_err(|error| PageError::Decode {
                message: error.to_string(),
            })?;
        let items = envelope.items.ok_or(PageError::MissingItems)?;
        Ok(Self { items, next })
    }

    /// Items in server order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Continuation URL for the following page, if the server supplied one.
    #[must_use]
    pub const fn next(&self) -> Option<&Url> {
        self.next.as_ref()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Return whether the page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Split the page into its items and continuation URL.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Value>, Option<Url>) {
        (self.items, self.next)
    }
}
