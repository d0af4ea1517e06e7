//! Lazy iterators over paginated collections.

use std::iter::FusedIterator;
use std::mem;

use reqwest::Url;
use serde_json::Value;

use super::{QueryParams, RestSession};
use crate::SparkError;

enum Cursor {
    Start {
        endpoint: String,
        params: Vec<(String, String)>,
    },
    Next(Url),
    Done,
}

/// Iterator over the pages of a collection.
///
/// The first request carries the caller's query parameters; every later
/// request follows the server's `rel="next"` URL verbatim. Iteration stops
/// after a page without a continuation, after an empty page, or after the
/// first error.
pub struct Pages<'s> {
    session: &'s RestSession,
    cursor: Cursor,
}

impl<'s> Pages<'s> {
    pub(crate) fn new(session: &'s RestSession, endpoint: &str, params: QueryParams) -> Self {
        Self {
            session,
            cursor: Cursor::Start {
                endpoint: endpoint.to_owned(),
                params: params.into_pairs(),
            },
        }
    }

    fn fetch(&self, cursor: Cursor) -> Option<Result<pagination::Page, SparkError>> {
        match cursor {
            Cursor::Done => None,
            Cursor::Start { endpoint, params } => Some(
                self.session
                    .absolute_url(&endpoint)
                    .and_then(|url| self.session.fetch_page(&url, &params)),
            ),
            Cursor::Next(url) => Some(self.session.fetch_page(&url, &[])),
        }
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<Vec<Value>, SparkError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = mem::replace(&mut self.cursor, Cursor::Done);
        match self.fetch(cursor)? {
            Err(error) => Some(Err(error)),
            Ok(page) if page.is_empty() => None,
            Ok(page) => {
                let (items, next) = page.into_parts();
                if let Some(url) = next {
                    self.cursor = Cursor::Next(url);
                }
                Some(Ok(items))
            }
        }
    }
}

impl FusedIterator for Pages<'_> {}

/// Iterator over the items of a collection, fetched page by page.
///
/// A page is requested only once the previous one has been consumed. An
/// error is yielded once and ends the iteration.
pub struct Items<'s> {
    pages: Pages<'s>,
    buffered: std::vec::IntoIter<Value>,
}

impl<'s> Items<'s> {
    pub(crate) fn new(pages: Pages<'s>) -> Self {
        Self {
            pages,
            buffered: Vec::new().into_iter(),
        }
    }
}

impl Iterator for Items<'_> {
    type Item = Result<Value, SparkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.next() {
                return Some(Ok(item));
            }
            match self.pages.next()? {
                Ok(items) => self.buffered = items.into_iter(),
                Err(error) => return Some(Err(error)),
            }
        }
    }
}

impl FusedIterator for Items<'_> {}
