//! Query parameter builder that drops unset values.

use std::fmt::Display;

/// Ordered query pairs; optional values that are `None` are never added.
///
/// # Examples
///
/// ```rust
/// use spark_client::QueryParams;
///
/// let params = QueryParams::new()
///     .with("teamId", "team-1")
///     .with_optional("type", None::<&str>)
///     .with_optional("max", Some(50));
/// assert_eq!(
///     params.pairs(),
///     &[("teamId".to_owned(), "team-1".to_owned()), ("max".to_owned(), "50".to_owned())],
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append `key=value`.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.0.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append `key=value` only when `value` is set.
    #[must_use]
    pub fn with_optional<V: Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Pairs in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Return whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}
