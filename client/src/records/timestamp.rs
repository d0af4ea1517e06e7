//! Timestamp strings kept verbatim and parsed on demand.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SparkError;

/// RFC 3339 timestamp as sent by the API, e.g. `2015-10-18T14:26:16.000Z`.
///
/// The raw text is stored unchanged so a record re-encodes to exactly what
/// was received; [`Timestamp::to_datetime`] does the conversion.
///
/// # Examples
///
/// ```rust
/// use spark_client::records::Timestamp;
///
/// let created = Timestamp::new("2015-10-18T14:26:16.000Z");
/// let parsed = created.to_datetime().expect("valid timestamp");
/// assert_eq!(parsed.timestamp(), 1_445_178_376);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap raw timestamp text.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw text as received.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into a UTC date-time.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::MalformedResponse`] when the text is not a valid
    /// RFC 3339 timestamp.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, SparkError> {
        DateTime::parse_from_rfc3339(&self.0)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|error| {
                SparkError::malformed_response(format!("invalid timestamp '{}': {error}", self.0))
            })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
