//! Error taxonomy shared by every layer of the client.
//!
//! Transport, session and resource wrappers all surface [`SparkError`] so a
//! caller handles one type regardless of where a request failed.

use reqwest::StatusCode;
use serde::Deserialize;

/// Errors surfaced by the Spark client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SparkError {
    /// Invalid or missing construction input, or an invalid call argument.
    #[error("invalid spark client configuration: {message}")]
    Configuration {
        /// What was wrong with the input.
        message: String,
    },
    /// Network transport failed before a response was received.
    #[error("spark transport failed: {message}")]
    Transport {
        /// Transport diagnostic.
        message: String,
    },
    /// The request exceeded the session timeout.
    #[error("spark request timed out: {message}")]
    Timeout {
        /// Transport diagnostic.
        message: String,
    },
    /// HTTP 429 persisted past the rate-limit policy.
    #[error("spark rate limit persisted after {attempts} attempt(s)")]
    RateLimitExceeded {
        /// Number of consecutive 429 responses received.
        attempts: u32,
        /// Last `Retry-After` hint in seconds, when the server sent one.
        retry_after_secs: Option<u64>,
    },
    /// The API answered with a non-success status.
    #[error("spark api error [{status}]: {message}{}", tracking_suffix(.tracking_id))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or a preview of the raw body.
        message: String,
        /// Support correlation identifier from the error body.
        tracking_id: Option<String>,
    },
    /// A success response carried a body that could not be decoded.
    #[error("spark response could not be decoded: {message}")]
    MalformedResponse {
        /// Decoder diagnostic.
        message: String,
    },
}

impl SparkError {
    /// Build a [`SparkError::Configuration`].
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Build a [`SparkError::Transport`].
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a [`SparkError::Timeout`].
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Build a [`SparkError::MalformedResponse`].
    #[must_use]
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Build a [`SparkError::Api`] from a status and a raw error body.
    ///
    /// The body is expected to carry `message` and `trackingId`; when it is
    /// not JSON, a compacted preview of the raw text becomes the message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reqwest::StatusCode;
    /// use spark_client::SparkError;
    ///
    /// let error = SparkError::from_error_body(
    ///     StatusCode::NOT_FOUND,
    ///     br#"{"message":"Room not found","trackingId":"ROUTER_1234"}"#,
    /// );
    /// assert_eq!(error.tracking_id(), Some("ROUTER_1234"));
    /// assert_eq!(error.status(), Some(404));
    /// ```
    #[must_use]
    pub fn from_error_body(status: StatusCode, body: &[u8]) -> Self {
        let decoded = serde_json::from_slice::<ErrorBodyDto>(body).ok();
        let tracking_id = decoded.as_ref().and_then(|dto| dto.tracking_id.clone());
        let message = decoded
            .and_then(|dto| dto.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback_message(status, body));

        Self::Api {
            status: status.as_u16(),
            message,
            tracking_id,
        }
    }

    /// HTTP status for [`SparkError::Api`] (or 429 for rate-limit exhaustion).
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimitExceeded { .. } => Some(429),
            _ => None,
        }
    }

    /// Tracking identifier for [`SparkError::Api`], when present.
    #[must_use]
    pub fn tracking_id(&self) -> Option<&str> {
        match self {
            Self::Api { tracking_id, .. } => tracking_id.as_deref(),
            _ => None,
        }
    }

    /// Return whether the failure happened below HTTP (network or timeout).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBodyDto {
    message: Option<String>,
    tracking_id: Option<String>,
}

fn tracking_suffix(tracking_id: &Option<String>) -> String {
    tracking_id
        .as_deref()
        .map_or_else(String::new, |id| format!(" (tracking id: {id})"))
}

fn fallback_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| format!("status {}", status.as_u16()), str::to_owned)
    } else {
        preview
    }
}

/// Whitespace-compacted, length-limited preview of a raw response body.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
