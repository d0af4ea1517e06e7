//! Single-request HTTP port.
//!
//! A transport sends exactly one request and hands back the raw response. It
//! owns no retry, auth, or status interpretation; those live in the session.

mod reqwest_transport;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;

use crate::SparkError;

pub use reqwest_transport::ReqwestTransport;

/// Body attached to an outgoing request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
}

/// One fully-resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Headers sent verbatim.
    pub headers: HeaderMap,
    /// Query pairs appended to `url`.
    pub query: Vec<(String, String)>,
    /// Request payload.
    pub body: RequestBody,
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status line code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Undecoded body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Response with a status and body and no headers.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Port for sending one HTTP request.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return whatever status the server answered with.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Transport`] or [`SparkError::Timeout`] when no
    /// response was received. Non-success statuses are not errors here.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SparkError>;
}
