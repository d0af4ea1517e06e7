//! Reqwest-backed blocking transport.
//!
//! This adapter owns transport details only: query and body encoding, the
//! per-request timeout, and mapping connection failures into [`SparkError`].

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::HeaderValue;

use super::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
use crate::SparkError;

const DEFAULT_USER_AGENT: &str = concat!("spark-client/", env!("CARGO_PKG_VERSION"));

/// Transport that performs blocking requests through one pooled client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests fail after `timeout`.
    /// ```rust,no_run
    /// use std::time::Duration;
    /// use spark_client::transport::ReqwestTransport;
    ///
    /// let transport = ReqwestTransport::new(Duration::from_secs(60));
    /// assert!(transport.is_ok());
    /// ```
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when the reqwest client cannot be
    /// constructed (for example when no TLS backend is available).
    pub fn new(timeout: Duration) -> Result<Self, SparkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(HeaderValue::from_static(DEFAULT_USER_AGENT))
            .build()
            .map_err(|error| {
                SparkError::configuration(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self { client })
    }

    /// Wrap an already-configured blocking client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SparkError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().map_err(map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(map_transport_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> SparkError {
    if error.is_timeout() {
        SparkError::timeout(error.to_string())
    } else {
        SparkError::transport(error.to_string())
    }
}
