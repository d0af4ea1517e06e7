//! Authenticated REST session.
//!
//! The session owns the API root, credentials and transport. Every verb runs
//! through one retry loop: send, wait and resend on 429 as the rate-limit
//! policy allows, and map any other non-success status to
//! [`SparkError::Api`]. Collection endpoints are exposed as lazy iterators
//! that follow `Link: rel="next"` continuations (see [`Pages`] and [`Items`]).

mod list;
mod params;
mod runtime;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, LINK};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SessionSettings;
use crate::rate_limit::{RateLimitPolicy, retry_after};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};
use crate::SparkError;
use pagination::Page;

pub use list::{Items, Pages};
pub use params::QueryParams;
pub use runtime::{SessionRuntime, Sleeper, ThreadSleeper};

/// Blocking REST session shared by every resource wrapper.
pub struct RestSession {
    settings: SessionSettings,
    auth_headers: HeaderMap,
    transport: Arc<dyn HttpTransport>,
    policy: RateLimitPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestSession")
            .field("base_url", &self.settings.base_url().as_str())
            .field("timeout", &self.settings.timeout())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RestSession {
    /// Build a session over a reqwest transport with default retry runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when the HTTP client cannot be
    /// constructed or the token cannot be encoded as a header.
    pub fn new(settings: SessionSettings) -> Result<Self, SparkError> {
        let transport = ReqwestTransport::new(settings.timeout())?;
        Self::with_runtime(settings, Arc::new(transport), SessionRuntime::default())
    }

    /// Build a session with an injected transport and retry runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when the token cannot be encoded
    /// as a header value.
    pub fn with_runtime(
        settings: SessionSettings,
        transport: Arc<dyn HttpTransport>,
        runtime: SessionRuntime,
    ) -> Result<Self, SparkError> {
        let auth_headers = build_auth_headers(&settings)?;
        Ok(Self {
            settings,
            auth_headers,
            transport,
            policy: runtime.policy,
            sleeper: runtime.sleeper,
        })
    }

    /// Bearer token sent with every authenticated request.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.settings.credentials().expose()
    }

    /// API root that endpoint suffixes are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.settings.base_url()
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    /// Resolve an endpoint suffix (or an absolute URL) against the API root.
    ///
    /// # Errors
    ///
    /// Returns [`SparkError::Configuration`] when the result is not a valid
    /// URL.
    pub fn absolute_url(&self, endpoint: &str) -> Result<Url, SparkError> {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            return Err(SparkError::configuration("endpoint must not be empty"));
        }
        self.base_url().join(trimmed).map_err(|error| {
            SparkError::configuration(format!("invalid endpoint '{trimmed}': {error}"))
        })
    }

    /// `GET` a single JSON document.
    ///
    /// # Errors
    ///
    /// Propagates transport, rate-limit, API and decode failures.
    pub fn get(&self, endpoint: &str, params: &QueryParams) -> Result<Value, SparkError> {
        let url = self.absolute_url(endpoint)?;
        let response = self.execute(Method::GET, url, params.pairs(), RequestBody::Empty, true)?;
        decode_json(&response)
    }

    /// `POST` a JSON body and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Propagates encode, transport, rate-limit, API and decode failures.
    pub fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value, SparkError> {
        let url = self.absolute_url(endpoint)?;
        let payload = encode_body(body)?;
        let response = self.execute(Method::POST, url, &[], RequestBody::Json(payload), true)?;
        decode_json(&response)
    }

    /// `PUT` a JSON body and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Propagates encode, transport, rate-limit, API and decode failures.
    pub fn put_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value, SparkError> {
        let url = self.absolute_url(endpoint)?;
        let payload = encode_body(body)?;
        let response = self.execute(Method::PUT, url, &[], RequestBody::Json(payload), true)?;
        decode_json(&response)
    }

    /// `DELETE` a resource; the server must answer `204 No Content`.
    ///
    /// # Errors
    ///
    /// Propagates transport, rate-limit and API failures. Any success status
    /// other than 204 is reported as [`SparkError::Api`].
    pub fn delete(&self, endpoint: &str) -> Result<(), SparkError> {
        let url = self.absolute_url(endpoint)?;
        let response = self.execute(Method::DELETE, url, &[], RequestBody::Empty, true)?;
        if response.status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        Err(SparkError::Api {
            status: response.status.as_u16(),
            message: format!(
                "expected 204 No Content for DELETE, received {}",
                response.status
            ),
            tracking_id: None,
        })
    }

    /// `POST` form fields without credentials and decode the JSON answer.
    ///
    /// Used by the OAuth token exchange, which authenticates with client
    /// secrets in the body rather than a bearer token.
    ///
    /// # Errors
    ///
    /// Propagates transport, rate-limit, API and decode failures.
    pub fn post_form(
        &self,
        endpoint: &str,
        fields: Vec<(String, String)>,
    ) -> Result<Value, SparkError> {
        let url = self.absolute_url(endpoint)?;
        let response = self.execute(Method::POST, url, &[], RequestBody::Form(fields), false)?;
        decode_json(&response)
    }

    /// Lazily iterate every item of a paginated collection.
    ///
    /// No request is sent until the first item is pulled. Each call starts
    /// again from the first page.
    #[must_use]
    pub fn request_list(&self, endpoint: &str, params: QueryParams) -> Items<'_> {
        Items::new(self.request_pages(endpoint, params))
    }

    /// Lazily iterate the pages of a paginated collection.
    #[must_use]
    pub fn request_pages(&self, endpoint: &str, params: QueryParams) -> Pages<'_> {
        Pages::new(self, endpoint, params)
    }

    /// Fetch one page and attach its `rel="next"` continuation.
    pub(crate) fn fetch_page(
        &self,
        url: &Url,
        query: &[(String, String)],
    ) -> Result<Page, SparkError> {
        let response = self.execute(Method::GET, url.clone(), query, RequestBody::Empty, true)?;
        let next = response
            .headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| pagination::next_link(value, url));
        let page = Page::from_json_slice(&response.body, next).map_err(|error| {
            SparkError::malformed_response(format!("page from {url}: {error}"))
        })?;
        debug!(
            url = %url,
            items = page.len(),
            has_next = page.next().is_some(),
            "fetched spark page"
        );
        Ok(page)
    }

    fn execute(
        &self,
        method: Method,
        url: Url,
        query: &[(String, String)],
        body: RequestBody,
        authenticated: bool,
    ) -> Result<HttpResponse, SparkError> {
        let headers = if authenticated {
            self.auth_headers.clone()
        } else {
            HeaderMap::new()
        };
        let request = HttpRequest {
            method,
            url,
            headers,
            query: query.to_vec(),
            body,
        };

        let mut rate_limited: u32 = 0;
        loop {
            debug!(
                method = %request.method,
                url = %request.url,
                attempt = rate_limited.saturating_add(1),
                "sending spark request"
            );
            let response = self.transport.send(&request)?;

            if response.status == StatusCode::TOO_MANY_REQUESTS {
                rate_limited = rate_limited.saturating_add(1);
                let decision = self
                    .policy
                    .should_retry(response.status, &response.headers, rate_limited);
                if !decision.retry {
                    warn!(
                        url = %request.url,
                        attempts = rate_limited,
                        "spark rate limit persisted; giving up"
                    );
                    return Err(SparkError::RateLimitExceeded {
                        attempts: rate_limited,
                        retry_after_secs: retry_after(&response.headers)
                            .map(|wait| wait.as_secs()),
                    });
                }
                warn!(
                    url = %request.url,
                    status = response.status.as_u16(),
                    attempt = rate_limited,
                    wait_secs = decision.wait.as_secs(),
                    "spark rate limited request; waiting before retry"
                );
                self.sleeper.sleep(decision.wait);
                continue;
            }

            if !response.status.is_success() {
                return Err(SparkError::from_error_body(response.status, &response.body));
            }
            return Ok(response);
        }
    }
}

fn build_auth_headers(settings: &SessionSettings) -> Result<HeaderMap, SparkError> {
    let mut authorization =
        HeaderValue::from_str(&format!("Bearer {}", settings.credentials().expose())).map_err(
            |_| SparkError::configuration("access token cannot be encoded as a header value"),
        )?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, SparkError> {
    serde_json::to_value(body).map_err(|error| {
        SparkError::configuration(format!("request body cannot be encoded: {error}"))
    })
}

fn decode_json(response: &HttpResponse) -> Result<Value, SparkError> {
    if response.status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|error| {
        SparkError::malformed_response(format!(
            "{} response body is not valid JSON: {error}",
            response.status.as_u16()
        ))
    })
}

#[cfg(test)]
mod tests;
