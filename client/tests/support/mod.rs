//! Shared test doubles for spark-client integration tests.
//!
//! Integration tests compile as separate crates, so the scripted transport
//! and recording sleeper live here and each test file pulls them in with
//! `mod support;`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderName, HeaderValue, LINK};
use spark_client::config::{Credentials, SessionSettings};
use spark_client::transport::{HttpRequest, HttpResponse, HttpTransport};
use spark_client::{RateLimitPolicy, RestSession, SessionRuntime, Sleeper, SparkError};

/// API root used by every test session.
pub const BASE_URL: &str = "https://api.example.test/v1/";

/// Transport that replays canned responses in order and records requests.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, SparkError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Script the responses returned by successive sends.
    pub fn new(responses: Vec<Result<HttpResponse, SparkError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests mutex").clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests mutex").len()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SparkError> {
        self.requests
            .lock()
            .expect("requests mutex")
            .push(request.clone());
        self.responses
            .lock()
            .expect("responses mutex")
            .pop_front()
            .unwrap_or_else(|| Err(SparkError::transport("script exhausted")))
    }
}

/// Sleeper that records waits instead of blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Waits requested so far.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().expect("sleeper mutex").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.waits.lock().expect("sleeper mutex").push(duration);
    }
}

/// Response with the given status, body and headers.
pub fn respond(
    status: StatusCode,
    body: &str,
    headers: &[(HeaderName, &str)],
) -> Result<HttpResponse, SparkError> {
    let mut response = HttpResponse::new(status, body);
    for (name, value) in headers {
        response.headers.append(
            name.clone(),
            HeaderValue::from_str(value).expect("valid header value"),
        );
    }
    Ok(response)
}

/// `200 OK` with a JSON body.
pub fn ok_json(body: &str) -> Result<HttpResponse, SparkError> {
    respond(StatusCode::OK, body, &[])
}

/// `200 OK` page whose `Link` header points at `next`.
pub fn page_with_next(body: &str, next: &str) -> Result<HttpResponse, SparkError> {
    let link = format!("<{next}>; rel=\"next\"");
    respond(StatusCode::OK, body, &[(LINK, link.as_str())])
}

/// Page body holding `ids` as `{"id": ...}` items.
pub fn items_body(ids: &[&str]) -> String {
    let items = ids
        .iter()
        .map(|id| serde_json::json!({ "id": id }))
        .collect::<Vec<_>>();
    serde_json::json!({ "items": items }).to_string()
}

/// Build a session over `transport` with a recording sleeper.
pub fn session(
    transport: Arc<ScriptedTransport>,
    policy: RateLimitPolicy,
) -> (RestSession, Arc<RecordingSleeper>) {
    let settings = SessionSettings::new(
        Credentials::new("test-token").expect("valid token"),
        BASE_URL,
        5,
    )
    .expect("valid settings");
    let sleeper = Arc::new(RecordingSleeper::default());
    let runtime = SessionRuntime {
        policy,
        sleeper: sleeper.clone(),
    };
    let built = RestSession::with_runtime(settings, transport, runtime).expect("session builds");
    (built, sleeper)
}
