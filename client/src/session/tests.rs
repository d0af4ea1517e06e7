//! Unit tests for the REST session: verbs, error mapping, retries and
//! pagination.

use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::header::{HeaderName, RETRY_AFTER};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::config::Credentials;
use crate::transport::MockHttpTransport;

const BASE: &str = "https://api.example.test/v1/";

#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, SparkError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<HttpResponse, SparkError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests mutex").clone()
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

#[derive(Default)]
struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn waits(&self) -> Vec<Duration> {
        self.waits.lock().expect("sleeper mutex").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.waits.lock().expect("sleeper mutex").push(duration);
    }
}

fn respond(
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

fn ok_json(body: &str) -> Result<HttpResponse, SparkError> {
    respond(StatusCode::OK, body, &[])
}

fn next_link(url: &str) -> (HeaderName, String) {
    (LINK, format!("<{url}>; rel=\"next\""))
}

fn page_with_next(body: &str, next: &str) -> Result<HttpResponse, SparkError> {
    let (name, value) = next_link(next);
    respond(StatusCode::OK, body, &[(name, value.as_str())])
}

#[fixture]
fn settings() -> SessionSettings {
    let credentials = Credentials::new("token-abc").expect("valid token");
    SessionSettings::new(credentials, BASE, 5).expect("valid settings")
}

fn session_with(
    settings: SessionSettings,
    transport: Arc<dyn HttpTransport>,
    policy: RateLimitPolicy,
) -> (RestSession, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let runtime = SessionRuntime {
        policy,
        sleeper: sleeper.clone(),
    };
    let session = RestSession::with_runtime(settings, transport, runtime).expect("session builds");
    (session, sleeper)
}

#[rstest]
fn get_sends_bearer_auth_and_query(settings: SessionSettings) {
    let mut transport = MockHttpTransport::new();
    transport
        .expect_send()
        .withf(|request: &HttpRequest| {
            request.method == Method::GET
                && request.url.as_str() == "https://api.example.test/v1/people/me"
                && request.query == vec![("teamId".to_owned(), "t-1".to_owned())]
                && request
                    .headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    == Some("Bearer token-abc")
                && request
                    .headers
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    == Some("application/json")
        })
        .times(1)
        .returning(|_| Ok(HttpResponse::new(StatusCode::OK, r#"{"id":"p-1"}"#)));

    let (session, _) = session_with(settings, Arc::new(transport), RateLimitPolicy::default());
    let value = session
        .get("people/me", &QueryParams::new().with("teamId", "t-1"))
        .expect("get succeeds");
    assert_eq!(value, json!({"id": "p-1"}));
}

#[rstest]
fn authorization_header_is_marked_sensitive(settings: SessionSettings) {
    let headers = build_auth_headers(&settings).expect("headers build");
    let authorization = headers.get(AUTHORIZATION).expect("authorization header");
    assert!(authorization.is_sensitive());
}

#[rstest]
#[case::put(Method::PUT)]
#[case::post(Method::POST)]
fn json_verbs_send_the_encoded_body(settings: SessionSettings, #[case] method: Method) {
    let transport = ScriptedTransport::new(vec![ok_json(r#"{"id":"r-1","title":"Ops"}"#)]);
    let (session, _) = session_with(settings, transport.clone(), RateLimitPolicy::default());
    let body = json!({"title": "Ops"});

    let value = if method == Method::PUT {
        session.put_json("rooms/r-1", &body)
    } else {
        session.post_json("rooms", &body)
    }
    .expect("request succeeds");

    assert_eq!(value["title"], "Ops");
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, method);
    assert_eq!(requests[0].body, RequestBody::Json(body));
}

#[rstest]
fn post_form_omits_credentials(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![ok_json(r#"{"access_token":"new"}"#)]);
    let (session, _) = session_with(settings, transport.clone(), RateLimitPolicy::default());
    let fields = vec![("grant_type".to_owned(), "refresh_token".to_owned())];

    session
        .post_form("access_token", fields.clone())
        .expect("form post succeeds");

    let request = transport.requests().remove(0);
    assert!(request.headers.get(AUTHORIZATION).is_none());
    assert_eq!(request.body, RequestBody::Form(fields));
}

#[rstest]
fn delete_accepts_no_content(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![respond(StatusCode::NO_CONTENT, "", &[])]);
    let (session, _) = session_with(settings, transport.clone(), RateLimitPolicy::default());

    session.delete("messages/m-1").expect("delete succeeds");
    assert_eq!(transport.requests()[0].method, Method::DELETE);
}

#[rstest]
fn delete_rejects_other_success_statuses(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![ok_json("{}")]);
    let (session, _) = session_with(settings, transport, RateLimitPolicy::default());

    let error = session.delete("messages/m-1").expect_err("200 is not accepted");
    assert_eq!(error.status(), Some(200));
}

#[rstest]
fn no_content_decodes_to_null(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![respond(StatusCode::NO_CONTENT, "", &[])]);
    let (session, _) = session_with(settings, transport, RateLimitPolicy::default());

    let value = session.put_json("rooms/r-1", &json!({})).expect("put succeeds");
    assert_eq!(value, Value::Null);
}

#[rstest]
fn api_errors_carry_status_and_tracking_id(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![respond(
        StatusCode::NOT_FOUND,
        r#"{"message":"The requested resource could not be found.","trackingId":"ROUTER_1"}"#,
        &[],
    )]);
    let (session, sleeper) = session_with(settings, transport, RateLimitPolicy::default());

    let error = session
        .get("rooms/missing", &QueryParams::new())
        .expect_err("404 surfaces");
    assert_eq!(error.status(), Some(404));
    assert_eq!(error.tracking_id(), Some("ROUTER_1"));
    assert!(sleeper.waits().is_empty());
}

#[rstest]
fn invalid_json_is_a_malformed_response(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![ok_json("not json")]);
    let (session, _) = session_with(settings, transport, RateLimitPolicy::default());

    let error = session.get("people/me", &QueryParams::new()).expect_err("decode fails");
    assert!(matches!(error, SparkError::MalformedResponse { .. }), "{error:?}");
}

#[rstest]
fn transport_failures_are_not_retried(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![Err(SparkError::timeout("deadline elapsed"))]);
    let (session, sleeper) = session_with(settings, transport.clone(), RateLimitPolicy::default());

    let error = session.get("people/me", &QueryParams::new()).expect_err("timeout surfaces");
    assert!(error.is_transport());
    assert_eq!(transport.requests().len(), 1);
    assert!(sleeper.waits().is_empty());
}

#[rstest]
fn retries_after_rate_limit_using_retry_after(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![
        respond(StatusCode::TOO_MANY_REQUESTS, "", &[(RETRY_AFTER, "3")]),
        respond(StatusCode::TOO_MANY_REQUESTS, "", &[]),
        ok_json(r#"{"id":"p-1"}"#),
    ]);
    let (session, sleeper) = session_with(settings, transport.clone(), RateLimitPolicy::default());

    let value = session.get("people/me", &QueryParams::new()).expect("eventually succeeds");
    assert_eq!(value["id"], "p-1");
    assert_eq!(
        sleeper.waits(),
        vec![Duration::from_secs(3), Duration::from_secs(30)]
    );
    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|request| request == &requests[0]));
}

#[rstest]
fn persistent_rate_limit_gives_up_after_max_attempts(settings: SessionSettings) {
    let policy = RateLimitPolicy::new(Duration::from_secs(1), Duration::from_secs(4), 3);
    let transport = ScriptedTransport::new(vec![
        respond(StatusCode::TOO_MANY_REQUESTS, "", &[]),
        respond(StatusCode::TOO_MANY_REQUESTS, "", &[]),
        respond(StatusCode::TOO_MANY_REQUESTS, "", &[(RETRY_AFTER, "9")]),
        ok_json("{}"),
    ]);
    let (session, sleeper) = session_with(settings, transport.clone(), policy);

    let error = session.get("rooms", &QueryParams::new()).expect_err("gives up");
    assert_eq!(
        error,
        SparkError::RateLimitExceeded {
            attempts: 3,
            retry_after_secs: Some(9),
        }
    );
    assert_eq!(sleeper.waits(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
    assert_eq!(transport.requests().len(), 3);
}

#[rstest]
fn fail_fast_policy_surfaces_first_rate_limit(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![respond(StatusCode::TOO_MANY_REQUESTS, "", &[])]);
    let (session, sleeper) = session_with(settings, transport, RateLimitPolicy::fail_fast());

    let error = session.get("rooms", &QueryParams::new()).expect_err("429 surfaces");
    assert_eq!(error.status(), Some(429));
    assert!(sleeper.waits().is_empty());
}

#[rstest]
fn request_list_follows_next_links_in_order(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![
        page_with_next(
            r#"{"items":[{"id":"a"},{"id":"b"}]}"#,
            "https://api.example.test/v1/rooms?cursor=p2",
        ),
        page_with_next(r#"{"items":[{"id":"c"}]}"#, "/v1/rooms?cursor=p3"),
        ok_json(r#"{"items":[{"id":"d"}]}"#),
    ]);
    let (session, _) = session_with(settings, transport.clone(), RateLimitPolicy::default());

    let ids = session
        .request_list("rooms", QueryParams::new().with("max", 2))
        .map(|item| item.map(|value| value["id"].as_str().unwrap_or_default().to_owned()))
        .collect::<Result<Vec<_>, _>>()
        .expect("all pages load");
    assert_eq!(ids, ["a", "b", "c", "d"]);

    let requests = transport.requests();
    let urls = requests
        .iter()
        .map(|request| request.url.as_str().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(
        urls,
        [
            "https://api.example.test/v1/rooms",
            "https://api.example.test/v1/rooms?cursor=p2",
            "https://api.example.test/v1/rooms?cursor=p3",
        ]
    );
    assert_eq!(requests[0].query, vec![("max".to_owned(), "2".to_owned())]);
    assert!(requests[1].query.is_empty());
    assert!(requests[2].query.is_empty());
}

#[rstest]
fn request_list_is_lazy(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![page_with_next(
        r#"{"items":[{"id":"a"},{"id":"b"}]}"#,
        "https://api.example.test/v1/rooms?cursor=p2",
    )]);
    let (session, _) = session_with(settings, transport.clone(), RateLimitPolicy::default());

    let mut items = session.request_list("rooms", QueryParams::new());
    assert!(transport.requests().is_empty());

    let first = items.next().expect("one item").expect("page loads");
    assert_eq!(first["id"], "a");
    assert_eq!(items.next().expect("second item").expect("buffered")["id"], "b");
    assert_eq!(transport.requests().len(), 1);
}

#[rstest]
fn empty_page_ends_iteration_even_with_next_link(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![page_with_next(
        r#"{"items":[]}"#,
        "https://api.example.test/v1/rooms?cursor=p2",
    )]);
    let (session, _) = session_with(settings, transport.clone(), RateLimitPolicy::default());

    assert_eq!(session.request_list("rooms", QueryParams::new()).count(), 0);
    assert_eq!(transport.requests().len(), 1);
}

#[rstest]
fn pagination_error_is_yielded_once_then_fused(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![
        page_with_next(
            r#"{"items":[{"id":"a"}]}"#,
            "https://api.example.test/v1/rooms?cursor=p2",
        ),
        respond(StatusCode::INTERNAL_SERVER_ERROR, "boom", &[]),
        ok_json(r#"{"items":[{"id":"never"}]}"#),
    ]);
    let (session, _) = session_with(settings, transport.clone(), RateLimitPolicy::default());

    let mut items = session.request_list("rooms", QueryParams::new());
    assert!(items.next().expect("first item").is_ok());
    let error = items.next().expect("error item").expect_err("500 surfaces");
    assert_eq!(error.status(), Some(500));
    assert!(items.next().is_none());
    assert!(items.next().is_none());
    assert_eq!(transport.requests().len(), 2);
}

#[rstest]
fn page_without_items_is_malformed(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![ok_json(r#"{"id":"not-a-page"}"#)]);
    let (session, _) = session_with(settings, transport, RateLimitPolicy::default());

    let mut pages = session.request_pages("rooms", QueryParams::new());
    let error = pages.next().expect("one result").expect_err("decode fails");
    assert!(matches!(error, SparkError::MalformedResponse { .. }), "{error:?}");
    assert!(pages.next().is_none());
}

#[rstest]
fn rate_limited_page_is_retried_mid_iteration(settings: SessionSettings) {
    let transport = ScriptedTransport::new(vec![
        page_with_next(
            r#"{"items":[{"id":"a"}]}"#,
            "https://api.example.test/v1/rooms?cursor=p2",
        ),
        respond(StatusCode::TOO_MANY_REQUESTS, "", &[(RETRY_AFTER, "1")]),
        ok_json(r#"{"items":[{"id":"b"}]}"#),
    ]);
    let (session, sleeper) = session_with(settings, transport, RateLimitPolicy::default());

    let pages = session
        .request_pages("rooms", QueryParams::new())
        .collect::<Result<Vec<_>, _>>()
        .expect("pages load");
    assert_eq!(pages.len(), 2);
    assert_eq!(sleeper.waits(), vec![Duration::from_secs(1)]);
}

#[rstest]
#[case::suffix("rooms", "https://api.example.test/v1/rooms")]
#[case::nested("rooms/r-1", "https://api.example.test/v1/rooms/r-1")]
#[case::absolute("https://other.example.test/v2/x", "https://other.example.test/v2/x")]
fn absolute_url_joins_under_the_api_root(
    settings: SessionSettings,
    #[case] endpoint: &str,
    #[case] expected: &str,
) {
    let (session, _) = session_with(
        settings,
        ScriptedTransport::new(vec![]),
        RateLimitPolicy::default(),
    );
    assert_eq!(
        session.absolute_url(endpoint).expect("valid endpoint").as_str(),
        expected
    );
}

#[rstest]
fn blank_endpoint_is_rejected(settings: SessionSettings) {
    let (session, _) = session_with(
        settings,
        ScriptedTransport::new(vec![]),
        RateLimitPolicy::default(),
    );
    assert!(matches!(
        session.absolute_url("  "),
        Err(SparkError::Configuration { .. })
    ));
}

#[rstest]
fn accessors_expose_resolved_settings(settings: SessionSettings) {
    let (session, _) = session_with(
        settings,
        ScriptedTransport::new(vec![]),
        RateLimitPolicy::default(),
    );
    assert_eq!(session.access_token(), "token-abc");
    assert_eq!(session.base_url().as_str(), BASE);
    assert_eq!(session.timeout(), Duration::from_secs(5));
    assert!(!format!("{session:?}").contains("token-abc"));
}
