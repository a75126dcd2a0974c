//! End-to-end pipeline tests against a recording host capability.

use async_trait::async_trait;
use forge_fetch::transport::{BufferedResponse, HostCapability, HostError, HostRequest, HostResponse};
use forge_fetch::{
    ClientBuilder, ClientConfig, Error, ErrorContext, ForgeClient, IdentityMode, RequestConfig,
    RequestDescriptor, RouteToken, Target,
};
use reqwest::Method;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One captured host call.
#[derive(Debug, Clone)]
struct Call {
    primitive: String,
    identity: Option<IdentityMode>,
    address: String,
    request: HostRequest,
}

#[derive(Default)]
struct MockHost {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<BufferedResponse>>,
    delay: Option<Duration>,
}

impl MockHost {
    fn replying(responses: Vec<BufferedResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        })
    }

    fn slow(delay: Duration, response: BufferedResponse) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(vec![response].into()),
            delay: Some(delay),
            ..Default::default()
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(
        &self,
        primitive: &str,
        identity: Option<IdentityMode>,
        address: &str,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        self.calls.lock().unwrap().push(Call {
            primitive: primitive.to_string(),
            identity,
            address: address.to_string(),
            request,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| HostError::Other("no scripted response".to_string()))?;
        Ok(Box::new(next))
    }
}

#[async_trait]
impl HostCapability for MockHost {
    async fn request_jira(
        &self,
        identity: IdentityMode,
        route: &RouteToken,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        self.answer("jira", Some(identity), route.as_str(), request).await
    }

    async fn request_confluence(
        &self,
        identity: IdentityMode,
        route: &RouteToken,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        self.answer("confluence", Some(identity), route.as_str(), request)
            .await
    }

    async fn fetch(&self, url: &str, request: HostRequest) -> Result<Box<dyn HostResponse>, HostError> {
        self.answer("fetch", None, url, request).await
    }
}

fn client(config: ClientConfig, host: &Arc<MockHost>) -> ForgeClient {
    ClientBuilder::new(config, host.clone()).build().unwrap()
}

fn myself() -> RouteToken {
    RouteToken::new("/rest/api/3/myself")
}

#[tokio::test]
async fn jira_get_resolves_with_parsed_json() {
    let host = MockHost::replying(vec![BufferedResponse::with_json(
        200,
        &json!({"accountId": "5b1", "displayName": "Jane"}),
    )]);
    let jira = client(ClientConfig::jira(), &host);

    let resp = jira.get(myself(), None).await.unwrap();

    assert_eq!(resp.data, json!({"accountId": "5b1", "displayName": "Jane"}));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.status_text, "OK");
    assert_eq!(resp.config.method, Method::GET);
    assert_eq!(resp.config.target, Target::Jira);
    assert_eq!(resp.request, None);

    let calls = host.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].primitive, "jira");
    assert_eq!(calls[0].identity, Some(IdentityMode::User));
    assert_eq!(calls[0].address, "/rest/api/3/myself");
    assert!(calls[0].request.body.is_none());
}

#[tokio::test]
async fn not_found_rejects_with_request_failed() {
    let host = MockHost::replying(vec![BufferedResponse::with_json(
        404,
        &json!({"errorMessages": ["Issue does not exist"]}),
    )]);
    let jira = client(ClientConfig::jira(), &host);

    let err = jira.get(myself(), None).await.unwrap_err();

    match &err {
        Error::RequestFailed {
            message,
            response,
            config,
        } => {
            assert_eq!(message, "Request failed");
            assert_eq!(response.status, 404);
            assert_eq!(response.data["errorMessages"][0], "Issue does not exist");
            assert_eq!(config.target, Target::Jira);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn interceptor_header_is_merged_with_client_defaults() {
    let host = MockHost::replying(vec![BufferedResponse::new(204)]);
    let config = ClientConfig::confluence()
        .as_app()
        .with_header("Accept", "application/json")
        .with_header("X-Trace", "client");
    let confluence = client(config, &host);
    confluence
        .interceptors
        .request
        .add(|d: RequestDescriptor| d.with_header("X-Trace", "abc"));

    let resp = confluence
        .delete(
            RouteToken::new("/wiki/rest/api/content/1"),
            Some(RequestConfig::new().with_header("X-Call", "1")),
        )
        .await
        .unwrap();
    assert_eq!(resp.data, serde_json::Value::Null);

    let calls = host.calls();
    let call = &calls[0];
    assert_eq!(call.primitive, "confluence");
    assert_eq!(call.identity, Some(IdentityMode::App));
    let headers = &call.request.headers;
    assert_eq!(headers["x-trace"], "abc");
    assert_eq!(headers["accept"], "application/json");
    assert_eq!(headers["x-call"], "1");
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(call.request.method, Method::DELETE);
}

#[tokio::test]
async fn request_interceptors_compose_in_order() {
    let host = MockHost::replying(vec![BufferedResponse::new(204)]);
    let jira = client(ClientConfig::jira(), &host);
    jira.interceptors.request.add(|mut d: RequestDescriptor| {
        d.method = Method::PUT;
        d.data = Some(json!({"step": 1}));
        d
    });
    jira.interceptors.request.add(|mut d: RequestDescriptor| {
        if let Some(data) = d.data.as_mut() {
            data["step"] = json!(2);
        }
        d.headers.clear();
        d
    });

    jira.post(
        myself(),
        Some(json!({"step": 0})),
        Some(RequestConfig::new().with_header("X-Dropped", "yes")),
    )
    .await
    .unwrap();

    let calls = host.calls();
    let call = &calls[0];
    assert_eq!(call.request.method, Method::PUT);
    assert_eq!(call.request.body.as_deref(), Some(r#"{"step":2}"#));
    assert!(call.request.headers.get("x-dropped").is_none());
}

#[tokio::test]
async fn late_registration_applies_to_next_call() {
    let host = MockHost::replying(vec![
        BufferedResponse::new(200).with_body("first"),
        BufferedResponse::new(200).with_body("second"),
    ]);
    let jira = client(ClientConfig::jira(), &host);

    let first = jira.get(myself(), None).await.unwrap();
    assert_eq!(first.data, json!("first"));

    jira.interceptors.response.add(|mut r: forge_fetch::CanonicalResponse| {
        r.data = json!(format!("{}!", r.data.as_str().unwrap_or_default()));
        r
    });
    let second = jira.get(myself(), None).await.unwrap();
    assert_eq!(second.data, json!("second!"));
}

#[tokio::test]
async fn error_interceptors_transform_but_never_recover() {
    let host = MockHost::replying(vec![BufferedResponse::new(500).with_body("boom")]);
    let jira = client(ClientConfig::jira(), &host);
    jira.interceptors
        .response
        .add(|_: forge_fetch::CanonicalResponse| -> forge_fetch::CanonicalResponse {
            panic!("success handler must not run on failure")
        });
    jira.interceptors.response.add_error(|err: Error| {
        let status = err.status().unwrap_or_default();
        Error::configuration_with_context(
            format!("wrapped {status}"),
            ErrorContext::new().with_source("test"),
        )
    });

    let err = jira.get(myself(), None).await.unwrap_err();
    assert_eq!(err.message(), "wrapped 500");
}

#[tokio::test]
async fn external_without_base_url_fails_before_host() {
    let host = MockHost::replying(vec![]);
    let external = client(ClientConfig::new(Target::External), &host);

    let err = external.get("/users/octocat", None).await.unwrap_err();

    assert!(err.is_configuration());
    assert!(host.calls().is_empty());
    let config = err.config().unwrap();
    assert_eq!(config.method, Method::GET);
    assert_eq!(config.url.as_path(), Some("/users/octocat"));
    assert_eq!(config.target, Target::External);
}

#[tokio::test]
async fn strict_builder_rejects_missing_base_url() {
    let host = MockHost::replying(vec![]);
    let err = ClientBuilder::new(ClientConfig::new(Target::External), host)
        .strict(true)
        .build()
        .err()
        .unwrap();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn external_fetch_concatenates_base_url() {
    let host = MockHost::replying(vec![BufferedResponse::new(200)
        .with_header("content-type", "text/plain")
        .with_body("hello")]);
    let external = client(ClientConfig::external("https://api.github.com"), &host);

    let resp = external.patch("/users/octocat", Some(json!([1, 2])), None).await.unwrap();

    assert_eq!(resp.data, json!("hello"));
    let calls = host.calls();
    let call = &calls[0];
    assert_eq!(call.primitive, "fetch");
    assert_eq!(call.address, "https://api.github.com/users/octocat");
    assert_eq!(call.request.body.as_deref(), Some("[1,2]"));
}

#[tokio::test(start_paused = true)]
async fn slow_host_times_out() {
    let host = MockHost::slow(Duration::from_millis(500), BufferedResponse::new(204));
    let jira = client(ClientConfig::jira().with_time_limit(50), &host);

    let err = jira.get(myself(), None).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "Request timed out (50ms)");
    assert_eq!(host.calls().len(), 1);
    let config = err.config().unwrap();
    assert_eq!(config.target, Target::Jira);
    assert_eq!(config.url.as_route(), Some(&myself()));
}

#[tokio::test]
async fn error_interceptors_see_request_metadata() {
    let host = MockHost::replying(vec![]);
    let confluence = client(ClientConfig::confluence(), &host);
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    confluence.interceptors.response.add_error(move |err: Error| {
        *sink.lock().unwrap() = err.config().cloned();
        err
    });

    // route tokens are required for product targets
    let err = confluence.post("/wiki/rest/api/content", None, None).await.unwrap_err();
    assert!(err.is_configuration());

    let seen = seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.target, Target::Confluence);
}

#[tokio::test(start_paused = true)]
async fn per_call_time_limit_overrides_client() {
    let host = MockHost::slow(Duration::from_millis(500), BufferedResponse::new(204));
    let jira = client(ClientConfig::jira().with_time_limit(50), &host);

    let resp = jira
        .put(myself(), None, Some(RequestConfig::new().with_time_limit(0)))
        .await
        .unwrap();
    assert_eq!(resp.status, 204);
}

#[tokio::test]
async fn host_failure_surfaces_as_host_error() {
    let host = MockHost::replying(vec![]);
    let jira = client(ClientConfig::jira(), &host);

    let err = jira.get(myself(), None).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Host {
            source: HostError::Other(_),
            ..
        }
    ));
    assert_eq!(err.config().map(|m| m.target), Some(Target::Jira));
}

#[tokio::test]
async fn typed_data_access() {
    #[derive(serde::Deserialize)]
    struct Myself {
        #[serde(rename = "accountId")]
        account_id: String,
    }

    let host = MockHost::replying(vec![BufferedResponse::with_json(
        200,
        &json!({"accountId": "5b1"}),
    )]);
    let jira = client(ClientConfig::jira(), &host);

    let me: Myself = jira.get(myself(), None).await.unwrap().json().unwrap();
    assert_eq!(me.account_id, "5b1");
}
