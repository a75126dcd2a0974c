use super::host::{HostCapability, HostError, HostRequest, HostResponse};
use crate::types::{IdentityMode, RouteToken};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Proxy;
use std::env;
use std::time::Duration;

const IDENTITY_HEADER: &str = "x-forge-identity";

/// Host capability backed by `reqwest`, for running outside the platform sandbox
/// (local development, integration tests, CLI tooling).
///
/// Product routes are resolved against configured site URLs. The identity mode is
/// forwarded as an `x-forge-identity` header; enforcing it is up to whatever sits
/// behind the site URL.
pub struct HttpHost {
    client: reqwest::Client,
    jira_url: Option<String>,
    confluence_url: Option<String>,
}

impl HttpHost {
    pub fn new() -> Result<Self, HostError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HostError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Ok(proxy_url) = env::var("FORGE_FETCH_PROXY_URL") {
            if let Some(proxy) = parse_proxy(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        Ok(Self {
            client: builder.build()?,
            jira_url: None,
            confluence_url: None,
        })
    }

    /// Build from environment:
    /// - `FORGE_FETCH_HTTP_TIMEOUT_SECS` (default 30)
    /// - `FORGE_FETCH_JIRA_URL`, `FORGE_FETCH_CONFLUENCE_URL` (site base URLs)
    pub fn from_env() -> Result<Self, HostError> {
        let timeout_secs = env::var("FORGE_FETCH_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let mut host = Self::with_timeout(Duration::from_secs(timeout_secs))?;
        host.jira_url = env::var("FORGE_FETCH_JIRA_URL").ok();
        host.confluence_url = env::var("FORGE_FETCH_CONFLUENCE_URL").ok();
        Ok(host)
    }

    pub fn with_jira_url(mut self, url: impl Into<String>) -> Self {
        self.jira_url = Some(url.into());
        self
    }

    pub fn with_confluence_url(mut self, url: impl Into<String>) -> Self {
        self.confluence_url = Some(url.into());
        self
    }

    async fn send(
        &self,
        url: &str,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        tracing::debug!(url, status = response.status().as_u16(), "host response");
        Ok(Box::new(HttpHostResponse(response)))
    }

    async fn send_product(
        &self,
        product: &str,
        site: Option<&str>,
        identity: IdentityMode,
        route: &RouteToken,
        mut request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        let site = site.ok_or_else(|| {
            HostError::Denied(format!("no {product} site configured for this host"))
        })?;
        request.headers.insert(
            HeaderName::from_static(IDENTITY_HEADER),
            HeaderValue::from_static(identity.as_str()),
        );
        self.send(&format!("{}{}", site, route.as_str()), request)
            .await
    }
}

#[async_trait]
impl HostCapability for HttpHost {
    async fn request_jira(
        &self,
        identity: IdentityMode,
        route: &RouteToken,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        self.send_product("jira", self.jira_url.as_deref(), identity, route, request)
            .await
    }

    async fn request_confluence(
        &self,
        identity: IdentityMode,
        route: &RouteToken,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        self.send_product(
            "confluence",
            self.confluence_url.as_deref(),
            identity,
            route,
            request,
        )
        .await
    }

    async fn fetch(
        &self,
        url: &str,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError> {
        self.send(url, request).await
    }
}

fn parse_proxy(proxy_url: &str) -> Option<Proxy> {
    match Proxy::all(proxy_url) {
        Ok(proxy) => Some(proxy),
        Err(e) => {
            tracing::warn!(proxy_url, error = %e, "ignoring invalid FORGE_FETCH_PROXY_URL");
            None
        }
    }
}

struct HttpHostResponse(reqwest::Response);

#[async_trait]
impl HostResponse for HttpHostResponse {
    fn status(&self) -> u16 {
        self.0.status().as_u16()
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.0
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    async fn bytes(self: Box<Self>) -> Result<Bytes, HostError> {
        Ok(self.0.bytes().await?)
    }
}
