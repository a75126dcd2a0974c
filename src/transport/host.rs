//! Host request capability.
//!
//! These traits decouple the client from whatever actually performs the network
//! call: the platform sandbox, a plain HTTP client, or a test double. The host
//! enforces permissions and identity; the client only chooses which primitive to
//! call and with which identity.

use crate::types::{IdentityMode, RouteToken};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

/// Options handed to every host primitive.
#[derive(Debug, Clone)]
pub struct HostRequest {
    pub method: Method,
    pub headers: HeaderMap,
    /// Already-encoded body; `None` means no body is sent.
    pub body: Option<String>,
}

/// Failure of the host capability itself (no response was produced).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request denied by host: {0}")]
    Denied(String),

    #[error("host error: {0}")]
    Other(String),
}

/// The sandboxed request capability consumed by the router.
#[async_trait]
pub trait HostCapability: Send + Sync {
    /// Issue a call against the first product's REST surface (Jira).
    async fn request_jira(
        &self,
        identity: IdentityMode,
        route: &RouteToken,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError>;

    /// Issue a call against the second product's REST surface (Confluence).
    async fn request_confluence(
        &self,
        identity: IdentityMode,
        route: &RouteToken,
        request: HostRequest,
    ) -> Result<Box<dyn HostResponse>, HostError>;

    /// Generic fetch to an arbitrary, fully-qualified URL.
    async fn fetch(&self, url: &str, request: HostRequest)
        -> Result<Box<dyn HostResponse>, HostError>;
}

/// Response-like object returned by a host primitive.
#[async_trait]
pub trait HostResponse: Send {
    fn status(&self) -> u16;

    fn status_text(&self) -> String {
        canonical_reason(self.status())
    }

    fn ok(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Header pairs in the order the host reports them.
    fn headers(&self) -> Vec<(String, String)>;

    /// Case-insensitive header getter. Repeated headers are joined with `", "`.
    fn header(&self, name: &str) -> Option<String> {
        let values = self
            .headers()
            .into_iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
            .collect::<Vec<_>>();
        (!values.is_empty()).then(|| values.join(", "))
    }

    /// Consumes the response and returns the raw body.
    async fn bytes(self: Box<Self>) -> Result<Bytes, HostError>;

    async fn text(self: Box<Self>) -> Result<String, HostError> {
        let body = self.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn json(self: Box<Self>) -> Result<serde_json::Value, crate::Error> {
        let body = self.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

pub(crate) fn canonical_reason(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

/// Fully-buffered response held in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    pub status: u16,
    pub status_text: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl BufferedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(value.to_string())
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

#[async_trait]
impl HostResponse for BufferedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn status_text(&self) -> String {
        match &self.status_text {
            Some(text) => text.clone(),
            None => canonical_reason(self.status),
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }

    async fn bytes(self: Box<Self>) -> Result<Bytes, HostError> {
        Ok(self.body)
    }
}
