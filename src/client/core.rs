use crate::interceptors::Interceptors;
use crate::transport::HostCapability;
use crate::types::{CanonicalResponse, ClientConfig, RequestConfig, RequestUrl};
use crate::Result;
use reqwest::Method;
use std::sync::Arc;

/// Axios-style client bound to one target.
///
/// Configuration is fixed at construction. Interceptors are registered through
/// [`ForgeClient::interceptors`] and belong to this instance only.
pub struct ForgeClient {
    pub(crate) config: ClientConfig,
    pub(crate) host: Arc<dyn HostCapability>,
    pub interceptors: Interceptors,
}

impl ForgeClient {
    /// Create a client. Use [`crate::ClientBuilder`] for env fallbacks and strict validation.
    pub fn new(config: ClientConfig, host: Arc<dyn HostCapability>) -> Self {
        Self {
            config,
            host,
            interceptors: Interceptors::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get(
        &self,
        url: impl Into<RequestUrl>,
        config: Option<RequestConfig>,
    ) -> Result<CanonicalResponse> {
        self.request(Method::GET, url, None, config).await
    }

    pub async fn delete(
        &self,
        url: impl Into<RequestUrl>,
        config: Option<RequestConfig>,
    ) -> Result<CanonicalResponse> {
        self.request(Method::DELETE, url, None, config).await
    }

    pub async fn post(
        &self,
        url: impl Into<RequestUrl>,
        data: Option<serde_json::Value>,
        config: Option<RequestConfig>,
    ) -> Result<CanonicalResponse> {
        self.request(Method::POST, url, data, config).await
    }

    pub async fn put(
        &self,
        url: impl Into<RequestUrl>,
        data: Option<serde_json::Value>,
        config: Option<RequestConfig>,
    ) -> Result<CanonicalResponse> {
        self.request(Method::PUT, url, data, config).await
    }

    pub async fn patch(
        &self,
        url: impl Into<RequestUrl>,
        data: Option<serde_json::Value>,
        config: Option<RequestConfig>,
    ) -> Result<CanonicalResponse> {
        self.request(Method::PATCH, url, data, config).await
    }

    /// Issue a call with an arbitrary method. All verbs funnel through here.
    pub async fn request(
        &self,
        method: Method,
        url: impl Into<RequestUrl>,
        data: Option<serde_json::Value>,
        config: Option<RequestConfig>,
    ) -> Result<CanonicalResponse> {
        self.execute(method, url.into(), data, config.unwrap_or_default())
            .await
    }
}
