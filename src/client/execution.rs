//! Per-call pipeline: request interceptors, dispatch, normalization and the
//! response or error interceptor branch. Exactly one host attempt per call.

use crate::normalize::normalize_response;
use crate::resilience::with_timeout;
use crate::transport::{route_request, HostRequest};
use crate::types::{CanonicalResponse, RequestConfig, RequestDescriptor, RequestMeta, RequestUrl};
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::core::ForgeClient;

impl ForgeClient {
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: RequestUrl,
        data: Option<serde_json::Value>,
        config: RequestConfig,
    ) -> Result<CanonicalResponse> {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        let seed = RequestDescriptor {
            method,
            url,
            data,
            headers: config.headers,
            time_limit: config.time_limit,
        };
        let request = self.interceptors.request.apply(seed);
        let meta = RequestMeta {
            method: request.method.clone(),
            url: request.url.clone(),
            target: self.config.target,
        };

        debug!(
            request_id = %request_id,
            method = %meta.method,
            api_target = %meta.target,
            url = %meta.url,
            "dispatching request"
        );

        match self.dispatch(&request, &meta).await {
            Ok(response) => {
                info!(
                    request_id = %request_id,
                    status = response.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                Ok(self.interceptors.response.apply_success(response))
            }
            Err(err) => {
                let err = err.with_request(&meta);
                warn!(
                    request_id = %request_id,
                    status = ?err.status(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "request failed"
                );
                Err(self.interceptors.response.apply_error(err))
            }
        }
    }

    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        meta: &RequestMeta,
    ) -> Result<CanonicalResponse> {
        let headers = merge_headers(&self.config.headers, &request.headers)?;
        let body = request
            .data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let host_request = HostRequest {
            method: request.method.clone(),
            headers,
            body,
        };

        let time_limit = request.time_limit.or(self.config.time_limit);
        let (ok, response) = with_timeout(
            async {
                let raw = route_request(
                    self.host.as_ref(),
                    &self.config,
                    &request.url,
                    host_request,
                )
                .await?;
                let ok = raw.ok();
                let response = normalize_response(raw, meta, request.headers.clone()).await?;
                Ok::<_, Error>((ok, response))
            },
            time_limit,
        )
        .await?;

        if !ok {
            return Err(Error::request_failed(response, meta.clone()));
        }
        Ok(response)
    }
}

/// `Content-Type: application/json`, then client defaults, then per-call headers.
///
/// Names compare case-insensitively; later sources replace earlier values.
pub(crate) fn merge_headers(
    client: &BTreeMap<String, String>,
    call: &BTreeMap<String, String>,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in client.iter().chain(call.iter()) {
        let invalid = |details: String| {
            Error::configuration_with_context(
                "invalid header",
                ErrorContext::new()
                    .with_field_path("request.headers")
                    .with_details(details)
                    .with_source("pipeline"),
            )
        };
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| invalid(format!("{name}: {e}")))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| invalid(format!("{name}: {e}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}
