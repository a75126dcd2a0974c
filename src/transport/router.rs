//! Request routing: picks the host primitive for a client's target.
//!
//! Headers and body are fully resolved before this point; the router only
//! switches on the target and, for external hosts, prefixes the base URL.

use super::host::{HostCapability, HostRequest, HostResponse};
use crate::types::{ClientConfig, RequestUrl, Target};
use crate::{Error, ErrorContext, Result};

/// Dispatch one call through the host capability.
pub async fn route_request(
    host: &dyn HostCapability,
    client: &ClientConfig,
    url: &RequestUrl,
    request: HostRequest,
) -> Result<Box<dyn HostResponse>> {
    let identity = client.identity;

    let response = match client.target {
        Target::Jira => {
            let route = route_token(client.target, url)?;
            host.request_jira(identity, route, request).await?
        }
        Target::Confluence => {
            let route = route_token(client.target, url)?;
            host.request_confluence(identity, route, request).await?
        }
        Target::External => {
            let base_url = client.base_url.as_deref().ok_or_else(|| {
                Error::configuration_with_context(
                    "baseURL is required for external APIs",
                    ErrorContext::new()
                        .with_field_path("client.base_url")
                        .with_source("router"),
                )
            })?;
            let path = url.as_path().ok_or_else(|| mismatch(client.target, url))?;
            host.fetch(&format!("{base_url}{path}"), request).await?
        }
    };

    Ok(response)
}

fn route_token(target: Target, url: &RequestUrl) -> Result<&crate::types::RouteToken> {
    url.as_route().ok_or_else(|| mismatch(target, url))
}

fn mismatch(target: Target, url: &RequestUrl) -> Error {
    let expected = if target.is_product() {
        "a route token"
    } else {
        "a plain path"
    };
    Error::configuration_with_context(
        format!("{target} requests must be addressed with {expected}"),
        ErrorContext::new()
            .with_field_path("request.url")
            .with_details(url.to_string())
            .with_source("router"),
    )
}
