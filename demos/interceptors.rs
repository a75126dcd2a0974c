//! Request / response / error interceptors on a Jira client.
//!
//! Run against a site (or a local stub) with:
//! - `FORGE_FETCH_JIRA_URL=https://your-site.atlassian.net cargo run --example interceptors`

use forge_fetch::transport::HttpHost;
use forge_fetch::{
    CanonicalResponse, ClientBuilder, ClientConfig, Error, RequestDescriptor, Result, RouteToken,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = Arc::new(HttpHost::from_env()?);
    let jira = ClientBuilder::new(ClientConfig::jira(), host).build()?;

    jira.interceptors.request.add(|req: RequestDescriptor| {
        println!("[request] {} {}", req.method, req.url);
        req.with_header("X-Trace", uuid::Uuid::new_v4().to_string())
    });

    jira.interceptors.response.add(|resp: CanonicalResponse| {
        println!("[response] {}", resp.status);
        resp
    });

    // Keep the failure, only log it.
    jira.interceptors.response.add_error(|err: Error| {
        eprintln!("[error] status={:?} {}", err.status(), err);
        err
    });

    let me = jira
        .get(RouteToken::new("/rest/api/3/myself"), None)
        .await?;
    println!("displayName={}", me.data["displayName"]);

    Ok(())
}
