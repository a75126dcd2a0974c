//! Fetch a GitHub user through an external-target client.
//!
//! Run:
//! - `cargo run --example external_user`
//! - `RUST_LOG=forge_fetch=debug cargo run --example external_user` for pipeline logs

use forge_fetch::transport::HttpHost;
use forge_fetch::{ClientBuilder, ClientConfig, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    id: u64,
    html_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = Arc::new(HttpHost::from_env()?);
    let config = ClientConfig::external("https://api.github.com")
        .with_header("Accept", "application/vnd.github+json")
        .with_header("User-Agent", "forge-fetch-demo")
        .with_time_limit(10_000);
    let github = ClientBuilder::new(config, host).strict(true).build()?;

    let user: GithubUser = github.get("/users/octocat", None).await?.json()?;
    println!("login={} id={} url={}", user.login, user.id, user.html_url);

    Ok(())
}
