//! # forge-fetch
//!
//! Axios-style HTTP client over a sandboxed request capability.
//!
//! A [`ForgeClient`] is bound to one backend family ([`Target`]): the Jira REST
//! surface, the Confluence REST surface, or an arbitrary external host. Every
//! call goes through the same pipeline:
//!
//! 1. request interceptors rewrite the [`RequestDescriptor`];
//! 2. headers are merged and the body is JSON-encoded;
//! 3. the router picks the host primitive for the target;
//! 4. the raw response is normalized into a [`CanonicalResponse`];
//! 5. response interceptors (or error interceptors on failure) run in order.
//!
//! The network itself is behind [`transport::HostCapability`]. Inside the
//! platform sandbox that is the platform's request API; elsewhere
//! [`transport::HttpHost`] issues the calls with `reqwest`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forge_fetch::{ClientBuilder, ClientConfig, RouteToken};
//! use forge_fetch::transport::HttpHost;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> forge_fetch::Result<()> {
//!     let host = Arc::new(HttpHost::from_env()?);
//!     let jira = ClientBuilder::new(ClientConfig::jira(), host).build()?;
//!
//!     let me = jira.get(RouteToken::new("/rest/api/3/myself"), None).await?;
//!     println!("{}", me.data["displayName"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client verbs, builder and per-call pipeline |
//! | [`interceptors`] | Request / response interceptor chains |
//! | [`transport`] | Host capability traits, reqwest host and router |
//! | [`normalize`] | Raw response to canonical response |
//! | [`resilience`] | Timeout guard |
//! | [`types`] | Configuration, request and response data model |

pub mod client;
pub mod interceptors;
pub mod normalize;
pub mod resilience;
pub mod transport;
pub mod types;

pub use client::builder::create_client;
pub use client::{ClientBuilder, ForgeClient};
pub use interceptors::{ErrorInterceptor, Interceptors, RequestInterceptor, ResponseInterceptor};
pub use resilience::{with_timeout, TimeoutError};
pub use types::{
    CanonicalResponse, ClientConfig, IdentityMode, RequestConfig, RequestDescriptor, RequestMeta,
    RequestUrl, RouteToken, Target,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
