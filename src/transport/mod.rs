//! Host capability abstraction, the reqwest-backed host and the request router.

pub mod host;
pub mod http;
pub mod router;

pub use host::{BufferedResponse, HostCapability, HostError, HostRequest, HostResponse};
pub use http::HttpHost;
pub use router::route_request;
