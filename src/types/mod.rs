//! Core data model: configuration, request descriptors and the canonical response.

pub mod config;
pub mod request;
pub mod response;

pub use config::{ClientConfig, IdentityMode, RequestConfig, Target};
pub use request::{RequestDescriptor, RequestMeta, RequestUrl, RouteToken};
pub use response::{CanonicalResponse, ResponseConfig};
