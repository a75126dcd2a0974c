//! Request-side data model.

use crate::types::config::Target;
use reqwest::Method;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Pre-templated product route.
///
/// Built by the caller's route templating facility; the client only passes it
/// through to the host capability and never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RouteToken(String);

impl RouteToken {
    pub fn new(route: impl Into<String>) -> Self {
        Self(route.into())
    }

    /// Raw route, for host capability implementations.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of a call: a plain path for external hosts or a route token for products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RequestUrl {
    Path(String),
    Route(RouteToken),
}

impl RequestUrl {
    pub fn as_path(&self) -> Option<&str> {
        match self {
            RequestUrl::Path(p) => Some(p),
            RequestUrl::Route(_) => None,
        }
    }

    pub fn as_route(&self) -> Option<&RouteToken> {
        match self {
            RequestUrl::Route(r) => Some(r),
            RequestUrl::Path(_) => None,
        }
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestUrl::Path(p) => f.write_str(p),
            RequestUrl::Route(r) => r.fmt(f),
        }
    }
}

impl From<&str> for RequestUrl {
    fn from(path: &str) -> Self {
        RequestUrl::Path(path.to_string())
    }
}

impl From<String> for RequestUrl {
    fn from(path: String) -> Self {
        RequestUrl::Path(path)
    }
}

impl From<RouteToken> for RequestUrl {
    fn from(route: RouteToken) -> Self {
        RequestUrl::Route(route)
    }
}

/// Working description of one call, as seen and rewritten by request interceptors.
///
/// Whatever the last interceptor returns is what gets transmitted; clearing a
/// field here drops it from the request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: RequestUrl,
    pub data: Option<serde_json::Value>,
    pub headers: BTreeMap<String, String>,
    pub time_limit: Option<i64>,
}

impl RequestDescriptor {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Method, url and target of a call, echoed on responses and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestMeta {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub url: RequestUrl,
    pub target: Target,
}

pub(crate) fn serialize_method<S: Serializer>(
    method: &Method,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}
