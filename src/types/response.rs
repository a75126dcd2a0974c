//! Canonical response envelope shared by all targets.

use crate::types::config::Target;
use crate::types::request::{serialize_method, RequestMeta, RequestUrl};
use crate::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Echo of the request that produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseConfig {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub url: RequestUrl,
    pub target: Target,
    pub headers: BTreeMap<String, String>,
}

impl ResponseConfig {
    pub fn from_meta(meta: &RequestMeta, headers: BTreeMap<String, String>) -> Self {
        Self {
            method: meta.method.clone(),
            url: meta.url.clone(),
            target: meta.target,
            headers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResponse {
    /// `Null` for 204, parsed JSON for JSON content types, otherwise the text body.
    pub data: serde_json::Value,
    pub status: u16,
    pub status_text: String,
    /// Lowercase header names.
    pub headers: BTreeMap<String, String>,
    pub config: ResponseConfig,
    /// Always `None`; kept for shape compatibility with axios-style consumers.
    pub request: Option<serde_json::Value>,
}

impl CanonicalResponse {
    /// Deserialize `data` into a caller type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
