//! Conversion of raw host responses into [`CanonicalResponse`].

use crate::transport::HostResponse;
use crate::types::{CanonicalResponse, RequestMeta, ResponseConfig};
use crate::Result;
use std::collections::BTreeMap;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Whether a content type should be decoded as JSON.
///
/// Plain substring match, so parameters such as `; charset=utf-8` and suffixes
/// are tolerated. The match ignores ASCII case.
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(JSON_CONTENT_TYPE)
}

/// Lowercase header names; repeated names are joined with `", "` in arrival order.
pub fn fold_headers(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::<String, String>::new();
    for (name, value) in pairs {
        headers
            .entry(name.to_ascii_lowercase())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(&value);
            })
            .or_insert_with(|| value.clone());
    }
    headers
}

/// Normalize a raw host response.
///
/// The body is read even for non-ok statuses. `config` on the result is always
/// rebuilt from `meta`, so it reflects the request that was actually sent.
pub async fn normalize_response(
    raw: Box<dyn HostResponse>,
    meta: &RequestMeta,
    request_headers: BTreeMap<String, String>,
) -> Result<CanonicalResponse> {
    let status = raw.status();
    let status_text = raw.status_text();
    let headers = fold_headers(raw.headers());

    let data = if status == 204 {
        serde_json::Value::Null
    } else {
        let content_type = raw.header("content-type").unwrap_or_default();
        if is_json_content_type(&content_type) {
            raw.json().await?
        } else {
            serde_json::Value::String(raw.text().await?)
        }
    };

    tracing::debug!(status, api_target = %meta.target, "normalized response");

    Ok(CanonicalResponse {
        data,
        status,
        status_text,
        headers,
        config: ResponseConfig::from_meta(meta, request_headers),
        request: None,
    })
}
