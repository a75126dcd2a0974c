//! Client-level and per-call configuration.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Backend family a client routes its calls to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Jira,
    Confluence,
    External,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Jira => "jira",
            Target::Confluence => "confluence",
            Target::External => "external",
        }
    }

    /// Whether calls to this target are addressed with route tokens.
    pub fn is_product(&self) -> bool {
        !matches!(self, Target::External)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Privilege a product call is issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    #[default]
    User,
    App,
}

impl IdentityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityMode::User => "user",
            IdentityMode::App => "app",
        }
    }
}

/// Configuration fixed at client construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub target: Target,

    #[serde(default, alias = "as")]
    pub identity: IdentityMode,

    /// Required iff `target` is [`Target::External`].
    #[serde(default, alias = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Merged under per-call headers.
    #[serde(default, alias = "defaultHeaders")]
    pub headers: BTreeMap<String, String>,

    /// Milliseconds; absent, zero or negative disables the timeout guard.
    #[serde(default, alias = "timeLimit", skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<i64>,
}

impl ClientConfig {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            identity: IdentityMode::default(),
            base_url: None,
            headers: BTreeMap::new(),
            time_limit: None,
        }
    }

    pub fn jira() -> Self {
        Self::new(Target::Jira)
    }

    pub fn confluence() -> Self {
        Self::new(Target::Confluence)
    }

    pub fn external(base_url: impl Into<String>) -> Self {
        Self::new(Target::External).with_base_url(base_url)
    }

    pub fn with_identity(mut self, identity: IdentityMode) -> Self {
        self.identity = identity;
        self
    }

    pub fn as_app(self) -> Self {
        self.with_identity(IdentityMode::App)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_time_limit(mut self, ms: i64) -> Self {
        self.time_limit = Some(ms);
        self
    }

    /// Parse a YAML (or JSON) config document.
    ///
    /// Unknown target names surface here as configuration errors.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                "invalid client config",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                "failed to read client config",
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Checks that an external client carries an absolute base URL.
    ///
    /// Product clients are always valid; their routing is resolved by the host.
    pub fn validate(&self) -> Result<()> {
        if self.target != Target::External {
            return Ok(());
        }
        let base = self.base_url.as_deref().ok_or_else(|| {
            Error::configuration_with_context(
                "baseURL is required for external APIs",
                ErrorContext::new()
                    .with_field_path("client.base_url")
                    .with_source("config_validator"),
            )
        })?;
        url::Url::parse(base).map_err(|e| {
            Error::configuration_with_context(
                "baseURL is not an absolute URL",
                ErrorContext::new()
                    .with_field_path("client.base_url")
                    .with_details(format!("{base}: {e}"))
                    .with_source("config_validator"),
            )
        })?;
        Ok(())
    }
}

/// Optional per-call settings (the `config?` argument of every verb).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, alias = "timeLimit", skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<i64>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_time_limit(mut self, ms: i64) -> Self {
        self.time_limit = Some(ms);
        self
    }
}
