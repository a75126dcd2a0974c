use crate::resilience::TimeoutError;
use crate::transport::HostError;
use crate::types::{CanonicalResponse, RequestMeta};
use thiserror::Error;

/// Structured error context for configuration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Offending key, such as `client.base_url`.
    pub field_path: Option<String>,
    pub details: Option<String>,
    /// Stage that raised it: `router`, `pipeline`, `config_loader`.
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for every call issued through a [`crate::ForgeClient`].
///
/// Callers should treat every verb as able to fail with any of these kinds.
/// Response error interceptors receive and return this type, so a failure can be
/// rewritten but never turned back into a successful response.
///
/// Errors raised while a call is in flight carry the method, url and target of
/// that call; see [`Error::config`].
#[derive(Debug, Error)]
pub enum Error {
    /// The host answered with a non-ok status. The normalized response is kept so
    /// callers can inspect the status and the error body.
    #[error("{message}: HTTP {} {} {} ({})", .response.status, .config.method, .config.url, .config.target)]
    RequestFailed {
        message: String,
        response: Box<CanonicalResponse>,
        config: RequestMeta,
    },

    #[error("{source}")]
    Timeout {
        source: TimeoutError,
        config: Option<RequestMeta>,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
        config: Option<RequestMeta>,
    },

    #[error("Host capability error: {source}")]
    Host {
        source: HostError,
        config: Option<RequestMeta>,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        source: serde_json::Error,
        config: Option<RequestMeta>,
    },
}

impl From<TimeoutError> for Error {
    fn from(source: TimeoutError) -> Self {
        Error::Timeout {
            source,
            config: None,
        }
    }
}

impl From<HostError> for Error {
    fn from(source: HostError) -> Self {
        Error::Host {
            source,
            config: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Serialization {
            source,
            config: None,
        }
    }
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub(crate) fn request_failed(response: CanonicalResponse, config: RequestMeta) -> Self {
        Error::RequestFailed {
            message: "Request failed".to_string(),
            response: Box::new(response),
            config,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
            config: None,
        }
    }

    /// Attach the in-flight call's metadata unless the error already has some.
    pub(crate) fn with_request(mut self, meta: &RequestMeta) -> Self {
        match &mut self {
            Error::RequestFailed { .. } => {}
            Error::Timeout { config, .. }
            | Error::Configuration { config, .. }
            | Error::Host { config, .. }
            | Error::Serialization { config, .. } => {
                if config.is_none() {
                    *config = Some(meta.clone());
                }
            }
        }
        self
    }

    /// Human-readable message without the structured suffix.
    pub fn message(&self) -> String {
        match self {
            Error::RequestFailed { message, .. } | Error::Configuration { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// The normalized response, present only for [`Error::RequestFailed`].
    pub fn response(&self) -> Option<&CanonicalResponse> {
        match self {
            Error::RequestFailed { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Method, url and target of the faulted request.
    ///
    /// `None` only for errors built outside a call, such as config loading or
    /// a replacement error returned by an error interceptor.
    pub fn config(&self) -> Option<&RequestMeta> {
        match self {
            Error::RequestFailed { config, .. } => Some(config),
            Error::Timeout { config, .. }
            | Error::Configuration { config, .. }
            | Error::Host { config, .. }
            | Error::Serialization { config, .. } => config.as_ref(),
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }
}
