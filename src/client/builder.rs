use crate::client::core::ForgeClient;
use crate::transport::HostCapability;
use crate::types::ClientConfig;
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with environment fallbacks.
///
/// Keep this surface area small and predictable.
pub struct ClientBuilder {
    config: ClientConfig,
    host: Arc<dyn HostCapability>,
    strict: bool,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig, host: Arc<dyn HostCapability>) -> Self {
        Self {
            config,
            host,
            strict: false,
        }
    }

    /// Validate the config at build time instead of failing on the first call.
    ///
    /// Opt-in; can also be enabled with `FORGE_FETCH_STRICT_CONFIG=1`.
    pub fn strict(mut self, enable: bool) -> Self {
        self.strict = enable;
        self
    }

    /// Build the client.
    ///
    /// When the config has no time limit, `FORGE_FETCH_TIME_LIMIT_MS` is used.
    pub fn build(self) -> Result<ForgeClient> {
        let mut config = self.config;

        if config.time_limit.is_none() {
            config.time_limit = std::env::var("FORGE_FETCH_TIME_LIMIT_MS")
                .ok()
                .and_then(|s| s.parse::<i64>().ok());
        }

        let strict = self.strict
            || std::env::var("FORGE_FETCH_STRICT_CONFIG").ok().as_deref() == Some("1");
        if strict {
            config.validate()?;
        }

        tracing::debug!(
            api_target = %config.target,
            identity = config.identity.as_str(),
            time_limit_ms = ?config.time_limit,
            "client built"
        );

        Ok(ForgeClient::new(config, self.host))
    }
}

/// Factory taking a [`ClientConfig`] and a host capability.
pub fn create_client(config: ClientConfig, host: Arc<dyn HostCapability>) -> Result<ForgeClient> {
    ClientBuilder::new(config, host).build()
}
