//! Client configuration types.
//!
//! [`ClientConfig`] describes a middleware chain declaratively, typically
//! loaded from a configuration file, and [`ClientConfig::apply`] composes it
//! around a base client.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::middleware::{
    BackoffLayer, BaseUrlLayer, HeadersLayer, LogLevel, LoggingLayer, Middleware, RecoverLayer,
    status_in,
};
use crate::{BoxClient, HttpClient, Result, chain};

/// Configuration for the backoff middleware.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Maximum number of attempts per call.
    pub max_attempts: u32,
    /// Delay step, in milliseconds when deserialized.
    #[serde(rename = "base_delay_ms", deserialize_with = "duration_from_millis")]
    pub base_delay: Duration,
    /// Statuses accepted as a successful attempt.
    pub good_statuses: Vec<u16>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            good_statuses: vec![200],
        }
    }
}

impl BackoffConfig {
    /// Set the maximum number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay step.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the accepted statuses.
    #[must_use]
    pub fn with_good_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.good_statuses = statuses.into_iter().collect();
        self
    }

    /// Build the matching layer.
    #[must_use]
    pub fn layer(&self) -> BackoffLayer {
        BackoffLayer::new(
            self.max_attempts,
            self.base_delay,
            status_in(self.good_statuses.iter().copied()),
        )
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Declarative description of a middleware chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every request is pointed at.
    pub base_url: Option<String>,
    /// Headers appended to every request.
    pub headers: BTreeMap<String, String>,
    /// Logging level; no logging when absent.
    pub logging: Option<LogLevel>,
    /// Backoff settings; no retries when absent.
    pub backoff: Option<BackoffConfig>,
    /// Whether panics are converted into errors.
    pub recover_panics: bool,
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Middlewares described by this configuration, innermost first.
    ///
    /// The order is fixed: base URL, headers, logging, backoff, recover.
    pub fn middlewares(&self) -> Result<Vec<Middleware>> {
        let mut middlewares = Vec::new();
        if let Some(base_url) = &self.base_url {
            middlewares.push(Middleware::from_layer(BaseUrlLayer::try_new(base_url)?));
        }
        if !self.headers.is_empty() {
            middlewares.push(Middleware::from_layer(HeadersLayer::try_from_pairs(
                &self.headers,
            )?));
        }
        if let Some(level) = self.logging {
            middlewares.push(Middleware::from_layer(LoggingLayer::with_level(level)));
        }
        if let Some(backoff) = &self.backoff {
            middlewares.push(Middleware::from_layer(backoff.layer()));
        }
        if self.recover_panics {
            middlewares.push(Middleware::from_layer(RecoverLayer::new()));
        }
        Ok(middlewares)
    }

    /// Compose the configured chain around `client`.
    pub fn apply<C: HttpClient + 'static>(&self, client: C) -> Result<BoxClient> {
        Ok(chain(client, self.middlewares()?))
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    headers: BTreeMap<String, String>,
    logging: Option<LogLevel>,
    backoff: Option<BackoffConfig>,
    recover_panics: Option<bool>,
}

impl ClientConfigBuilder {
    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Enable logging at the given level.
    #[must_use]
    pub const fn logging(mut self, level: LogLevel) -> Self {
        self.logging = Some(level);
        self
    }

    /// Enable backoff.
    #[must_use]
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Set whether panics are converted into errors.
    #[must_use]
    pub const fn recover_panics(mut self, recover: bool) -> Self {
        self.recover_panics = Some(recover);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url,
            headers: self.headers,
            logging: self.logging,
            backoff: self.backoff,
            recover_panics: self.recover_panics.unwrap_or_default(),
        }
    }
}
