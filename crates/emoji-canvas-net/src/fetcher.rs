//! Byte fetching over HTTP.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::redirect::Policy;
use tracing::{debug, trace, warn};

use crate::error::{FetchError, Result};

/// Configuration for the HTTP fetcher.
#[derive(Clone, Debug)]
pub struct HttpFetcherConfig {
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            max_redirects: 10,
            user_agent: Some(format!("emoji-canvas/{} (Rust)", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl HttpFetcherConfig {
    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    #[must_use]
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of redirects to follow.
    #[must_use]
    pub fn with_max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

struct HttpFetcherInner {
    client: reqwest::Client,
    config: HttpFetcherConfig,
}

/// Fetches raw asset bytes over HTTP.
///
/// The fetcher is cheaply cloneable. Clones share the same connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    inner: Arc<HttpFetcherInner>,
}

impl HttpFetcher {
    /// Create a fetcher with default configuration.
    pub fn new() -> Self {
        Self::with_config_or_fallback(HttpFetcherConfig::default())
    }

    /// Build a fetcher from `config`, degrading instead of failing.
    ///
    /// If the client cannot be built, the user agent is dropped first and
    /// then every setting. Each step is logged as a warning and the stored
    /// config reflects what is in effect.
    fn with_config_or_fallback(config: HttpFetcherConfig) -> Self {
        let err = match Self::with_config(config.clone()) {
            Ok(fetcher) => return fetcher,
            Err(err) => err,
        };
        warn!(
            target: "emoji_canvas_net::fetcher",
            error = %err,
            "failed to build HTTP client, retrying without user agent"
        );

        let config = HttpFetcherConfig {
            user_agent: None,
            ..config
        };
        Self::with_config(config.clone()).unwrap_or_else(|err| {
            warn!(
                target: "emoji_canvas_net::fetcher",
                error = %err,
                "failed to build HTTP client, using reqwest defaults without timeouts"
            );
            Self {
                inner: Arc::new(HttpFetcherInner {
                    client: reqwest::Client::new(),
                    config: HttpFetcherConfig {
                        timeout: None,
                        connect_timeout: None,
                        ..config
                    },
                }),
            }
        })
    }

    /// Create a fetcher with custom configuration.
    pub fn with_config(config: HttpFetcherConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        builder = builder.redirect(Policy::limited(config.max_redirects));
        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua);
        }

        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(HttpFetcherInner { client, config }),
        })
    }

    /// Get the fetcher configuration.
    pub fn config(&self) -> &HttpFetcherConfig {
        &self.inner.config
    }

    /// Fetch the body of `url`.
    ///
    /// Non-success statuses are reported as [`FetchError::HttpStatus`].
    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        let parsed = url::Url::parse(url)?;

        trace!(target: "emoji_canvas_net::fetcher", url, "fetching asset");

        let response = self.inner.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(
                target: "emoji_canvas_net::fetcher",
                url,
                status = status.as_u16(),
                "asset request failed"
            );
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;

        debug!(
            target: "emoji_canvas_net::fetcher",
            url,
            len = body.len(),
            "fetched asset"
        );

        Ok(body)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HttpFetcherConfig::default();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.as_deref().unwrap().starts_with("emoji-canvas/"));
    }

    #[test]
    fn test_config_builder() {
        let config = HttpFetcherConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_max_redirects(2)
            .with_user_agent("test-agent");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_redirects, 2);
        assert_eq!(config.user_agent.as_deref(), Some("test-agent"));

        let config = config.without_timeout();
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = HttpFetcherConfig::default().with_user_agent("bad\nagent");
        assert!(HttpFetcher::with_config(config).is_err());
    }

    #[test]
    fn test_fallback_drops_user_agent_and_keeps_timeouts() {
        let config = HttpFetcherConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("bad\nagent");
        let fetcher = HttpFetcher::with_config_or_fallback(config);

        assert!(fetcher.config().user_agent.is_none());
        assert_eq!(fetcher.config().timeout, Some(Duration::from_secs(3)));
        assert_eq!(fetcher.config().connect_timeout, Some(Duration::from_secs(10)));
    }
}
