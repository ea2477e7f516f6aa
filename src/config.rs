use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Overall per-request timeout enforced by the transport. Bounds a hung
/// request or refresh exchange to this budget.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

const DEFAULT_USER_AGENT: &str = concat!("bingo-client/", env!("CARGO_PKG_VERSION"));

/// Bingo API configuration.
///
/// The required field is a constructor parameter — no runtime
/// "missing field" errors.
///
/// ```rust,ignore
/// use bingo_client::ApiConfig;
///
/// let config = ApiConfig::new("https://bingo.example.com/api/".parse()?);
/// // Optional overrides via chaining:
/// let config = config.with_timeout(std::time::Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ApiConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
}

impl ApiConfig {
    /// Create a new configuration for an API served at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Required env vars
    /// - `BINGO_API_URL`: base URL of the API (must be a valid URL)
    ///
    /// # Optional env vars
    /// - `BINGO_API_TIMEOUT_SECS`: overall request timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if required env vars are missing or invalid.
    pub fn from_env() -> Result<Self, Error> {
        let base_url_str = std::env::var("BINGO_API_URL")
            .map_err(|_| Error::Config("BINGO_API_URL is required".into()))?;
        let base_url: Url = base_url_str
            .parse()
            .map_err(|e| Error::Config(format!("BINGO_API_URL: {e}")))?;

        let mut config = Self::new(base_url);

        if let Ok(secs_str) = std::env::var("BINGO_API_TIMEOUT_SECS") {
            let secs: u64 = secs_str
                .parse()
                .map_err(|e| Error::Config(format!("BINGO_API_TIMEOUT_SECS: {e}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Override the overall request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Overall request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// Build the shared HTTP client for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the underlying client cannot be built.
    pub(crate) fn build_http(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig::new("https://bingo.example.com/api/".parse().unwrap())
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = test_config();
        assert_eq!(
            config.endpoint("/token/refresh/"),
            "https://bingo.example.com/api/token/refresh/"
        );
    }

    #[test]
    fn endpoint_joins_bare_base() {
        let config = ApiConfig::new("https://bingo.example.com".parse().unwrap());
        assert_eq!(
            config.endpoint("/user/me/"),
            "https://bingo.example.com/user/me/"
        );
    }

    #[test]
    fn defaults() {
        let config = test_config();
        assert_eq!(config.timeout(), Duration::from_secs(8));
        assert_eq!(config.base_url().as_str(), "https://bingo.example.com/api/");
    }

    #[test]
    fn overrides_chain() {
        let config = test_config()
            .with_timeout(Duration::from_secs(30))
            .with_user_agent("kiosk/1.0");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.user_agent, "kiosk/1.0");
    }
}
