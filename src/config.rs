//! Provider configuration.
//!
//! # Example
//!
//! ```rust
//! use neo_ccams::config::CcamsConfig;
//!
//! // Use defaults (public CCAMS service)
//! let config = CcamsConfig::default();
//! assert_eq!(config.priority, 100);
//!
//! // Or customize
//! let config = CcamsConfig::default()
//!     .with_api_base("https://ccams.example.org")
//!     .with_connect_timeout_ms(5_000)
//!     .with_provider_name("Local CCAMS");
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use url::Url;

/// Public CCAMS service.
pub const DEFAULT_API_BASE: &str = "https://ccams.kilojuliett.ch";

/// Squawk allocation endpoint, relative to the base.
pub const DEFAULT_API_ENDPOINT: &str = "/squawk";

/// Client identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "neoradar/0.1.0";

/// Name the provider registers under.
pub const DEFAULT_PROVIDER_NAME: &str = "Neo Radar CCAMS Squawk Provider";

/// Provider priority; the host's built-in provider uses 0.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Read (receive) timeout.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;

/// Write (send) timeout.
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 30_000;

/// Invalid configuration values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Base URL plus endpoint is not a valid URL.
    #[error("invalid allocator URL {url:?}: {reason}")]
    InvalidUrl {
        /// The URL as assembled.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// Plain `http` base while `https_only` is set.
    #[error("allocator URL {0:?} is not https")]
    InsecureUrl(String),
    /// A timeout of zero would disable the bound.
    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
    /// Provider name is empty.
    #[error("provider name must not be empty")]
    EmptyProviderName,
    /// Config file could not be parsed.
    #[cfg(feature = "config-json")]
    #[error("config parse error: {0}")]
    Parse(String),
}

// ============================================================================
// CCAMS Config
// ============================================================================

/// Configuration for [`CcamsProvider`](crate::CcamsProvider).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CcamsConfig {
    /// Allocation service base URL (scheme + host).
    pub api_base: String,
    /// Allocation endpoint path.
    pub api_endpoint: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Receive timeout in milliseconds.
    pub read_timeout_ms: u64,
    /// Send timeout in milliseconds.
    pub write_timeout_ms: u64,
    /// Refuse non-https allocator URLs.
    pub https_only: bool,
    /// Registry name.
    pub provider_name: String,
    /// Registry priority.
    pub priority: i32,
    /// Fixed seed for the fallback generator (random when `None`).
    pub fallback_seed: Option<u64>,
}

impl Default for CcamsConfig {
    fn default() -> Self {
        Self {
            api_base: String::from(DEFAULT_API_BASE),
            api_endpoint: String::from(DEFAULT_API_ENDPOINT),
            user_agent: String::from(DEFAULT_USER_AGENT),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            https_only: true,
            provider_name: String::from(DEFAULT_PROVIDER_NAME),
            priority: DEFAULT_PRIORITY,
            fallback_seed: None,
        }
    }
}

impl CcamsConfig {
    /// Set the service base URL
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = String::from(base);
        self
    }

    /// Set the endpoint path
    pub fn with_api_endpoint(mut self, endpoint: &str) -> Self {
        self.api_endpoint = String::from(endpoint);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = String::from(user_agent);
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout_ms(mut self, ms: u64) -> Self {
        self.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout
    pub fn with_read_timeout_ms(mut self, ms: u64) -> Self {
        self.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout
    pub fn with_write_timeout_ms(mut self, ms: u64) -> Self {
        self.write_timeout_ms = ms;
        self
    }

    /// Allow or refuse plain-http allocator URLs
    pub fn with_https_only(mut self, https_only: bool) -> Self {
        self.https_only = https_only;
        self
    }

    /// Set the provider name
    pub fn with_provider_name(mut self, name: &str) -> Self {
        self.provider_name = String::from(name);
        self
    }

    /// Set the provider priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Seed the fallback generator
    pub fn with_fallback_seed(mut self, seed: u64) -> Self {
        self.fallback_seed = Some(seed);
        self
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Write timeout as a `Duration`.
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Base URL joined with the endpoint.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}{}",
            self.api_base.trim_end_matches('/'),
            self.api_endpoint
        );
        let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if self.https_only && url.scheme() != "https" {
            return Err(ConfigError::InsecureUrl(raw));
        }
        Ok(url)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        for (name, ms) in [
            ("connect", self.connect_timeout_ms),
            ("read", self.read_timeout_ms),
            ("write", self.write_timeout_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        if self.provider_name.trim().is_empty() {
            return Err(ConfigError::EmptyProviderName);
        }
        Ok(())
    }

    /// Parse a JSON config. Missing fields take their defaults.
    #[cfg(feature = "config-json")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
