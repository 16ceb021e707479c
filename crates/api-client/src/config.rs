//! Configuration for the mapping API client
//!
//! Built from the `[api]` section of `stopscan.toml` plus a resolved key.

use crate::error::{ApiError, ApiResult};
use crate::rate_limit::RateLimitConfig;
use std::fmt;
use std::time::Duration;
use stopscan_core::config::ApiSection;

/// Default Google Maps Platform base URL
const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default public Overpass interpreter
const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL for Street View and Places endpoints
    pub maps_base_url: String,
    /// Overpass interpreter URL
    pub overpass_url: String,
    /// Maps Platform API key
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limit configuration
    pub rate_limit: RateLimitConfig,
    /// Session id sent as `X-Session-ID`
    pub session_id: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("maps_base_url", &self.maps_base_url)
            .field("overpass_url", &self.overpass_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("rate_limit", &self.rate_limit)
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl ClientConfig {
    /// Defaults with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            maps_base_url: DEFAULT_MAPS_BASE_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            rate_limit: RateLimitConfig::per_second(25),
            session_id: None,
        }
    }

    /// Create configuration from the `[api]` settings section
    pub fn from_settings(section: &ApiSection, api_key: impl Into<String>) -> Self {
        Self::new(api_key)
            .with_maps_base_url(&section.maps_base_url)
            .with_overpass_url(&section.overpass_url)
            .with_timeout(Duration::from_secs(section.timeout_secs))
            .with_rate_limit(RateLimitConfig::per_second(section.requests_per_second))
    }

    /// Builder-style method to set the Maps base URL
    #[must_use]
    pub fn with_maps_base_url(mut self, url: impl Into<String>) -> Self {
        self.maps_base_url = url.into();
        self
    }

    /// Builder-style method to set the Overpass URL
    #[must_use]
    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Builder-style method to set the session id
    #[must_use]
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [("maps_base_url", &self.maps_base_url), ("overpass_url", &self.overpass_url)] {
            if url.is_empty() {
                return Err(ApiError::config(format!("{name} cannot be empty")));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config(format!("{name} must start with http:// or https://")));
            }
        }

        if self.api_key.trim().is_empty() {
            return Err(ApiError::config("api_key cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ApiError::config("rate limit must allow at least one request"));
        }

        Ok(())
    }
}
