// ABOUTME: Client configuration loaded from environment variables with validated defaults
// ABOUTME: Produces transport timeouts, cache sizing, and per-pipeline options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::cache::CacheConfig;
use crate::chat::ChatOptions;
use crate::client::HttpTimeouts;
use crate::dashboard::DashboardOptions;
use anyhow::{bail, Context, Result};
use pierre_coach_core::constants::cache::DEFAULT_CACHE_MAX_ENTRIES;
use pierre_coach_core::constants::chat::DEGRADED_RESPONSE_SENTINELS;
use pierre_coach_core::constants::training::DEFAULT_MAX_INSIGHTS;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default backend URL for local development
pub const DEFAULT_API_URL: &str = "http://localhost:8081";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: String,
    /// Bearer token; `None` runs signed out
    pub api_token: Option<String>,
    /// Whole-request timeout for non-streaming calls
    pub http_timeout_secs: u64,
    /// Connection timeout
    pub http_connect_timeout_secs: u64,
    /// Response cache capacity
    pub cache_max_entries: usize,
    /// Insights requested per generation call
    pub max_insights: u32,
    /// Bodies treated as degraded content
    pub degraded_sentinels: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            api_token: None,
            http_timeout_secs: 30,
            http_connect_timeout_secs: 10,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            max_insights: DEFAULT_MAX_INSIGHTS,
            degraded_sentinels: DEGRADED_RESPONSE_SENTINELS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset
fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number")),
        Err(_) => Ok(default),
    }
}

impl ClientConfig {
    /// Load configuration from environment variables and defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or validation fails
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let degraded_sentinels = env::var("PIERRE_DEGRADED_SENTINELS").map_or_else(
            |_| defaults.degraded_sentinels.clone(),
            |raw| {
                raw.split('|')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            },
        );

        let config = Self {
            api_url: env::var("PIERRE_API_URL").unwrap_or(defaults.api_url),
            api_token: env::var("PIERRE_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            http_timeout_secs: env_parse("PIERRE_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            http_connect_timeout_secs: env_parse(
                "PIERRE_HTTP_CONNECT_TIMEOUT_SECS",
                defaults.http_connect_timeout_secs,
            )?,
            cache_max_entries: env_parse("PIERRE_CACHE_MAX_ENTRIES", defaults.cache_max_entries)?,
            max_insights: env_parse("PIERRE_MAX_INSIGHTS", defaults.max_insights)?,
            degraded_sentinels,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .with_context(|| format!("PIERRE_API_URL is not a valid URL: {}", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("PIERRE_API_URL must use http or https, got {}", url.scheme());
        }
        if self.http_timeout_secs == 0 {
            bail!("HTTP timeout must be greater than 0");
        }
        if self.http_connect_timeout_secs == 0 {
            bail!("HTTP connect timeout must be greater than 0");
        }
        if self.cache_max_entries == 0 {
            bail!("Cache capacity must be greater than 0");
        }
        if self.max_insights == 0 {
            bail!("Max insights must be greater than 0");
        }
        Ok(())
    }

    /// Transport timeouts
    #[must_use]
    pub const fn http_timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            request: Duration::from_secs(self.http_timeout_secs),
            connect: Duration::from_secs(self.http_connect_timeout_secs),
        }
    }

    /// Cache sizing
    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_max_entries,
            ..CacheConfig::default()
        }
    }

    /// Chat session options
    #[must_use]
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions {
            degraded_sentinels: self.degraded_sentinels.clone(),
            ..ChatOptions::default()
        }
    }

    /// Dashboard pipeline options
    #[must_use]
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            max_insights: self.max_insights,
            ..DashboardOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_ok());

        config.api_url = "ftp://example.com".to_owned();
        assert!(config.validate().is_err());

        config.api_url = "not a url".to_owned();
        assert!(config.validate().is_err());

        config = ClientConfig {
            http_timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        config = ClientConfig {
            max_insights: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
