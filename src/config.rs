// src/config.rs
// =============================================================================
// Runtime configuration for the retriever and the HTTP service.
//
// Nothing in the crate reads timeouts, redirect bounds or CORS origins from
// global state. Instead these structs are built once (from defaults, CLI flags
// or environment variables) and handed to the components that need them.
//
// Environment variables (all optional):
//   AD_READINESS_HOST                   listen address (default 127.0.0.1)
//   AD_READINESS_PORT                   listen port (default 8080)
//   AD_READINESS_ALLOWED_ORIGINS        comma-separated CORS origins
//   AD_READINESS_TRUSTED_ORIGIN_SUFFIX  e.g. ".vercel.app"
//   AD_READINESS_PAGE_TIMEOUT_SECS      main page timeout (default 30)
//   AD_READINESS_PROBE_TIMEOUT_SECS     robots.txt / ads.txt timeout (default 8)
//   AD_READINESS_MAX_REDIRECTS          redirect bound (default 5)
//   AD_READINESS_STRICT_REDIRECTS       "1"/"true" to fail past the bound
// =============================================================================

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Browser-like user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// What the retriever does once the redirect bound has been used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOverflow {
    /// Issue one more request to the last computed URL and return it as-is.
    FinalRequest,
    /// Give up with a `TooManyRedirects` error.
    Fail,
}

#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    pub page_timeout: Duration,
    pub probe_timeout: Duration,
    pub max_redirects: usize,
    pub redirect_overflow: RedirectOverflow,
    pub user_agent: String,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(8),
            max_redirects: 5,
            redirect_overflow: RedirectOverflow::FinalRequest,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RetrieverConfig {
    /// Reads overrides from the environment on top of the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let strict = env_flag("AD_READINESS_STRICT_REDIRECTS");

        Ok(Self {
            page_timeout: Duration::from_secs(env_or(
                "AD_READINESS_PAGE_TIMEOUT_SECS",
                defaults.page_timeout.as_secs(),
            )?),
            probe_timeout: Duration::from_secs(env_or(
                "AD_READINESS_PROBE_TIMEOUT_SECS",
                defaults.probe_timeout.as_secs(),
            )?),
            max_redirects: env_or("AD_READINESS_MAX_REDIRECTS", defaults.max_redirects)?,
            redirect_overflow: if strict {
                RedirectOverflow::Fail
            } else {
                RedirectOverflow::FinalRequest
            },
            user_agent: defaults.user_agent,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Origins ending with this suffix over https are accepted as well.
    pub trusted_origin_suffix: Option<String>,
    pub retriever: RetrieverConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let origins = env::var("AD_READINESS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());

        Ok(Self {
            host: env::var("AD_READINESS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("AD_READINESS_PORT", 8080)?,
            allowed_origins: split_origins(&origins),
            trusted_origin_suffix: env::var("AD_READINESS_TRUSTED_ORIGIN_SUFFIX")
                .ok()
                .map(|suffix| suffix.trim().to_string())
                .filter(|suffix| !suffix.is_empty()),
            retriever: RetrieverConfig::from_env()?,
        })
    }
}

// Splits a comma-separated origin list, dropping blanks and trailing slashes
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
