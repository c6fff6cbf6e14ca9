//! Configuration management for the pagegate server

use std::{env, fmt::Display, str::FromStr, time::Duration};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8081";
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the document service lives and how long a call to it may take.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            upstream: UpstreamConfig {
                base_url: DEFAULT_UPSTREAM_URL.to_string(),
                timeout_ms: DEFAULT_UPSTREAM_TIMEOUT_MS,
            },
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for anything
    /// missing or unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            server: ServerConfig {
                host: lookup("PAGEGATE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: parsed(&lookup, "PAGEGATE_PORT", DEFAULT_PORT),
            },
            upstream: UpstreamConfig {
                base_url: lookup("DOC_SERVICE_URL")
                    .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
                timeout_ms: parsed(&lookup, "DOC_SERVICE_TIMEOUT_MS", DEFAULT_UPSTREAM_TIMEOUT_MS),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring {}={:?}: {}, using {}", key, raw, e, default);
            default
        }),
        None => default,
    }
}
