use std::{path::PathBuf, time::Duration};
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Service settings, read from `PORT`, `ANALYTICS_BASE_URL`,
/// `ANALYTICS_FIXTURE_DIR` and `ANALYTICS_TIMEOUT_MS`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub analytics_base_url: Url,
    /// When set, analytics are read from `{dir}/{code}.json` instead of over HTTP.
    pub fixture_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "port number",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let base = lookup("ANALYTICS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let analytics_base_url = Url::parse(base.trim())
            .ok()
            .filter(|url| !url.cannot_be_a_base() && matches!(url.scheme(), "http" | "https"))
            .ok_or(ConfigError::Invalid {
                name: "ANALYTICS_BASE_URL",
                expected: "http(s) url",
                value: base.clone(),
            })?;

        let fixture_dir = lookup("ANALYTICS_FIXTURE_DIR")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let timeout_ms = match lookup("ANALYTICS_TIMEOUT_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::Invalid {
                    name: "ANALYTICS_TIMEOUT_MS",
                    expected: "positive number of milliseconds",
                    value,
                })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            port,
            analytics_base_url,
            fixture_dir,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
