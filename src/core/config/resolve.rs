use std::time::Duration;

use reqwest::Url;

use crate::core::config::data::{BackendConfig, Config, DEFAULT_BASE_URL};
use crate::core::config::io::ConfigError;
use crate::utils::url::normalize_base_url;

pub const ENV_BASE_URL: &str = "MCPDECK_BASE_URL";
pub const ENV_TOKEN: &str = "MCPDECK_TOKEN";
/// Personal access token used by Databricks-hosted backends.
pub const ENV_TOKEN_FALLBACK: &str = "DATABRICKS_TOKEN";

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct BackendOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

impl Config {
    pub fn resolve_backend(
        &self,
        overrides: BackendOverrides,
    ) -> Result<BackendConfig, ConfigError> {
        self.resolve_backend_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Precedence: overrides, then environment, then the config file, then defaults.
    pub fn resolve_backend_with_env<F>(
        &self,
        overrides: BackendOverrides,
        env: F,
    ) -> Result<BackendConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let base_url = non_empty(overrides.base_url)
            .or_else(|| non_empty(env(ENV_BASE_URL)))
            .or_else(|| non_empty(self.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = validate_base_url(base_url.trim())?;

        let token = non_empty(overrides.token)
            .or_else(|| non_empty(env(ENV_TOKEN)))
            .or_else(|| non_empty(env(ENV_TOKEN_FALLBACK)))
            .or_else(|| non_empty(self.token.clone()));

        Ok(BackendConfig {
            base_url,
            token,
            timeout: self.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs),
        })
    }
}

/// Accept only absolute http(s) URLs; trailing slashes are dropped.
pub fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(normalize_base_url(raw)),
        other => Err(ConfigError::InvalidBaseUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
