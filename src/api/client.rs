//! HTTP access to the backend's prompt and discovery endpoints.

use std::error::Error as StdError;
use std::fmt;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{DiscoveryResponse, HttpValidationError, McpInfo, PromptDetail, PromptFile};
use crate::core::config::BackendConfig;
use crate::utils::url::{construct_api_url, encode_path_segment};

pub const PROMPTS_ENDPOINT: &str = "api/prompts";
pub const DISCOVERY_ENDPOINT: &str = "api/mcp_info/discovery";
pub const INFO_ENDPOINT: &str = "api/mcp_info/info";

/// Failure of a single backend request.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    Transport {
        url: String,
        source: reqwest::Error,
    },
    /// The server answered with a non-success status other than 422.
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    /// The server rejected the request as malformed (HTTP 422).
    Validation {
        url: String,
        detail: HttpValidationError,
    },
    /// The response body did not match the expected shape.
    Decode {
        url: String,
        source: serde_json::Error,
    },
    /// A prompt name was empty; nothing was sent.
    InvalidName,
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport { url, source } => {
                write!(f, "Request to {url} failed: {source}")
            }
            ApiError::Status { url, status, body } => {
                if body.trim().is_empty() {
                    write!(f, "Request to {url} failed with status {status}")
                } else {
                    write!(
                        f,
                        "Request to {url} failed with status {status}: {}",
                        body.trim()
                    )
                }
            }
            ApiError::Validation { url, detail } => {
                write!(f, "Request to {url} was rejected as invalid")?;
                for issue in &detail.detail {
                    let location = issue.location();
                    if location.is_empty() {
                        write!(f, "; {}", issue.msg)?;
                    } else {
                        write!(f, "; {location}: {}", issue.msg)?;
                    }
                }
                Ok(())
            }
            ApiError::Decode { url, source } => {
                write!(f, "Unexpected response from {url}: {source}")
            }
            ApiError::InvalidName => write!(f, "Prompt name must not be empty"),
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Transport { source, .. } => Some(source),
            ApiError::Decode { source, .. } => Some(source),
            ApiError::Status { .. } | ApiError::Validation { .. } | ApiError::InvalidName => None,
        }
    }
}

/// Thin typed wrapper over `reqwest` for the backend's read-only endpoints.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| ApiError::Transport {
            url: config.base_url.clone(),
            source,
        })?;
        Ok(Self { http, config })
    }

    pub async fn list_prompts(&self) -> Result<Vec<PromptFile>, ApiError> {
        self.get_json(PROMPTS_ENDPOINT).await
    }

    pub async fn get_prompt(&self, name: &str) -> Result<PromptDetail, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidName);
        }
        let endpoint = format!("{PROMPTS_ENDPOINT}/{}", encode_path_segment(name));
        self.get_json(&endpoint).await
    }

    pub async fn discovery(&self) -> Result<DiscoveryResponse, ApiError> {
        self.get_json(DISCOVERY_ENDPOINT).await
    }

    pub async fn info(&self) -> Result<McpInfo, ApiError> {
        self.get_json(INFO_ENDPOINT).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = construct_api_url(&self.config.base_url, endpoint);
        let mut request = self.http.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        debug!(url = %url, "Sending backend request");
        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        debug!(url = %url, status = %status, bytes = body.len(), "Backend response received");

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let detail = serde_json::from_str::<HttpValidationError>(&body).unwrap_or_default();
            return Err(ApiError::Validation { url, detail });
        }
        if !status.is_success() {
            return Err(ApiError::Status { url, status, body });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests;
