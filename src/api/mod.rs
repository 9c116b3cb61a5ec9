use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod client;

pub use client::{ApiError, BackendClient};

/// A discoverable MCP prompt template or MCP tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A prompt document served from the backend's prompts directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDetail {
    pub name: String,
    pub content: String,
}

/// Payload of `GET /api/mcp_info/discovery`. Either list may be missing when
/// the server exposes nothing of that kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryResponse {
    #[serde(default)]
    pub prompts: Option<Vec<CatalogItem>>,
    #[serde(default)]
    pub tools: Option<Vec<CatalogItem>>,
}

impl DiscoveryResponse {
    pub fn into_lists(self) -> (Vec<CatalogItem>, Vec<CatalogItem>) {
        (
            self.prompts.unwrap_or_default(),
            self.tools.unwrap_or_default(),
        )
    }
}

/// Free-form server description returned by `GET /api/mcp_info/info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct McpInfo(pub serde_json::Map<String, Value>);

/// One entry of a 422 response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ValidationIssue {
    pub fn location(&self) -> String {
        self.loc
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpValidationError {
    #[serde(default)]
    pub detail: Vec<ValidationIssue>,
}
