//! Aggregation of the backend's three catalog collections.
//!
//! Prompt files come from `GET /api/prompts`; MCP prompts and MCP tools come
//! bundled from the discovery endpoint. Both requests run concurrently and the
//! refresh fails as a whole if either does.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join;
use tracing::{debug, warn};

use crate::api::{
    ApiError, BackendClient, CatalogItem, DiscoveryResponse, PromptDetail, PromptFile,
};

/// Read access to the backend collections.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn prompt_files(&self) -> Result<Vec<PromptFile>, ApiError>;
    async fn discovery(&self) -> Result<DiscoveryResponse, ApiError>;
    async fn prompt_detail(&self, name: &str) -> Result<PromptDetail, ApiError>;
}

#[async_trait]
impl CatalogSource for BackendClient {
    async fn prompt_files(&self) -> Result<Vec<PromptFile>, ApiError> {
        self.list_prompts().await
    }

    async fn discovery(&self) -> Result<DiscoveryResponse, ApiError> {
        BackendClient::discovery(self).await
    }

    async fn prompt_detail(&self, name: &str) -> Result<PromptDetail, ApiError> {
        self.get_prompt(name).await
    }
}

/// The merged result of one successful refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub prompt_files: Vec<PromptFile>,
    pub mcp_prompts: Vec<CatalogItem>,
    pub mcp_tools: Vec<CatalogItem>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.prompt_files.is_empty() && self.mcp_prompts.is_empty() && self.mcp_tools.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.prompt_files.len() + self.mcp_prompts.len() + self.mcp_tools.len()
    }

    pub fn prompt_file(&self, name: &str) -> Option<&PromptFile> {
        self.prompt_files.iter().find(|file| file.name == name)
    }
}

/// A refresh failed; the listing is replaced by this error.
#[derive(Debug, Clone)]
pub struct AggregateLoadError {
    source: Arc<ApiError>,
}

impl AggregateLoadError {
    pub fn new(source: ApiError) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn api_error(&self) -> &ApiError {
        &self.source
    }

    pub fn is_validation(&self) -> bool {
        self.source.is_validation()
    }
}

impl fmt::Display for AggregateLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to load data: {}", self.source)
    }
}

impl StdError for AggregateLoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// A detail fetch failed; the listing stays as it was.
#[derive(Debug, Clone)]
pub struct DetailLoadError {
    name: String,
    source: Arc<ApiError>,
}

impl DetailLoadError {
    pub fn new(name: impl Into<String>, source: ApiError) -> Self {
        Self {
            name: name.into(),
            source: Arc::new(source),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_error(&self) -> &ApiError {
        &self.source
    }

    pub fn is_validation(&self) -> bool {
        self.source.is_validation()
    }

    pub fn is_not_found(&self) -> bool {
        self.source.is_not_found()
    }
}

impl fmt::Display for DetailLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to load prompt detail for '{}': {}",
            self.name, self.source
        )
    }
}

impl StdError for DetailLoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(AggregateLoadError),
}

/// Fetch both collections concurrently and merge them.
pub async fn load_catalog(source: &dyn CatalogSource) -> Result<Catalog, AggregateLoadError> {
    let (prompt_files, discovery) = try_join(source.prompt_files(), source.discovery())
        .await
        .map_err(|err| {
            warn!(error = %err, "Catalog refresh failed");
            AggregateLoadError::new(err)
        })?;
    let (mcp_prompts, mcp_tools) = discovery.into_lists();
    debug!(
        prompt_files = prompt_files.len(),
        mcp_prompts = mcp_prompts.len(),
        mcp_tools = mcp_tools.len(),
        "Catalog refreshed"
    );
    Ok(Catalog {
        prompt_files,
        mcp_prompts,
        mcp_tools,
    })
}

pub async fn load_detail(
    source: &dyn CatalogSource,
    name: &str,
) -> Result<PromptDetail, DetailLoadError> {
    if name.trim().is_empty() {
        return Err(DetailLoadError::new(name, ApiError::InvalidName));
    }
    source.prompt_detail(name).await.map_err(|err| {
        warn!(name = %name, error = %err, "Prompt detail fetch failed");
        DetailLoadError::new(name, err)
    })
}

/// Owns the fetched lists and the status of the latest refresh.
pub struct CatalogAggregator {
    source: Arc<dyn CatalogSource>,
    catalog: Catalog,
    status: LoadStatus,
}

impl CatalogAggregator {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            catalog: Catalog::default(),
            status: LoadStatus::Idle,
        }
    }

    pub fn from_client(client: BackendClient) -> Self {
        Self::new(Arc::new(client))
    }

    pub fn source(&self) -> Arc<dyn CatalogSource> {
        Arc::clone(&self.source)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LoadStatus::Loading)
    }

    pub fn last_error(&self) -> Option<&AggregateLoadError> {
        match &self.status {
            LoadStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn begin_refresh(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Record a refresh outcome. A failure discards whatever lists were held.
    pub fn finish_refresh(&mut self, result: Result<Catalog, AggregateLoadError>) {
        match result {
            Ok(catalog) => {
                self.catalog = catalog;
                self.status = LoadStatus::Loaded;
            }
            Err(err) => {
                self.catalog = Catalog::default();
                self.status = LoadStatus::Failed(err);
            }
        }
    }

    /// Fetch both collections. The future owns its source, so it can be
    /// spawned; hand its result to [`Self::finish_refresh`].
    pub fn refresh(
        &self,
    ) -> impl Future<Output = Result<Catalog, AggregateLoadError>> + Send + 'static {
        let source = self.source();
        async move { load_catalog(source.as_ref()).await }
    }

    /// Fetch one prompt's content. Never touches the held lists.
    pub fn fetch_detail(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<PromptDetail, DetailLoadError>> + Send + 'static {
        let source = self.source();
        let name = name.to_string();
        async move { load_detail(source.as_ref(), &name).await }
    }
}
