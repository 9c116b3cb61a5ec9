use std::future::Future;

use tokio::task::JoinSet;
use tracing::debug;

use crate::api::PromptDetail;
use crate::core::catalog::{AggregateLoadError, Catalog, DetailLoadError};
use crate::core::view::{DetailRequest, RefreshRequest, ViewAction};

/// Background fetches; each yields the action that reports its result, or
/// `None` when it was cancelled first.
pub type ExecutorTasks = JoinSet<Option<ViewAction>>;

pub fn spawn_catalog_loader(
    tasks: &mut ExecutorTasks,
    fetch: impl Future<Output = Result<Catalog, AggregateLoadError>> + Send + 'static,
    request: RefreshRequest,
) {
    tasks.spawn(async move {
        let RefreshRequest { request_id, cancel } = request;
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(request_id, "Catalog refresh cancelled");
                None
            }
            result = fetch => {
                Some(ViewAction::CatalogLoaded { request_id, result })
            }
        }
    });
}

pub fn spawn_detail_loader(
    tasks: &mut ExecutorTasks,
    fetch: impl Future<Output = Result<PromptDetail, DetailLoadError>> + Send + 'static,
    request: DetailRequest,
) {
    tasks.spawn(async move {
        let DetailRequest {
            request_id,
            name,
            cancel,
        } = request;
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(request_id, name = %name, "Prompt detail fetch cancelled");
                None
            }
            result = fetch => {
                Some(ViewAction::DetailLoaded { request_id, result })
            }
        }
    });
}
