use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{ViewController, ViewError, ViewMode};
use crate::api::{ApiError, PromptDetail};
use crate::core::catalog::{AggregateLoadError, Catalog, DetailLoadError};

pub const SELECT_WHILE_LOADING_NOTICE: &str = "Catalog is still loading; selection ignored";
pub const RETRY_WHILE_LOADING_NOTICE: &str = "A refresh is already in progress";
pub const SELECT_AFTER_FAILED_LOAD_NOTICE: &str = "Catalog failed to load; retry first";

#[derive(Debug)]
pub enum ViewAction {
    /// Entry into the view. Only the first mount triggers a refresh.
    Mount,
    /// Re-run the refresh, typically after it failed.
    Retry,
    Select {
        name: String,
    },
    Back,
    CatalogLoaded {
        request_id: u64,
        result: Result<Catalog, AggregateLoadError>,
    },
    DetailLoaded {
        request_id: u64,
        result: Result<PromptDetail, DetailLoadError>,
    },
}

#[derive(Debug, Clone)]
pub struct RefreshRequest {
    pub request_id: u64,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone)]
pub struct DetailRequest {
    pub request_id: u64,
    pub name: String,
    pub cancel: CancellationToken,
}

/// Work the controller wants done outside of itself.
#[derive(Debug, Clone)]
pub enum ViewCommand {
    Refresh(RefreshRequest),
    LoadDetail(DetailRequest),
}

pub fn apply_actions(
    controller: &mut ViewController,
    actions: impl IntoIterator<Item = ViewAction>,
) -> Vec<ViewCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(controller, action))
        .collect()
}

pub fn apply_action(controller: &mut ViewController, action: ViewAction) -> Option<ViewCommand> {
    match action {
        ViewAction::Mount => handle_mount(controller),
        ViewAction::Retry => handle_retry(controller),
        ViewAction::Select { name } => handle_select(controller, name),
        ViewAction::Back => {
            handle_back(controller);
            None
        }
        ViewAction::CatalogLoaded { request_id, result } => {
            handle_catalog_loaded(controller, request_id, result);
            None
        }
        ViewAction::DetailLoaded { request_id, result } => {
            handle_detail_loaded(controller, request_id, result);
            None
        }
    }
}

fn handle_mount(controller: &mut ViewController) -> Option<ViewCommand> {
    if controller.mounted {
        debug!("View already mounted; skipping refresh");
        return None;
    }
    controller.mounted = true;
    Some(start_refresh(controller))
}

fn handle_retry(controller: &mut ViewController) -> Option<ViewCommand> {
    if controller.is_loading() {
        controller.notice = Some(RETRY_WHILE_LOADING_NOTICE.to_string());
        return None;
    }
    controller.mounted = true;
    Some(start_refresh(controller))
}

fn start_refresh(controller: &mut ViewController) -> ViewCommand {
    controller.cancel_pending_refresh();
    controller.cancel_pending_detail();
    controller.notice = None;

    let pending = controller.next_request();
    let request = RefreshRequest {
        request_id: pending.request_id,
        cancel: pending.cancel.clone(),
    };
    controller.pending_refresh = Some(pending);
    controller.catalog.begin_refresh();
    debug!(request_id = request.request_id, "Catalog refresh started");
    ViewCommand::Refresh(request)
}

fn handle_select(controller: &mut ViewController, name: String) -> Option<ViewCommand> {
    controller.notice = None;
    if controller.is_loading() {
        debug!(name = %name, "Ignoring selection while the catalog is loading");
        controller.notice = Some(SELECT_WHILE_LOADING_NOTICE.to_string());
        return None;
    }
    if controller.error.as_ref().is_some_and(ViewError::is_aggregate) {
        debug!(name = %name, "Ignoring selection after a failed catalog load");
        controller.notice = Some(SELECT_AFTER_FAILED_LOAD_NOTICE.to_string());
        return None;
    }
    if name.trim().is_empty() {
        controller.error = Some(ViewError::Detail(DetailLoadError::new(
            name,
            ApiError::InvalidName,
        )));
        return None;
    }

    controller.cancel_pending_detail();
    let pending = controller.next_request();
    let request = DetailRequest {
        request_id: pending.request_id,
        name: name.clone(),
        cancel: pending.cancel.clone(),
    };
    controller.pending_detail = Some((pending, name));
    debug!(request_id = request.request_id, name = %request.name, "Prompt detail requested");
    Some(ViewCommand::LoadDetail(request))
}

/// Leaves the detail view. A failed catalog load stays on screen until a retry.
fn handle_back(controller: &mut ViewController) {
    controller.cancel_pending_detail();
    controller.mode = ViewMode::Listing;
    if matches!(controller.error, Some(ViewError::Detail(_))) {
        controller.error = None;
    }
    controller.notice = None;
}

fn handle_catalog_loaded(
    controller: &mut ViewController,
    request_id: u64,
    result: Result<Catalog, AggregateLoadError>,
) {
    match &controller.pending_refresh {
        Some(pending) if pending.matches(request_id) => {
            controller.pending_refresh = None;
        }
        _ => {
            debug!(request_id, "Dropping stale catalog result");
            return;
        }
    }

    let failure = result.as_ref().err().cloned();
    controller.catalog.finish_refresh(result);
    match failure {
        Some(err) => {
            controller.mode = ViewMode::Listing;
            controller.error = Some(ViewError::Aggregate(err));
        }
        None => {
            controller.error = None;
        }
    }
}

fn handle_detail_loaded(
    controller: &mut ViewController,
    request_id: u64,
    result: Result<PromptDetail, DetailLoadError>,
) {
    match &controller.pending_detail {
        Some((pending, _)) if pending.matches(request_id) => {
            controller.pending_detail = None;
        }
        _ => {
            debug!(request_id, "Dropping stale prompt detail");
            return;
        }
    }

    match result {
        Ok(detail) => {
            controller.mode = ViewMode::Detail(detail);
            controller.error = None;
        }
        Err(err) => {
            controller.error = Some(ViewError::Detail(err));
        }
    }
}
