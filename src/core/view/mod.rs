//! Two-state navigation over the catalog: a listing of every collection, or
//! the full content of one prompt file.
//!
//! The controller never awaits. Actions go in through [`apply_action`], and
//! any network work comes back out as a [`ViewCommand`] for an executor to run.
//! Results re-enter as actions tagged with the request id they answer, so a
//! result that arrives after the user has moved on is dropped.

mod actions;

pub use actions::{
    apply_action, apply_actions, DetailRequest, RefreshRequest, ViewAction, ViewCommand,
};

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::api::PromptDetail;
use crate::core::catalog::{AggregateLoadError, Catalog, CatalogAggregator, DetailLoadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Listing,
    Detail(PromptDetail),
}

/// The error slot. An aggregate error replaces the whole view; a detail
/// error is shown next to the listing it failed to leave.
#[derive(Debug, Clone)]
pub enum ViewError {
    Aggregate(AggregateLoadError),
    Detail(DetailLoadError),
}

impl ViewError {
    pub fn is_aggregate(&self) -> bool {
        matches!(self, ViewError::Aggregate(_))
    }

    pub fn is_validation(&self) -> bool {
        match self {
            ViewError::Aggregate(err) => err.is_validation(),
            ViewError::Detail(err) => err.is_validation(),
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Aggregate(err) => write!(f, "{err}"),
            ViewError::Detail(err) => write!(f, "{err}"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct PendingRequest {
    pub(crate) request_id: u64,
    pub(crate) cancel: CancellationToken,
}

impl PendingRequest {
    fn matches(&self, request_id: u64) -> bool {
        self.request_id == request_id
    }
}

pub struct ViewController {
    pub(crate) catalog: CatalogAggregator,
    pub(crate) mode: ViewMode,
    pub(crate) error: Option<ViewError>,
    pub(crate) notice: Option<String>,
    pub(crate) mounted: bool,
    pub(crate) pending_refresh: Option<PendingRequest>,
    pub(crate) pending_detail: Option<(PendingRequest, String)>,
    next_request_id: u64,
}

impl ViewController {
    pub fn new(catalog: CatalogAggregator) -> Self {
        Self {
            catalog,
            mode: ViewMode::Listing,
            error: None,
            notice: None,
            mounted: false,
            pending_refresh: None,
            pending_detail: None,
            next_request_id: 0,
        }
    }

    pub fn aggregator(&self) -> &CatalogAggregator {
        &self.catalog
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog.catalog()
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn is_listing(&self) -> bool {
        matches!(self.mode, ViewMode::Listing)
    }

    pub fn detail(&self) -> Option<&PromptDetail> {
        match &self.mode {
            ViewMode::Detail(detail) => Some(detail),
            ViewMode::Listing => None,
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    /// True from the moment a refresh starts until its result is applied.
    pub fn is_loading(&self) -> bool {
        self.catalog.is_loading()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Name of the prompt whose detail fetch is in flight, if any.
    pub fn pending_selection(&self) -> Option<&str> {
        self.pending_detail.as_ref().map(|(_, name)| name.as_str())
    }

    /// Short status line for actions that were ignored.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub(crate) fn next_request(&mut self) -> PendingRequest {
        self.next_request_id += 1;
        PendingRequest {
            request_id: self.next_request_id,
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn cancel_pending_detail(&mut self) {
        if let Some((pending, _)) = self.pending_detail.take() {
            pending.cancel.cancel();
        }
    }

    pub(crate) fn cancel_pending_refresh(&mut self) {
        if let Some(pending) = self.pending_refresh.take() {
            pending.cancel.cancel();
        }
    }
}
